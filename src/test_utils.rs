#[cfg(test)]
pub mod test_utils {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use axum::http::{StatusCode, Uri};
    use axum::response::{IntoResponse, Json, Response};
    use axum::routing::get;
    use axum::Router;
    use query::{Horizon, QueryClient};
    use serde_json::json;
    use tokio::net::TcpListener;

    use crate::client::build_client;
    use crate::config::{CacheSettings, Settings};

    type Params = Query<HashMap<String, String>>;

    /// Requests seen by the fixture API, as path and query.
    #[derive(Clone, Default)]
    struct FixtureState {
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl FixtureState {
        /// Records `uri` and returns how many times it has been requested.
        fn record(&self, uri: &Uri) -> usize {
            let uri = uri.to_string();
            let mut requests = self.requests.lock().expect("fixture lock poisoned");
            requests.push(uri.clone());
            requests.iter().filter(|r| **r == uri).count()
        }
    }

    pub struct FixtureServer {
        pub base_url: String,
        state: FixtureState,
    }

    impl FixtureServer {
        pub fn requests(&self) -> Vec<String> {
            self.state.requests.lock().expect("fixture lock poisoned").clone()
        }

        pub fn hits(&self, path_and_query: &str) -> usize {
            self.requests().iter().filter(|r| *r == path_and_query).count()
        }
    }

    fn param<'a>(params: &'a HashMap<String, String>, name: &str) -> &'a str {
        params.get(name).map(String::as_str).unwrap_or_default()
    }

    async fn cities(State(state): State<FixtureState>, uri: Uri) -> Response {
        state.record(&uri);
        Json(json!({ "cities": ["Calgary", "Kelowna", "Toronto"] })).into_response()
    }

    /// Unknown city "Atlantis" has no forecast. Values grow with every
    /// repeated request so refetches are observable. The horizon comes back
    /// in months and the last point has no confidence band.
    async fn forecast(State(state): State<FixtureState>, uri: Uri, Query(params): Params) -> Response {
        let generation = state.record(&uri);
        let city = param(&params, "city");
        if city == "Atlantis" {
            return (StatusCode::NOT_FOUND, Json(json!({ "detail": "No forecast" }))).into_response();
        }
        let value = 100_000.0 * generation as f64;
        let months = param(&params, "horizon").parse::<Horizon>().unwrap_or_default().months();
        Json(json!({
            "city": city,
            "target": param(&params, "target"),
            "horizon": months,
            "data": [
                { "date": "2026-01-01", "value": value, "lower": value * 0.9, "upper": value * 1.1 },
                { "date": "2027-01-01", "value": value * 1.02, "lower": null, "upper": null }
            ]
        }))
        .into_response()
    }

    async fn sentiment(State(state): State<FixtureState>, uri: Uri, Query(params): Params) -> Response {
        state.record(&uri);
        Json(json!({
            "city": param(&params, "city"),
            "items": [
                { "date": "2025-05-01", "headline": "Listings climb", "sentiment": "POS", "url": "https://news.test/1" },
                { "date": "2025-05-02", "headline": "Rates unchanged", "sentiment": "NEU", "url": "https://news.test/2" }
            ]
        }))
        .into_response()
    }

    /// "Gotham" makes the risk service fail.
    async fn risk(State(state): State<FixtureState>, uri: Uri, Query(params): Params) -> Response {
        state.record(&uri);
        let city = param(&params, "city");
        if city == "Gotham" {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
        Json(json!({
            "city": city,
            "date": "2025-06",
            "score": 58,
            "breakdown": [
                { "name": "Affordability", "status": "Tight" },
                { "name": "Inventory", "status": "Low" }
            ]
        }))
        .into_response()
    }

    /// "Regina" only has price anomalies.
    async fn anomalies(State(state): State<FixtureState>, uri: Uri, Query(params): Params) -> Response {
        state.record(&uri);
        let city = param(&params, "city");
        let target = param(&params, "target");
        if city == "Regina" && target == "rent" {
            return StatusCode::NOT_FOUND.into_response();
        }
        Json(json!({
            "city": city,
            "target": target,
            "signals": [
                { "date": "2025-01", "score": 0.3, "is_anomaly": false },
                { "date": "2025-02", "score": 3.1, "is_anomaly": true }
            ]
        }))
        .into_response()
    }

    async fn model_comparison(State(state): State<FixtureState>, uri: Uri, Query(params): Params) -> Response {
        state.record(&uri);
        Json(json!({
            "city": param(&params, "city"),
            "target": param(&params, "target"),
            "horizons": [12, 60],
            "models": {
                "arima": [
                    { "horizon": 12, "mae": 1200.0, "mape": 2.1, "rmse": 1500.0, "mse": 2250000.0, "r2": 0.91 },
                    { "horizon": 60, "mae": 5400.0, "mape": 6.3, "rmse": 6100.0, "mse": 37210000.0, "r2": null }
                ],
                "prophet": [
                    { "horizon": 12, "mae": 1100.0, "mape": 1.9, "rmse": 1400.0, "mse": 1960000.0, "r2": 0.93 }
                ]
            }
        }))
        .into_response()
    }

    /// Serves the dashboard endpoints on an ephemeral local port.
    pub async fn spawn_fixture_api() -> FixtureServer {
        let state = FixtureState::default();
        let app = Router::new()
            .route("/cities", get(cities))
            .route("/forecast", get(forecast))
            .route("/sentiment", get(sentiment))
            .route("/risk", get(risk))
            .route("/anomalies", get(anomalies))
            .route("/model-comparison", get(model_comparison))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fixture listener");
        let address = listener.local_addr().expect("Fixture listener has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Fixture server failed");
        });

        FixtureServer {
            base_url: format!("http://{}", address),
            state,
        }
    }

    pub fn test_settings(api_base_url: &str) -> Settings {
        Settings {
            api_base_url: api_base_url.to_string(),
            request_timeout_ms: 5_000,
            default_city: "Calgary".to_string(),
            cache: CacheSettings {
                max_entries: 64,
                ttl_secs: 300,
            },
        }
    }

    /// Query client over the real HTTP transport. Must be used inside a
    /// `LocalSet`.
    pub fn test_client(api_base_url: &str) -> QueryClient {
        build_client(&test_settings(api_base_url)).expect("Failed to build test client")
    }
}
