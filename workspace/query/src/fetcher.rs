use std::rc::Rc;

use common::{
    AnomalySeries, CitiesResponse, CitySentiments, ForecastResponse, ModelComparisonResponse,
    RiskGauge, Target,
};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, trace, warn};

use crate::error::{classify, ErrorKind, FetchFailure};
use crate::request::{ResourceKind, ResourceRequest};
use crate::result::{FetchResult, ResourceData, ResourceResult};
use crate::transport::Transport;

/// Issues the HTTP request(s) behind a [`ResourceRequest`] and turns the
/// response into typed data or a classified error.
pub struct ResourceFetcher {
    transport: Rc<dyn Transport>,
    base_url: String,
}

impl ResourceFetcher {
    pub fn new(transport: Rc<dyn Transport>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url, path_and_query)
    }

    /// Fetches `request`. Never returns `Loading` and never touches any
    /// cache or filter state.
    pub async fn fetch(&self, request: &ResourceRequest) -> FetchResult {
        let outcome = match request.kind() {
            ResourceKind::Anomalies => self.fetch_anomalies(request).await,
            kind => {
                let body = self.get_body(request.path_and_query()).await;
                body.and_then(|body| decode(kind, &body))
            }
        };

        match outcome {
            Ok(data) => {
                info!(key = %request.key(), "Fetched {}", request.kind().display_name());
                ResourceResult::Success(Rc::new(data))
            }
            Err(failure) => {
                let classified = classify(&failure, request);
                match classified.kind() {
                    ErrorKind::NotFound => {
                        warn!(key = %request.key(), "{}", classified.message())
                    }
                    ErrorKind::HttpError | ErrorKind::Network => {
                        error!(key = %request.key(), ?failure, "{}", classified.message())
                    }
                }
                ResourceResult::Error(classified)
            }
        }
    }

    async fn get_body(&self, path_and_query: &str) -> Result<String, FetchFailure> {
        let url = self.url_for(path_and_query);
        debug!("GET request to: {}", url);

        let response = self
            .transport
            .get(&url)
            .await
            .map_err(FetchFailure::Transport)?;

        if let Some(failure) = FetchFailure::from_status(response.status) {
            debug!("GET {} - HTTP {}", path_and_query, response.status);
            return Err(failure);
        }

        trace!("GET {} - Response received, {} bytes", path_and_query, response.body.len());
        Ok(response.body)
    }

    /// Anomalies are served per target: both sub-requests run concurrently
    /// and the merge is all-or-nothing. A 404 from either one wins (price
    /// before rent), then a failure of every sub-request, then the single
    /// failure that remains.
    async fn fetch_anomalies(&self, request: &ResourceRequest) -> Result<ResourceData, FetchFailure> {
        let paths: Vec<String> = Target::ALL
            .into_iter()
            .map(|target| request.sub_request_path(target))
            .collect();

        let outcomes = join_all(paths.iter().map(|path| async move {
            let body = self.get_body(path).await?;
            parse::<AnomalySeries>(&body)
        }))
        .await;

        if let Some(not_found) = outcomes
            .iter()
            .filter_map(|outcome| outcome.as_ref().err())
            .find(|failure| failure.is_not_found())
        {
            return Err(not_found.clone());
        }

        let failed = outcomes.iter().filter(|outcome| outcome.is_err()).count();
        if failed == outcomes.len() {
            return Err(FetchFailure::Unavailable { failed });
        }

        let series = outcomes.into_iter().collect::<Result<Vec<_>, _>>()?;
        Ok(ResourceData::Anomalies(series))
    }
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T, FetchFailure> {
    serde_json::from_str(body).map_err(|e| FetchFailure::Payload(e.to_string()))
}

fn decode(kind: ResourceKind, body: &str) -> Result<ResourceData, FetchFailure> {
    let data = match kind {
        ResourceKind::Cities => ResourceData::Cities(parse::<CitiesResponse>(body)?.cities),
        ResourceKind::Forecast => ResourceData::Forecast(parse::<ForecastResponse>(body)?),
        ResourceKind::Sentiment => ResourceData::Sentiment(parse::<CitySentiments>(body)?),
        ResourceKind::Risk => ResourceData::Risk(parse::<RiskGauge>(body)?),
        ResourceKind::Anomalies => ResourceData::Anomalies(vec![parse::<AnomalySeries>(body)?]),
        ResourceKind::ModelComparison => {
            ResourceData::ModelComparison(parse::<ModelComparisonResponse>(body)?)
        }
    };
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterAction, FilterState, Horizon};
    use crate::testing::{self, FakeTransport};

    fn fetcher(transport: &Rc<FakeTransport>) -> ResourceFetcher {
        ResourceFetcher::new(transport.clone(), format!("{}/", testing::BASE_URL))
    }

    fn anomalies_request() -> ResourceRequest {
        ResourceRequest::derive(ResourceKind::Anomalies, &FilterState::default(), Target::Price)
    }

    #[tokio::test]
    async fn test_base_url_trailing_slash_is_trimmed() {
        let _guard = testing::init_test_tracing();
        let transport = Rc::new(FakeTransport::new());
        transport.respond("/cities", 200, testing::cities_json());
        let fetcher = fetcher(&transport);

        assert_eq!(fetcher.base_url(), testing::BASE_URL);
        let result = fetcher.fetch(&ResourceRequest::cities()).await;
        assert_eq!(
            result.data().unwrap().as_cities().unwrap(),
            ["Calgary".to_string(), "Kelowna".to_string(), "Toronto".to_string()]
        );
        assert_eq!(transport.calls(), vec![format!("{}/cities", testing::BASE_URL)]);
    }

    #[tokio::test]
    async fn test_forecast_404_is_not_found_with_filters() {
        let _guard = testing::init_test_tracing();
        let transport = Rc::new(FakeTransport::new());
        let state = Rc::new(FilterState::default())
            .reduce(FilterAction::SetCity("Kelowna".into()))
            .reduce(FilterAction::SetHorizon(Horizon::FiveYears));
        let request = ResourceRequest::derive(ResourceKind::Forecast, &state, Target::Price);
        transport.respond(request.path_and_query(), 404, r#"{"detail":"not found"}"#);

        let result = fetcher(&transport).fetch(&request).await;
        let error = result.error().unwrap();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert!(error.details().contains("Kelowna"));
        assert!(error.details().contains("5Y"));
    }

    #[tokio::test]
    async fn test_forecast_without_confidence_band_is_success() {
        let _guard = testing::init_test_tracing();
        let transport = Rc::new(FakeTransport::new());
        let request = ResourceRequest::derive(ResourceKind::Forecast, &FilterState::default(), Target::Price);
        transport.respond(
            request.path_and_query(),
            200,
            r#"{"city":"Calgary","target":"price","horizon":12,"data":[{"date":"2026-01-01","value":500000.0,"lower":null,"upper":null}]}"#,
        );

        let result = fetcher(&transport).fetch(&request).await;
        let forecast = result.data().and_then(|d| d.as_forecast()).unwrap();
        assert_eq!(forecast.data[0].value, 500000.0);
        assert_eq!(forecast.data[0].lower, None);
        assert_eq!(forecast.horizon_label(), "1Y");
    }

    #[tokio::test]
    async fn test_transport_failure_and_bad_payload() {
        let _guard = testing::init_test_tracing();
        let transport = Rc::new(FakeTransport::new());
        transport.fail("/risk?city=Calgary", "connection reset");
        transport.respond("/sentiment?city=Calgary", 200, r#"{"city":"Calgary"}"#);
        let fetcher = fetcher(&transport);
        let state = FilterState::default();

        let risk = ResourceRequest::derive(ResourceKind::Risk, &state, Target::Price);
        assert_eq!(fetcher.fetch(&risk).await.error().unwrap().kind(), ErrorKind::Network);

        let sentiment = ResourceRequest::derive(ResourceKind::Sentiment, &state, Target::Price);
        let error = fetcher.fetch(&sentiment).await.error().cloned().unwrap();
        assert_eq!(error.kind(), ErrorKind::HttpError);
        assert!(error.details().contains("missing field `items`"));
    }

    #[tokio::test]
    async fn test_anomalies_both_succeed_in_target_order() {
        let _guard = testing::init_test_tracing();
        let transport = Rc::new(FakeTransport::new());
        transport.respond("/anomalies?city=Calgary&target=price", 200, testing::anomalies_json(Target::Price));
        transport.respond("/anomalies?city=Calgary&target=rent", 200, testing::anomalies_json(Target::Rent));

        let result = fetcher(&transport).fetch(&anomalies_request()).await;
        let series = result.data().unwrap().as_anomalies().unwrap().to_vec();
        let targets: Vec<_> = series.iter().map(|s| s.target).collect();
        assert_eq!(targets, vec![Target::Price, Target::Rent]);
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_anomalies_one_404_is_not_found() {
        let _guard = testing::init_test_tracing();
        let transport = Rc::new(FakeTransport::new());
        transport.respond("/anomalies?city=Calgary&target=price", 200, testing::anomalies_json(Target::Price));
        transport.respond("/anomalies?city=Calgary&target=rent", 404, "{}");

        let result = fetcher(&transport).fetch(&anomalies_request()).await;
        assert!(result.data().is_none());
        assert_eq!(result.error().unwrap().kind(), ErrorKind::NotFound);
        assert_eq!(
            result.error().unwrap().message(),
            "No market anomaly data found for Calgary."
        );
    }

    #[tokio::test]
    async fn test_anomalies_404_wins_over_other_failure() {
        let _guard = testing::init_test_tracing();
        let transport = Rc::new(FakeTransport::new());
        transport.respond("/anomalies?city=Calgary&target=price", 500, "");
        transport.respond("/anomalies?city=Calgary&target=rent", 404, "");

        let result = fetcher(&transport).fetch(&anomalies_request()).await;
        assert_eq!(result.error().unwrap().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_anomalies_all_failed_is_http_error() {
        let _guard = testing::init_test_tracing();
        let transport = Rc::new(FakeTransport::new());
        transport.fail("/anomalies?city=Calgary&target=price", "timeout");
        transport.respond("/anomalies?city=Calgary&target=rent", 502, "");

        let result = fetcher(&transport).fetch(&anomalies_request()).await;
        let error = result.error().unwrap();
        assert_eq!(error.kind(), ErrorKind::HttpError);
        assert!(error.details().contains("all 2 requests failed"));
    }

    #[tokio::test]
    async fn test_anomalies_single_failure_keeps_its_classification() {
        let _guard = testing::init_test_tracing();
        let transport = Rc::new(FakeTransport::new());
        transport.fail("/anomalies?city=Calgary&target=price", "dns lookup failed");
        transport.respond("/anomalies?city=Calgary&target=rent", 200, testing::anomalies_json(Target::Rent));

        let result = fetcher(&transport).fetch(&anomalies_request()).await;
        assert_eq!(result.error().unwrap().kind(), ErrorKind::Network);
    }
}
