use std::rc::Rc;

use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use gloo_net::http::Request;
use query::{HttpResponse, QueryClient, ResourceFetcher, Spawner, Transport, TransportError};

use crate::settings::AppSettings;

/// Browser fetch transport.
pub struct GlooTransport;

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        log::debug!("GET request to: {}", url);

        let response = Request::get(url).send().await.map_err(|e| {
            let error_msg = format!("Request failed: {}", e);
            log::error!("GET {} - {}", url, error_msg);
            TransportError::new(error_msg)
        })?;

        let status = response.status();
        log::trace!("GET {} - Response received with status {}", url, status);
        let body = response.text().await.map_err(|e| {
            let error_msg = format!("Failed to read response: {}", e);
            log::error!("GET {} - {}", url, error_msg);
            TransportError::new(error_msg)
        })?;

        Ok(HttpResponse::new(status, body))
    }
}

fn browser_spawner() -> Spawner {
    Rc::new(|future: LocalBoxFuture<'static, ()>| {
        wasm_bindgen_futures::spawn_local(future);
    })
}

/// Query client shared by every panel of the page.
pub fn query_client(settings: &AppSettings) -> QueryClient {
    let fetcher = ResourceFetcher::new(Rc::new(GlooTransport), settings.api_base_url.as_str());
    log::debug!("Query client using API at {}", fetcher.base_url());
    QueryClient::new(fetcher, browser_spawner()).with_policy(settings.eviction_policy())
}
