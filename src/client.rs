use std::rc::Rc;

use anyhow::Result;
use futures::future::LocalBoxFuture;
use query::{QueryClient, ResourceFetcher, Spawner};
use tracing::info;

use crate::config::Settings;
use crate::transport::ReqwestTransport;

/// Spawns background fetches on the current `LocalSet`.
pub fn local_spawner() -> Spawner {
    Rc::new(|future: LocalBoxFuture<'static, ()>| {
        tokio::task::spawn_local(future);
    })
}

pub fn build_client(settings: &Settings) -> Result<QueryClient> {
    let transport = ReqwestTransport::new(settings.request_timeout())?;
    let fetcher = ResourceFetcher::new(Rc::new(transport), settings.api_base_url.as_str());
    info!("Using API at {}", fetcher.base_url());

    Ok(QueryClient::new(fetcher, local_spawner()).with_policy(settings.eviction_policy()))
}
