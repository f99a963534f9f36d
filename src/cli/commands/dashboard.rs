use anyhow::Result;
use futures::future::join_all;
use query::{dashboard_requests, ErrorKind, FetchResult, FilterState, QueryClient, ResourceRequest, Subscription};
use tracing::{debug, info, trace, warn};

use super::CommandError;
use crate::render::{panel_title, render_panel, render_snapshot, to_json};

/// Loads every panel concurrently. With `predict`, the panels are then
/// invalidated and printed again once the refetch settles.
pub async fn dashboard(client: &QueryClient, filters: &FilterState, predict: bool, json: bool) -> Result<()> {
    trace!("Entering dashboard command");
    let requests = dashboard_requests(filters);
    debug!(panels = requests.len(), city = %filters.city, "Loading dashboard");

    let results = load(client, &requests).await;
    print_panels(&requests, &results, json)?;

    let results = if predict {
        // panels stay subscribed so the invalidation refetches them
        let subscriptions: Vec<Subscription> = requests
            .iter()
            .map(|request| {
                let title = panel_title(request);
                client.subscribe(request, move |snapshot| {
                    debug!(panel = %title, fetching = snapshot.is_fetching, stale = snapshot.is_stale, "Panel updated");
                })
            })
            .collect();

        info!("Predict requested, refreshing all panels");
        client.invalidate_all();
        if !json {
            for request in &requests {
                if let Some(snapshot) = client.peek(request.key()) {
                    print!("{}", render_snapshot(request, &snapshot));
                }
            }
        }

        let refreshed = load(client, &requests).await;
        drop(subscriptions);
        let evicted = client.evict_idle();
        debug!(evicted, cached = client.len(), "Evicted idle queries");
        println!();
        print_panels(&requests, &refreshed, json)?;
        refreshed
    } else {
        results
    };

    let failed = results
        .iter()
        .filter_map(|result| result.error())
        .filter(|error| error.kind() != ErrorKind::NotFound)
        .count();
    if failed > 0 {
        warn!(failed, "Some panels failed to load");
        return Err(CommandError::PanelsFailed {
            failed,
            total: results.len(),
        }
        .into());
    }

    info!("Dashboard loaded for {}", filters.city);
    Ok(())
}

async fn load(client: &QueryClient, requests: &[ResourceRequest]) -> Vec<FetchResult> {
    join_all(requests.iter().map(|request| client.fetch(request))).await
}

fn print_panels(requests: &[ResourceRequest], results: &[FetchResult], json: bool) -> Result<()> {
    for (request, result) in requests.iter().zip(results) {
        if json {
            println!("{}", to_json(request, result)?);
        } else {
            println!("{}", render_panel(request, result));
        }
    }
    Ok(())
}
