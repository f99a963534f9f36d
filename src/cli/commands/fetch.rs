use anyhow::Result;
use common::Target;
use query::{ErrorKind, FilterState, QueryClient, ResourceKind, ResourceRequest};
use tracing::{debug, info, trace, warn};

use super::CommandError;
use crate::render::{render_panel, to_json};

pub async fn fetch(
    client: &QueryClient,
    kind: ResourceKind,
    filters: &FilterState,
    target: Target,
    json: bool,
) -> Result<()> {
    trace!("Entering fetch command");
    let request = ResourceRequest::derive(kind, filters, target);
    debug!(key = %request.key(), "Fetching {}", kind.display_name());

    let result = client.fetch(&request).await;
    if json {
        println!("{}", to_json(&request, &result)?);
    } else {
        print!("{}", render_panel(&request, &result));
    }

    if let Some(error) = result.error() {
        if error.kind() == ErrorKind::NotFound {
            warn!("No {} for {}", kind.display_name(), request.filter_summary());
            return Ok(());
        }
        return Err(CommandError::FetchFailed {
            resource: kind.display_name().to_string(),
            message: error.message().to_string(),
        }
        .into());
    }

    info!("Fetched {} for {}", kind.display_name(), request.filter_summary());
    Ok(())
}
