use anyhow::Result;
use query::{QueryClient, ResourceRequest, ResourceResult};
use tracing::{debug, info, trace, warn};

use super::CommandError;
use crate::render::{render_panel, to_json};

pub async fn cities(client: &QueryClient, json: bool) -> Result<()> {
    trace!("Entering cities command");
    let request = ResourceRequest::cities();
    debug!(key = %request.key(), "Fetching city list");

    let result = client.fetch(&request).await;
    if json {
        println!("{}", to_json(&request, &result)?);
    } else {
        print!("{}", render_panel(&request, &result));
    }

    match result {
        ResourceResult::Error(error) if error.is_not_found() => {
            warn!("No cities available");
            Ok(())
        }
        ResourceResult::Error(error) => Err(CommandError::FetchFailed {
            resource: request.kind().display_name().to_string(),
            message: error.message().to_string(),
        }
        .into()),
        ResourceResult::Success(data) => {
            info!("Listed {} cities", data.as_cities().map_or(0, |c| c.len()));
            Ok(())
        }
        ResourceResult::Loading => Ok(()),
    }
}
