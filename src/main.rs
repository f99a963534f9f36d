use anyhow::{Context, Result};
use clap::Parser;
use tokio::task::LocalSet;
use tracing_subscriber::EnvFilter;

mod cli;
mod client;
mod config;
mod render;
mod transport;

#[cfg(test)]
mod test_utils;

use cli::Cli;

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("hird=debug,query=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// The query cache is single-threaded, so commands run on a current-thread
/// runtime inside a `LocalSet`.
fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    LocalSet::new().block_on(&runtime, cli.run())
}
