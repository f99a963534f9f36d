use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use query::EvictionPolicy;
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_API_BASE_URL: &str = "https://housing-insights-risk-dashboard.vercel.app";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CacheSettings {
    pub max_entries: usize,
    pub ttl_secs: u64,
}

/// Client configuration: built-in defaults, then `hird.toml` (or the file
/// passed with `--config`), then `HIRD_*` environment variables. Nested keys
/// use a double underscore, e.g. `HIRD_CACHE__TTL_SECS`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub default_city: String,
    pub cache: CacheSettings,
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name("hird").required(false),
        };

        let settings: Settings = Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("request_timeout_ms", 30_000_i64)?
            .set_default("default_city", query::DEFAULT_CITY)?
            .set_default("cache.max_entries", 64_i64)?
            .set_default("cache.ttl_secs", 300_i64)?
            .add_source(file)
            .add_source(
                Environment::with_prefix("HIRD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        debug!(?settings, "Configuration loaded");
        Ok(settings)
    }

    /// Replaces the API origin when one was given on the command line.
    pub fn with_api_base_url(mut self, api_base_url: Option<String>) -> Self {
        if let Some(url) = api_base_url {
            self.api_base_url = url;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn eviction_policy(&self) -> EvictionPolicy {
        EvictionPolicy {
            max_entries: self.cache.max_entries,
            ttl: Duration::from_secs(self.cache.ttl_secs),
        }
    }
}
