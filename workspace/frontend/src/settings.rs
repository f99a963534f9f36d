use std::cell::RefCell;
use std::time::Duration;

use log::Level;
use query::EvictionPolicy;
use wasm_bindgen::JsValue;
use web_sys::window;

pub const DEFAULT_API_BASE_URL: &str = "https://housing-insights-risk-dashboard.vercel.app";

/// Global application settings
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    /// Origin of the dashboard API, without a trailing path
    pub api_base_url: String,

    /// Default log level for the application
    pub log_level: Level,

    /// Settled queries kept in the cache
    pub cache_max_entries: usize,

    /// Seconds an unused query stays cached
    pub cache_ttl_secs: u64,

    /// Enable debug mode
    pub debug_mode: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            log_level: Level::Info,
            cache_max_entries: 64,
            cache_ttl_secs: 300,
            debug_mode: false,
        }
    }
}

fn parse_log_level(value: &str) -> Option<Level> {
    match value.to_lowercase().as_str() {
        "error" => Some(Level::Error),
        "warn" => Some(Level::Warn),
        "info" => Some(Level::Info),
        "debug" => Some(Level::Debug),
        "trace" => Some(Level::Trace),
        _ => None,
    }
}

impl AppSettings {
    /// Create settings from window location and localStorage overrides
    pub fn from_environment() -> Self {
        let mut settings = Self::default();

        let Some(window) = window() else {
            return settings;
        };

        if let Ok(hostname) = window.location().hostname() {
            settings.debug_mode = hostname == "localhost" || hostname == "127.0.0.1";
            if settings.debug_mode {
                settings.log_level = Level::Debug;
            }
        }

        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(api_base_url)) = storage.get_item("hird_api_base_url") {
                if !api_base_url.trim().is_empty() {
                    settings.api_base_url = api_base_url;
                }
            }

            if let Ok(Some(log_level)) = storage.get_item("hird_log_level") {
                settings.log_level = parse_log_level(&log_level).unwrap_or(settings.log_level);
            }

            if let Ok(Some(max_entries)) = storage.get_item("hird_cache_max_entries") {
                if let Ok(value) = max_entries.parse::<usize>() {
                    settings.cache_max_entries = value;
                }
            }

            if let Ok(Some(ttl)) = storage.get_item("hird_cache_ttl_secs") {
                if let Ok(value) = ttl.parse::<u64>() {
                    settings.cache_ttl_secs = value;
                }
            }
        }

        settings
    }

    /// Save settings to localStorage
    pub fn save_to_storage(&self) -> Result<(), JsValue> {
        if let Some(window) = window() {
            if let Some(storage) = window.local_storage()? {
                storage.set_item("hird_api_base_url", &self.api_base_url)?;
                storage.set_item("hird_log_level", &self.log_level.as_str().to_lowercase())?;
                storage.set_item("hird_cache_max_entries", &self.cache_max_entries.to_string())?;
                storage.set_item("hird_cache_ttl_secs", &self.cache_ttl_secs.to_string())?;
            }
        }
        Ok(())
    }

    pub fn eviction_policy(&self) -> EvictionPolicy {
        EvictionPolicy {
            max_entries: self.cache_max_entries,
            ttl: Duration::from_secs(self.cache_ttl_secs),
        }
    }
}

thread_local! {
    static SETTINGS: RefCell<AppSettings> = RefCell::new(AppSettings::default());
}

/// Get a copy of the current settings
pub fn get_settings() -> AppSettings {
    SETTINGS.with(|s| s.borrow().clone())
}

/// Update the global settings and persist them
pub fn update_settings<F>(f: F) -> Result<(), JsValue>
where
    F: FnOnce(&mut AppSettings),
{
    SETTINGS.with(|s| {
        let mut settings = s.borrow_mut();
        f(&mut settings);
        settings.save_to_storage()
    })
}

/// Initialize settings (call this at app startup)
pub fn init_settings() {
    SETTINGS.with(|s| {
        *s.borrow_mut() = AppSettings::from_environment();
    });
}
