//! Wire types for the HIRD dashboard API.
//! These structs mirror the JSON payloads served by the `/cities`,
//! `/forecast`, `/sentiment`, `/risk`, `/anomalies` and `/model-comparison`
//! endpoints so both the CLI and the browser front-end can deserialize
//! responses without duplicating shapes.

mod anomalies;
mod forecast;
mod model_comparison;
mod risk;
mod sentiment;

pub use anomalies::{AnomalySeries, AnomalySignal};
pub use forecast::{ForecastPoint, ForecastResponse};
pub use model_comparison::{HorizonMetric, ModelComparisonResponse, ModelMetrics};
pub use risk::{IndicatorStatus, RiskBreakdown, RiskGauge};
pub use sentiment::{CitySentiments, NewsItem, SentimentLabel};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payload of `GET /cities`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CitiesResponse {
    pub cities: Vec<String>,
}

/// Label for a horizon the server reports in months: whole years print as
/// `5Y`, anything else as `18M`.
pub fn horizon_label(months: u32) -> String {
    if months > 0 && months % 12 == 0 {
        format!("{}Y", months / 12)
    } else {
        format!("{}M", months)
    }
}

/// Which market series a request is about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Price,
    Rent,
}

impl Target {
    /// Both targets, in the order the dashboard requests them.
    pub const ALL: [Target; 2] = [Target::Price, Target::Rent];

    /// Value sent in the `target` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Price => "price",
            Target::Rent => "rent",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown target '{0}', expected 'price' or 'rent'")]
pub struct TargetParseError(pub String);

impl FromStr for Target {
    type Err = TargetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(Target::Price),
            "rent" => Ok(Target::Rent),
            _ => Err(TargetParseError(s.to_string())),
        }
    }
}
