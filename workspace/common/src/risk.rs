use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IndicatorStatus {
    Tight,
    Elevated,
    Low,
}

impl IndicatorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorStatus::Tight => "Tight",
            IndicatorStatus::Elevated => "Elevated",
            IndicatorStatus::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskBreakdown {
    pub name: String,
    pub status: IndicatorStatus,
}

/// Payload of `GET /risk`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskGauge {
    pub city: String,
    pub date: String,
    /// Composite risk score in `0..=100`.
    pub score: f64,
    pub breakdown: Vec<RiskBreakdown>,
}

impl RiskGauge {
    /// Score clamped into the gauge range.
    pub fn gauge_score(&self) -> f64 {
        self.score.clamp(0.0, 100.0)
    }
}
