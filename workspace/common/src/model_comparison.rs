use serde::{Deserialize, Serialize};

use crate::Target;

/// Backtest error metrics of one model at one horizon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HorizonMetric {
    /// Horizon in months.
    pub horizon: u32,
    pub mae: f64,
    pub mape: f64,
    pub rmse: f64,
    pub mse: f64,
    pub r2: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelMetrics {
    #[serde(default)]
    pub arima: Option<Vec<HorizonMetric>>,
    #[serde(default)]
    pub lstm: Option<Vec<HorizonMetric>>,
    #[serde(default)]
    pub prophet: Option<Vec<HorizonMetric>>,
}

impl ModelMetrics {
    /// Models present in the payload, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[HorizonMetric])> {
        [
            ("arima", self.arima.as_deref()),
            ("lstm", self.lstm.as_deref()),
            ("prophet", self.prophet.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, metrics)| metrics.map(|m| (name, m)))
    }
}

/// Payload of `GET /model-comparison`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelComparisonResponse {
    pub city: String,
    pub target: Target,
    /// Backtested horizons in months.
    pub horizons: Vec<u32>,
    pub models: ModelMetrics,
}

impl ModelComparisonResponse {
    /// Model with the lowest MAPE at `horizon`, if any model reports it.
    pub fn best_at(&self, horizon: u32) -> Option<(&'static str, &HorizonMetric)> {
        self.models
            .iter()
            .filter_map(|(name, metrics)| {
                metrics.iter().find(|m| m.horizon == horizon).map(|m| (name, m))
            })
            .min_by(|a, b| a.1.mape.total_cmp(&b.1.mape))
    }
}
