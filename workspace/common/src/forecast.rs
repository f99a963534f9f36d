use serde::{Deserialize, Serialize};

use crate::{horizon_label, Target};

/// One forecast step with its confidence band. The band is missing when the
/// model did not produce one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastPoint {
    pub date: String,
    pub value: f64,
    #[serde(default)]
    pub lower: Option<f64>,
    #[serde(default)]
    pub upper: Option<f64>,
}

/// Payload of `GET /forecast`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastResponse {
    pub city: String,
    pub target: Target,
    /// Horizon in months as reported by the server.
    pub horizon: u32,
    pub data: Vec<ForecastPoint>,
}

impl ForecastResponse {
    /// Last forecast point, i.e. the value at the end of the horizon.
    pub fn final_point(&self) -> Option<&ForecastPoint> {
        self.data.last()
    }

    /// `60` months -> `"5Y"`.
    pub fn horizon_label(&self) -> String {
        horizon_label(self.horizon)
    }
}
