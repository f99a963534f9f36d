use serde::{Deserialize, Serialize};

use crate::Target;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnomalySignal {
    pub date: String,
    pub score: f64,
    pub is_anomaly: bool,
}

/// Payload of `GET /anomalies` for one target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnomalySeries {
    pub city: String,
    pub target: Target,
    pub signals: Vec<AnomalySignal>,
}

impl AnomalySeries {
    pub fn flagged(&self) -> impl Iterator<Item = &AnomalySignal> {
        self.signals.iter().filter(|s| s.is_anomaly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flagged_signals() {
        let json = r#"{
            "city": "Calgary",
            "target": "rent",
            "signals": [
                {"date": "2025-01", "score": 0.4, "is_anomaly": false},
                {"date": "2025-02", "score": 2.9, "is_anomaly": true}
            ]
        }"#;
        let parsed: AnomalySeries = serde_json::from_str(json).unwrap();
        let flagged: Vec<_> = parsed.flagged().map(|s| s.date.as_str()).collect();
        assert_eq!(flagged, vec!["2025-02"]);
    }
}
