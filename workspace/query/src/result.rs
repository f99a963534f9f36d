use std::rc::Rc;

use common::{AnomalySeries, CitySentiments, ForecastResponse, ModelComparisonResponse, RiskGauge};
use serde::Serialize;

use crate::error::ClassifiedError;
use crate::request::ResourceKind;

/// Outcome of a resource fetch as seen by a renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceResult<T> {
    Loading,
    Error(ClassifiedError),
    Success(T),
}

impl<T> Default for ResourceResult<T> {
    fn default() -> Self {
        ResourceResult::Loading
    }
}

impl<T> ResourceResult<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ResourceResult::Loading)
    }

    pub fn is_settled(&self) -> bool {
        !self.is_loading()
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ResourceResult::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ClassifiedError> {
        match self {
            ResourceResult::Error(error) => Some(error),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResourceResult<U> {
        match self {
            ResourceResult::Loading => ResourceResult::Loading,
            ResourceResult::Error(error) => ResourceResult::Error(error),
            ResourceResult::Success(data) => ResourceResult::Success(f(data)),
        }
    }
}

/// Typed payload of one resource kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourceData {
    Cities(Vec<String>),
    Forecast(ForecastResponse),
    Sentiment(CitySentiments),
    Risk(RiskGauge),
    /// Price series first, then rent.
    Anomalies(Vec<AnomalySeries>),
    ModelComparison(ModelComparisonResponse),
}

impl ResourceData {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceData::Cities(_) => ResourceKind::Cities,
            ResourceData::Forecast(_) => ResourceKind::Forecast,
            ResourceData::Sentiment(_) => ResourceKind::Sentiment,
            ResourceData::Risk(_) => ResourceKind::Risk,
            ResourceData::Anomalies(_) => ResourceKind::Anomalies,
            ResourceData::ModelComparison(_) => ResourceKind::ModelComparison,
        }
    }

    pub fn as_cities(&self) -> Option<&[String]> {
        match self {
            ResourceData::Cities(cities) => Some(cities),
            _ => None,
        }
    }

    pub fn as_forecast(&self) -> Option<&ForecastResponse> {
        match self {
            ResourceData::Forecast(forecast) => Some(forecast),
            _ => None,
        }
    }

    pub fn as_sentiment(&self) -> Option<&CitySentiments> {
        match self {
            ResourceData::Sentiment(sentiment) => Some(sentiment),
            _ => None,
        }
    }

    pub fn as_risk(&self) -> Option<&RiskGauge> {
        match self {
            ResourceData::Risk(risk) => Some(risk),
            _ => None,
        }
    }

    pub fn as_anomalies(&self) -> Option<&[AnomalySeries]> {
        match self {
            ResourceData::Anomalies(series) => Some(series),
            _ => None,
        }
    }

    pub fn as_model_comparison(&self) -> Option<&ModelComparisonResponse> {
        match self {
            ResourceData::ModelComparison(comparison) => Some(comparison),
            _ => None,
        }
    }
}

/// Result type stored in the cache. The payload is shared between every
/// snapshot of the same entry.
pub type FetchResult = ResourceResult<Rc<ResourceData>>;
