use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use common::Target;
use thiserror::Error;

use crate::filter::{FilterState, Horizon};

/// Named data category served by the dashboard API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Cities,
    Forecast,
    Sentiment,
    Risk,
    Anomalies,
    ModelComparison,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown resource kind '{0}'")]
pub struct UnknownResourceKind(pub String);

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Cities,
        ResourceKind::Forecast,
        ResourceKind::Sentiment,
        ResourceKind::Risk,
        ResourceKind::Anomalies,
        ResourceKind::ModelComparison,
    ];

    /// Endpoint path relative to the API origin.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Cities => "/cities",
            ResourceKind::Forecast => "/forecast",
            ResourceKind::Sentiment => "/sentiment",
            ResourceKind::Risk => "/risk",
            ResourceKind::Anomalies => "/anomalies",
            ResourceKind::ModelComparison => "/model-comparison",
        }
    }

    pub fn name(&self) -> &'static str {
        &self.path()[1..]
    }

    /// Wording used in user-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ResourceKind::Cities => "city list",
            ResourceKind::Forecast => "forecast",
            ResourceKind::Sentiment => "sentiment",
            ResourceKind::Risk => "risk gauge",
            ResourceKind::Anomalies => "market anomaly",
            ResourceKind::ModelComparison => "model comparison",
        }
    }

    /// Whether the `target` query parameter is part of the request.
    pub fn uses_target(&self) -> bool {
        matches!(self, ResourceKind::Forecast | ResourceKind::ModelComparison)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = UnknownResourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        ResourceKind::ALL
            .into_iter()
            .find(|k| k.name() == normalized)
            .ok_or_else(|| UnknownResourceKind(s.to_string()))
    }
}

/// Canonical cache key: endpoint path plus the encoded query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encodes parameters in the given order using form-urlencoding.
pub(crate) fn encode_query(params: &[(&'static str, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
        .finish()
}

fn path_and_query(path: &str, params: &[(&'static str, String)]) -> String {
    if params.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, encode_query(params))
    }
}

/// Immutable description of one resource fetch, derived from a filter
/// snapshot. Two requests derived from equal relevant filter fields have
/// equal keys.
#[derive(Debug, Clone)]
pub struct ResourceRequest {
    kind: ResourceKind,
    target: Option<Target>,
    params: Vec<(&'static str, String)>,
    key: QueryKey,
    city: Rc<str>,
    horizon: Horizon,
    filter_summary: String,
}

impl PartialEq for ResourceRequest {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for ResourceRequest {}

impl ResourceRequest {
    /// Derives the request for `kind` from the relevant subset of `filters`.
    /// `target` is ignored by kinds that do not take one.
    pub fn derive(kind: ResourceKind, filters: &FilterState, target: Target) -> Self {
        let mut params: Vec<(&'static str, String)> = Vec::new();

        match kind {
            ResourceKind::Cities => {}
            ResourceKind::Forecast => {
                params.push(("city", filters.city.to_string()));
                params.push(("horizon", filters.horizon.query_value().to_string()));
                params.push(("target", target.as_str().to_string()));
                params.push(("model", filters.model_type.query_value().to_string()));
                if let Some(sqft) = filters.sqft {
                    params.push(("sqftMin", sqft.min().to_string()));
                    params.push(("sqftMax", sqft.max().to_string()));
                }
                if let Some(property_type) = &filters.property_type {
                    params.push(("propertyType", property_type.to_string()));
                }
                if let Some(beds) = &filters.beds {
                    params.push(("beds", beds.to_string()));
                }
                if let Some(baths) = &filters.baths {
                    params.push(("baths", baths.to_string()));
                }
            }
            ResourceKind::Sentiment | ResourceKind::Risk | ResourceKind::Anomalies => {
                params.push(("city", filters.city.to_string()));
            }
            ResourceKind::ModelComparison => {
                params.push(("city", filters.city.to_string()));
                params.push(("target", target.as_str().to_string()));
            }
        }

        let key = QueryKey(path_and_query(kind.path(), &params));
        let filter_summary = summarize(kind, filters, target);

        Self {
            kind,
            target: kind.uses_target().then_some(target),
            params,
            key,
            city: Rc::clone(&filters.city),
            horizon: filters.horizon,
            filter_summary,
        }
    }

    /// Request for the city list, which does not depend on any filter.
    pub fn cities() -> Self {
        Self::derive(ResourceKind::Cities, &FilterState::default(), Target::default())
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn target(&self) -> Option<Target> {
        self.target
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// Query parameters in the order they are sent.
    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    pub fn query_string(&self) -> String {
        encode_query(&self.params)
    }

    /// Path and query of the HTTP request, relative to the API origin.
    pub fn path_and_query(&self) -> &str {
        self.key.as_str()
    }

    /// Path and query of one per-target sub-request. Anomalies are fetched
    /// once per target; the target is appended after the request's own
    /// parameters.
    pub fn sub_request_path(&self, target: Target) -> String {
        let mut params = self.params.clone();
        params.push(("target", target.as_str().to_string()));
        path_and_query(self.kind.path(), &params)
    }

    /// Human-readable restatement of the active filters.
    pub fn filter_summary(&self) -> &str {
        &self.filter_summary
    }
}

fn summarize(kind: ResourceKind, filters: &FilterState, target: Target) -> String {
    match kind {
        ResourceKind::Cities => "all cities".to_string(),
        ResourceKind::Forecast => {
            let mut parts = vec![filters.city.to_string()];
            parts.push(match &filters.property_type {
                Some(property_type) => property_type.to_string(),
                None => "any property type".to_string(),
            });
            parts.push(match filters.sqft {
                Some(sqft) => format!("{}-{} sqft", sqft.min(), sqft.max()),
                None => "any size".to_string(),
            });
            if let Some(beds) = &filters.beds {
                parts.push(format!("{} beds", beds));
            }
            if let Some(baths) = &filters.baths {
                parts.push(format!("{} baths", baths));
            }
            parts.push(format!("{} model", filters.model_type.label()));
            parts.push(format!("horizon {}", filters.horizon.label()));
            format!("{} ({})", parts.join(", "), target)
        }
        ResourceKind::ModelComparison => format!("{} ({})", filters.city, target),
        ResourceKind::Sentiment | ResourceKind::Risk | ResourceKind::Anomalies => {
            filters.city.to_string()
        }
    }
}

/// Requests rendered by the dashboard for one filter snapshot, in panel order.
pub fn dashboard_requests(filters: &FilterState) -> Vec<ResourceRequest> {
    vec![
        ResourceRequest::derive(ResourceKind::Forecast, filters, Target::Price),
        ResourceRequest::derive(ResourceKind::Forecast, filters, Target::Rent),
        ResourceRequest::derive(ResourceKind::Sentiment, filters, Target::Price),
        ResourceRequest::derive(ResourceKind::Risk, filters, Target::Price),
        ResourceRequest::derive(ResourceKind::Anomalies, filters, Target::Price),
        ResourceRequest::derive(ResourceKind::ModelComparison, filters, Target::Price),
    ]
}
