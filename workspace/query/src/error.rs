use serde::Serialize;
use thiserror::Error;

use crate::request::{ResourceKind, ResourceRequest};
use crate::transport::TransportError;

/// Category of a failed fetch. Renderers branch on this and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// The request never completed.
    Network,
    /// Server-side or unexpected failure, including malformed payloads.
    HttpError,
    /// No data for the current filter combination.
    NotFound,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::HttpError => "http-error",
            ErrorKind::NotFound => "not-found",
        }
    }
}

/// Normalized fetch failure carried inside a `ResourceResult`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct ClassifiedError {
    kind: ErrorKind,
    message: String,
    details: String,
}

impl ClassifiedError {
    pub(crate) fn new(kind: ErrorKind, message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: details.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

/// Raw reason a fetch produced no data, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The transport gave up before a response arrived.
    Transport(TransportError),
    /// The server answered with a non-success status.
    Status(u16),
    /// A success response whose body did not match the expected shape.
    Payload(String),
    /// Every sub-request of a composite fetch failed.
    Unavailable { failed: usize },
}

impl FetchFailure {
    /// `None` for success statuses (200..=299).
    pub fn from_status(status: u16) -> Option<Self> {
        if (200..=299).contains(&status) {
            None
        } else {
            Some(FetchFailure::Status(status))
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchFailure::Status(404))
    }
}

const SERVER_UNAVAILABLE: &str = "Server is unavailable, please try again later.";

/// Turns a failure into the error value shown to the user.
pub fn classify(failure: &FetchFailure, request: &ResourceRequest) -> ClassifiedError {
    let resource = request.kind().display_name();

    match failure {
        FetchFailure::Status(404) => not_found(request),
        FetchFailure::Status(status) => ClassifiedError::new(
            ErrorKind::HttpError,
            "Something went wrong",
            format!("{} (HTTP {})", SERVER_UNAVAILABLE, status),
        ),
        FetchFailure::Unavailable { failed } => ClassifiedError::new(
            ErrorKind::HttpError,
            "Something went wrong",
            format!("{} (all {} requests failed)", SERVER_UNAVAILABLE, failed),
        ),
        FetchFailure::Transport(err) => ClassifiedError::new(
            ErrorKind::Network,
            "Network failure",
            format!(
                "Unable to fetch {} data for {}. Please check your internet connection or try again later.\n{}",
                resource,
                request.city(),
                err
            ),
        ),
        FetchFailure::Payload(reason) => ClassifiedError::new(
            ErrorKind::HttpError,
            format!("Unexpected {} response", resource),
            format!("The server returned {} data in an unexpected shape: {}", resource, reason),
        ),
    }
}

fn not_found(request: &ResourceRequest) -> ClassifiedError {
    match request.kind() {
        ResourceKind::Anomalies => ClassifiedError::new(
            ErrorKind::NotFound,
            format!("No market anomaly data found for {}.", request.city()),
            "We don't have anomaly insights for this city yet, our models are still training. \
             Please check back soon or try selecting another location.",
        ),
        kind => ClassifiedError::new(
            ErrorKind::NotFound,
            format!("No {} data available", kind.display_name()),
            format!(
                "We don't have results for {}. Try adjusting filters.",
                request.filter_summary()
            ),
        ),
    }
}
