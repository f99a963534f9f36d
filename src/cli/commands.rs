use thiserror::Error;

pub mod cities;
pub mod dashboard;
pub mod fetch;

pub use cities::cities;
pub use dashboard::dashboard;
pub use fetch::fetch;

/// A command printed its results but at least one fetch failed.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{resource}: {message}")]
    FetchFailed { resource: String, message: String },
    #[error("{failed} of {total} panels failed to load")]
    PanelsFailed { failed: usize, total: usize },
}
