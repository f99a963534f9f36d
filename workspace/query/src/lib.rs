//! Client-side data fetching for the HIRD dashboard.
//!
//! Filter changes flow through [`FilterStore`] / [`FilterState::reduce`];
//! consumers derive a [`ResourceRequest`] per panel and ask the shared
//! [`QueryClient`] for it. The client de-duplicates concurrent fetches per
//! [`QueryKey`], keeps the last result while refetching after
//! [`QueryClient::invalidate_all`], and hands out [`QuerySnapshot`]s.
//! The HTTP layer is abstracted behind [`Transport`] so the same core runs in
//! the browser and in the native CLI.

pub mod cache;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod request;
pub mod result;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{EvictionPolicy, QueryClient, QuerySnapshot, Spawner, Subscription};
pub use error::{classify, ClassifiedError, ErrorKind, FetchFailure};
pub use fetcher::ResourceFetcher;
pub use filter::{
    FilterAction, FilterParseError, FilterState, FilterStore, Horizon, ModelType, SqftRange,
    DEFAULT_CITY, SQFT_CEILING, SQFT_FLOOR,
};
pub use request::{dashboard_requests, QueryKey, ResourceKind, ResourceRequest, UnknownResourceKind};
pub use result::{FetchResult, ResourceData, ResourceResult};
pub use transport::{HttpResponse, Transport, TransportError};
