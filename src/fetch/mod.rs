//! Outbound fetch subsystem.
//!
//! # Data Flow
//! ```text
//! OutboundRequest
//!     → BoundedFetcher (deadline.rs arms timer, owns cancellation token)
//!     → Upstream::get (client.rs: reqwest, redirects, body read)
//!     → UpstreamResponse | FetchError
//! ```
//!
//! # Design Decisions
//! - Every outbound call has a deadline; headers and body are both inside it
//! - The upstream client is a trait so handlers can be driven with fakes
//! - All transport failures collapse into one error type

pub mod client;
pub mod deadline;

use std::future::Future;
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::FetchConfig;

pub use client::HttpUpstream;
pub use deadline::with_deadline;

/// Errors that can occur while fetching from an upstream.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The deadline elapsed before the fetch completed.
    #[error("fetch timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The fetch was cancelled before it completed.
    #[error("fetch cancelled")]
    Cancelled,

    /// Connection, DNS, TLS, redirect or body read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The HTTP client could not be constructed.
    #[error("client setup failed: {0}")]
    Setup(String),
}

/// One outbound GET.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub url: Url,
    pub user_agent: String,
    pub accept: String,
}

/// Status, headers and body text of a completed upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

/// An outbound HTTP client.
///
/// Implementations should stop work once `cancel` fires; the caller also drops
/// the returned future at that point.
pub trait Upstream: Clone + Send + Sync + 'static {
    fn get(
        &self,
        request: OutboundRequest,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<UpstreamResponse, FetchError>> + Send;
}

/// An [`Upstream`] with a fixed deadline and header set.
#[derive(Debug, Clone)]
pub struct BoundedFetcher<U> {
    upstream: U,
    timeout: Duration,
    user_agent: String,
    accept: String,
}

impl<U: Upstream> BoundedFetcher<U> {
    /// Build a fetcher from the relay's fetch configuration.
    pub fn new(upstream: U, config: &FetchConfig) -> Self {
        Self {
            upstream,
            timeout: Duration::from_millis(config.timeout_ms),
            user_agent: config.user_agent.clone(),
            accept: config.accept.clone(),
        }
    }

    /// Build a fetcher with explicit settings.
    pub fn with_settings(
        upstream: U,
        timeout: Duration,
        user_agent: impl Into<String>,
        accept: impl Into<String>,
    ) -> Self {
        Self {
            upstream,
            timeout,
            user_agent: user_agent.into(),
            accept: accept.into(),
        }
    }

    /// GET `url` under this fetcher's deadline.
    pub async fn fetch(&self, url: Url) -> Result<UpstreamResponse, FetchError> {
        let request = OutboundRequest {
            url,
            user_agent: self.user_agent.clone(),
            accept: self.accept.clone(),
        };
        with_deadline(self.timeout, |cancel| self.upstream.get(request, cancel)).await
    }
}
