//! Feed relay: fetch a caller-supplied URL server-side and hand back the text.
//!
//! # Request Flow
//! ```text
//! OPTIONS            → 200, empty (http/cors.rs)
//! GET ?url=...
//!     → extract target      missing  → 400 missing_url
//!     → parse target        bad      → 400 invalid_url
//!     → guard check         blocked  → 403 blocked_url
//!     → bounded fetch       failure  → 500 rss_proxy_failed
//!     → upstream status     non-2xx  → N   upstream_N
//!     → relay body as text/plain, 200
//! ```
//!
//! Single pass, no retries, no state kept between requests.

pub mod error;
pub mod handler;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use url::Url;

use crate::config::RelayConfig;
use crate::fetch::{BoundedFetcher, Upstream};
use crate::guard::DestinationGuard;

pub use error::RelayError;
pub use handler::relay_feed;

/// Content type of every relayed body.
pub const RELAYED_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Read the first `url` parameter from a raw query string.
///
/// An empty value counts as missing.
pub fn extract_target(query: Option<&str>) -> Result<String, RelayError> {
    query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "url")
                .map(|(_, value)| value.into_owned())
        })
        .filter(|value| !value.is_empty())
        .ok_or(RelayError::MissingUrl)
}

/// Parse the target as an absolute URL.
pub fn parse_target(raw: &str) -> Result<Url, RelayError> {
    Ok(Url::parse(raw)?)
}

/// Everything one relay invocation needs.
#[derive(Debug, Clone)]
pub struct FeedRelay<U> {
    guard: DestinationGuard,
    fetcher: BoundedFetcher<U>,
    cache_control: HeaderValue,
}

impl<U: Upstream> FeedRelay<U> {
    pub fn new(upstream: U, config: &RelayConfig) -> Self {
        Self {
            guard: DestinationGuard::new(config.guard.mode),
            fetcher: BoundedFetcher::new(upstream, &config.fetch),
            cache_control: cache_control(config.cache.max_age_secs),
        }
    }

    /// Run the relay state machine for one GET.
    pub async fn relay(&self, query: Option<&str>) -> Result<Response, RelayError> {
        let raw = extract_target(query)?;
        let target = parse_target(&raw)?;

        if !self.guard.permits(&target) {
            tracing::warn!(
                scheme = target.scheme(),
                host = target.host_str().unwrap_or(""),
                "Blocked relay target"
            );
            return Err(RelayError::BlockedUrl(target.host_str().unwrap_or("").to_string()));
        }

        tracing::debug!(target_url = %target, "Fetching relay target");
        let upstream = self.fetcher.fetch(target).await?;

        if !upstream.status.is_success() {
            tracing::warn!(status = upstream.status.as_u16(), "Upstream returned failure status");
            return Err(RelayError::Upstream(upstream.status));
        }

        tracing::debug!(bytes = upstream.body.len(), "Relaying upstream body");
        Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(RELAYED_CONTENT_TYPE)),
                (header::CACHE_CONTROL, self.cache_control.clone()),
            ],
            upstream.body,
        )
            .into_response())
    }
}

/// `Cache-Control` for relayed bodies, shared and private caches alike.
pub fn cache_control(max_age_secs: u64) -> HeaderValue {
    HeaderValue::from_str(&format!("public, max-age={max_age_secs}, s-maxage={max_age_secs}"))
        .unwrap_or_else(|_| HeaderValue::from_static("no-store"))
}
