//! reqwest-backed upstream client.
//!
//! # Responsibilities
//! - Send one GET with the configured headers
//! - Follow redirects (optionally re-checking each hop with the guard)
//! - Read the body as text before returning
//! - Abort the transfer when the cancellation token fires

use std::future::Future;

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::redirect::Policy;
use tokio_util::sync::CancellationToken;

use crate::config::{FetchConfig, GuardConfig};
use crate::fetch::{FetchError, OutboundRequest, Upstream, UpstreamResponse};
use crate::guard::DestinationGuard;

/// Upstream client backed by a shared reqwest connection pool.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    /// Create a client with the redirect policy derived from configuration.
    pub fn new(fetch: &FetchConfig, guard: &GuardConfig) -> Result<Self, FetchError> {
        let max_redirects = fetch.max_redirects;
        let policy = if guard.check_redirects {
            let guard = DestinationGuard::new(guard.mode);
            Policy::custom(move |attempt| {
                if attempt.previous().len() > max_redirects {
                    attempt.error("too many redirects")
                } else if !guard.permits(attempt.url()) {
                    tracing::warn!(target_url = %attempt.url(), "Redirect to blocked destination");
                    attempt.error("redirect to blocked destination")
                } else {
                    attempt.follow()
                }
            })
        } else {
            Policy::limited(max_redirects)
        };

        let client = reqwest::Client::builder()
            .redirect(policy)
            .build()
            .map_err(|e| FetchError::Setup(e.to_string()))?;

        Ok(Self { client })
    }

    async fn send(&self, request: OutboundRequest) -> Result<UpstreamResponse, FetchError> {
        let response = self
            .client
            .get(request.url)
            .header(USER_AGENT, request.user_agent)
            .header(ACCEPT, request.accept)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(UpstreamResponse { status, headers, body })
    }
}

impl Upstream for HttpUpstream {
    fn get(
        &self,
        request: OutboundRequest,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<UpstreamResponse, FetchError>> + Send {
        async move {
            tokio::select! {
                _ = cancel.cancelled() => Err(FetchError::Cancelled),
                result = self.send(request) => result,
            }
        }
    }
}
