//! Relay failures and their wire envelope.

use std::borrow::Cow;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::fetch::FetchError;

/// Content type of every error envelope.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Terminal failures of one relay request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// No `url` query parameter, or an empty one.
    #[error("missing url parameter")]
    MissingUrl,

    /// `url` is not an absolute URL.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Scheme is not http(s) or the host is guarded.
    #[error("blocked destination: {0}")]
    BlockedUrl(String),

    /// Upstream answered with a non-success status.
    #[error("upstream responded {0}")]
    Upstream(StatusCode),

    /// Timeout, DNS, connect or read failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl RelayError {
    /// Machine-readable code placed in the `error` field.
    pub fn code(&self) -> Cow<'static, str> {
        match self {
            RelayError::MissingUrl => Cow::Borrowed("missing_url"),
            RelayError::InvalidUrl(_) => Cow::Borrowed("invalid_url"),
            RelayError::BlockedUrl(_) => Cow::Borrowed("blocked_url"),
            RelayError::Upstream(status) => Cow::Owned(format!("upstream_{}", status.as_u16())),
            RelayError::Fetch(_) => Cow::Borrowed("rss_proxy_failed"),
        }
    }

    /// HTTP status returned to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingUrl | RelayError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            RelayError::BlockedUrl(_) => StatusCode::FORBIDDEN,
            RelayError::Upstream(status) => *status,
            RelayError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Metrics label; upstream statuses share one bucket.
    pub fn outcome(&self) -> &'static str {
        match self {
            RelayError::MissingUrl => "missing_url",
            RelayError::InvalidUrl(_) => "invalid_url",
            RelayError::BlockedUrl(_) => "blocked_url",
            RelayError::Upstream(_) => "upstream_status",
            RelayError::Fetch(_) => "rss_proxy_failed",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let code = self.code();
        (
            self.status(),
            [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
            Json(ErrorBody { error: &code }),
        )
            .into_response()
    }
}
