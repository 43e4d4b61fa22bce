//! Cross-origin headers.
//!
//! Every response, success or failure, may be read by any origin. Preflight
//! probes are answered directly without touching the handlers.

use axum::http::{header, HeaderValue, StatusCode};
use tower_http::set_header::SetResponseHeaderLayer;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, OPTIONS";

/// `Access-Control-Allow-Origin: *`, overriding anything set further in.
pub fn allow_origin_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    )
}

/// `Access-Control-Allow-Methods: GET, OPTIONS`.
pub fn allow_methods_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    )
}

/// `OPTIONS` on any handler path: 200, empty body.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
