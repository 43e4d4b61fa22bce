use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::fetch::Upstream;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::relay::error::JSON_CONTENT_TYPE;

/// `GET /api/stock`: always 200, live quote or fallback.
pub async fn stock_quote<U: Upstream>(State(state): State<AppState<U>>) -> Response {
    let quote = state.quotes.quote_or_fallback().await;
    let fallback = quote.fallback.unwrap_or(false);
    metrics::record_quote(fallback);

    if fallback {
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
            Json(quote),
        )
            .into_response();
    }

    let max_age = state.quotes.config().cache_max_age_secs;
    let cache_control = HeaderValue::from_str(&format!("public, max-age={max_age}"))
        .unwrap_or_else(|_| HeaderValue::from_static("no-store"));

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE)),
            (header::CACHE_CONTROL, cache_control),
        ],
        Json(quote),
    )
        .into_response()
}
