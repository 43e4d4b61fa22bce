use std::time::Instant;

use axum::extract::{RawQuery, State};
use axum::response::{IntoResponse, Response};

use crate::fetch::Upstream;
use crate::http::server::AppState;
use crate::observability::metrics;

/// `GET /api/rss-proxy?url=...`
pub async fn relay_feed<U: Upstream>(
    State(state): State<AppState<U>>,
    RawQuery(query): RawQuery,
) -> Response {
    let started = Instant::now();

    match state.relay.relay(query.as_deref()).await {
        Ok(response) => {
            metrics::record_relay("relayed", response.status().as_u16(), started);
            response
        }
        Err(err) => {
            tracing::debug!(code = %err.code(), error = %err, "Relay request failed");
            metrics::record_relay(err.outcome(), err.status().as_u16(), started);
            err.into_response()
        }
    }
}
