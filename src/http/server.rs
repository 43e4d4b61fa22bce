//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with both handlers
//! - Wire up middleware (CORS headers, request ID, tracing, timeout)
//! - Bind server to listener and serve until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::fetch::{FetchError, HttpUpstream, Upstream};
use crate::http::cors;
use crate::lifecycle::shutdown;
use crate::quote::{stock_quote, QuoteService};
use crate::relay::{relay_feed, FeedRelay};

/// Feed relay endpoint.
pub const RELAY_PATH: &str = "/api/rss-proxy";
/// Stock quote endpoint.
pub const QUOTE_PATH: &str = "/api/stock";

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState<U> {
    pub relay: Arc<FeedRelay<U>>,
    pub quotes: Arc<QuoteService<U>>,
}

impl<U: Upstream> AppState<U> {
    pub fn new(upstream: U, config: &RelayConfig) -> Self {
        Self {
            relay: Arc::new(FeedRelay::new(upstream.clone(), config)),
            quotes: Arc::new(QuoteService::new(upstream, &config.quote)),
        }
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router<U: Upstream>(config: &RelayConfig, state: AppState<U>) -> Router {
    Router::new()
        .route(RELAY_PATH, get(relay_feed::<U>).options(cors::preflight))
        .route(QUOTE_PATH, get(stock_quote::<U>).options(cors::preflight))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(cors::allow_origin_layer())
                .layer(cors::allow_methods_layer())
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(config.timeouts.request_secs),
                )),
        )
}

/// HTTP server for the edge relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a server that fetches through reqwest.
    pub fn new(config: RelayConfig) -> Result<Self, FetchError> {
        let upstream = HttpUpstream::new(&config.fetch, &config.guard)?;
        Ok(Self::with_upstream(config, upstream))
    }

    /// Create a server around any upstream client.
    pub fn with_upstream<U: Upstream>(config: RelayConfig, upstream: U) -> Self {
        let state = AppState::new(upstream, &config);
        let router = build_router(&config, state);
        Self { router, config }
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Serve on `listener` until `signal` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        signal: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            guard_mode = ?self.config.guard.mode,
            fetch_timeout_ms = self.config.fetch.timeout_ms,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(signal))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
