//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → cors.rs (CORS headers on every response, OPTIONS preflight)
//!     → relay::relay_feed | quote::stock_quote
//!     → Send to client
//! ```

pub mod cors;
pub mod server;

pub use server::{build_router, AppState, HttpServer, QUOTE_PATH, RELAY_PATH};
