//! Edge relay library.
//!
//! Fetches a caller-supplied URL server-side and relays the text, refusing
//! loopback and private-network destinations. A sibling handler serves a
//! single stock quote with a static fallback.

pub mod config;
pub mod fetch;
pub mod guard;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod quote;
pub mod relay;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
