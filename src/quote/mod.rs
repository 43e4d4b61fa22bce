//! Stock quote handler.
//!
//! Fetches one symbol's chart metadata and reshapes it into a small JSON quote.
//! Failures never surface as errors: the caller always gets 200, with a static
//! fallback quote flagged `fallback: true` when the upstream is unavailable.

pub mod handler;
pub mod service;
pub mod types;

pub use handler::stock_quote;
pub use service::{build_quote, fallback_quote, QuoteService};
pub use types::{ChartEnvelope, ChartMeta, QuoteError, StockQuote};
