//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Server-side request timeouts.
    pub timeouts: TimeoutConfig,

    /// Outbound fetch settings for the feed relay.
    pub fetch: FetchConfig,

    /// Destination guard settings.
    pub guard: GuardConfig,

    /// Cache headers on relayed responses.
    pub cache: CacheConfig,

    /// Stock quote handler settings.
    pub quote: QuoteConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    ///
    /// Outer safety net; the fetch deadline normally fires first.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Outbound fetch configuration for the feed relay.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Hard wall-clock deadline for one fetch, headers and body included.
    pub timeout_ms: u64,

    /// `User-Agent` sent upstream.
    pub user_agent: String,

    /// `Accept` sent upstream.
    pub accept: String,

    /// Maximum number of redirects to follow.
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 12_000,
            user_agent: "TEN-Dashboard-V2/1.0".to_string(),
            accept: "application/rss+xml, application/atom+xml, application/xml, text/xml, text/plain, */*"
                .to_string(),
            max_redirects: 10,
        }
    }
}

/// How hostnames are classified by the destination guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GuardMode {
    /// Literal string rules, including the broad `172.2` prefix.
    #[default]
    Prefix,
    /// Name rules plus real address-range checks on IP literals.
    Network,
}

/// Destination guard configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GuardConfig {
    /// Classification mode.
    pub mode: GuardMode,

    /// Run every redirect hop through the guard as well.
    pub check_redirects: bool,
}

/// Cache headers for relayed feed bodies.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// `max-age` and `s-maxage` in seconds.
    pub max_age_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_age_secs: 60 }
    }
}

/// Stock quote handler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Ticker symbol to quote.
    pub symbol: String,

    /// Display name returned with the quote.
    pub name: String,

    /// Chart endpoint; the symbol is appended as a path segment.
    pub chart_base_url: String,

    /// Chart `interval` query parameter.
    pub interval: String,

    /// Chart `range` query parameter.
    pub range: String,

    /// `User-Agent` sent to the chart endpoint.
    pub user_agent: String,

    /// Deadline for the chart fetch.
    pub timeout_ms: u64,

    /// `max-age` on successful quote responses.
    pub cache_max_age_secs: u64,

    /// Values served when the chart endpoint fails.
    pub fallback: FallbackQuoteConfig,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            symbol: "TTE.PA".to_string(),
            name: "TotalEnergies SE".to_string(),
            chart_base_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            interval: "1d".to_string(),
            range: "5d".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            timeout_ms: 12_000,
            cache_max_age_secs: 15,
            fallback: FallbackQuoteConfig::default(),
        }
    }
}

/// Static quote values served on upstream failure.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FallbackQuoteConfig {
    pub price: String,
    pub previous_close: String,
    pub change: String,
    pub change_percent: String,
    pub currency: String,
    pub market_state: String,
}

impl Default for FallbackQuoteConfig {
    fn default() -> Self {
        Self {
            price: "60.14".to_string(),
            previous_close: "61.15".to_string(),
            change: "-1.01".to_string(),
            change_percent: "-1.65".to_string(),
            currency: "EUR".to_string(),
            market_state: "CLOSED".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
