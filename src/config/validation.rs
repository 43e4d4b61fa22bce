//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check that outbound header values are sendable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} is not a socket address: {value}")]
    BadAddress { field: &'static str, value: String },

    #[error("{field} is not a valid header value")]
    BadHeader { field: &'static str },

    #[error("{field} is not an absolute http(s) URL: {value}")]
    BadUrl { field: &'static str, value: String },

    #[error("timeouts.request_secs must exceed {field}")]
    DeadlineOrder { field: &'static str },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    check_nonzero(&mut errors, "timeouts.request_secs", config.timeouts.request_secs);
    check_nonzero(&mut errors, "fetch.timeout_ms", config.fetch.timeout_ms);
    check_nonzero(&mut errors, "quote.timeout_ms", config.quote.timeout_ms);

    // The per-request limit must outlast the fetch deadlines, or it answers first.
    let request_ms = config.timeouts.request_secs.saturating_mul(1000);
    check_deadline_order(&mut errors, request_ms, "fetch.timeout_ms", config.fetch.timeout_ms);
    check_deadline_order(&mut errors, request_ms, "quote.timeout_ms", config.quote.timeout_ms);

    check_header(&mut errors, "fetch.user_agent", &config.fetch.user_agent);
    check_header(&mut errors, "fetch.accept", &config.fetch.accept);
    check_header(&mut errors, "quote.user_agent", &config.quote.user_agent);

    match Url::parse(&config.quote.chart_base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::BadUrl {
            field: "quote.chart_base_url",
            value: config.quote.chart_base_url.clone(),
        }),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_nonzero(errors: &mut Vec<ValidationError>, field: &'static str, value: u64) {
    if value == 0 {
        errors.push(ValidationError::Zero { field });
    }
}

fn check_deadline_order(
    errors: &mut Vec<ValidationError>,
    request_ms: u64,
    field: &'static str,
    deadline_ms: u64,
) {
    if request_ms <= deadline_ms {
        errors.push(ValidationError::DeadlineOrder { field });
    }
}

fn check_header(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.is_empty() || HeaderValue::from_str(value).is_err() {
        errors.push(ValidationError::BadHeader { field });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&RelayConfig::default()), Ok(()));
    }

    #[test]
    fn flags_bad_values() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.fetch.user_agent = "bad\nagent".into();
        config.quote.chart_base_url = "ftp://quotes.example/chart".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::BadHeader { field: "fetch.user_agent" }));
    }

    #[test]
    fn request_limit_must_outlast_fetch_deadlines() {
        let mut config = RelayConfig::default();
        config.timeouts.request_secs = 1;
        config.fetch.timeout_ms = 3000;
        config.quote.timeout_ms = 3000;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DeadlineOrder { field: "fetch.timeout_ms" },
                ValidationError::DeadlineOrder { field: "quote.timeout_ms" },
            ]
        );

        // Equal limits still race.
        config.timeouts.request_secs = 3;
        assert_eq!(validate_config(&config).unwrap_err().len(), 2);

        config.timeouts.request_secs = 4;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = RelayConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
