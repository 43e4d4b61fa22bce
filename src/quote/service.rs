//! Chart fetch and reshaping into a [`StockQuote`].

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use url::Url;

use crate::config::QuoteConfig;
use crate::fetch::{BoundedFetcher, Upstream};
use crate::quote::types::{ChartEnvelope, ChartMeta, QuoteError, StockQuote};

/// Fetches the configured symbol and falls back to static values on failure.
#[derive(Debug, Clone)]
pub struct QuoteService<U> {
    fetcher: BoundedFetcher<U>,
    config: QuoteConfig,
}

impl<U: Upstream> QuoteService<U> {
    pub fn new(upstream: U, config: &QuoteConfig) -> Self {
        Self {
            fetcher: BoundedFetcher::with_settings(
                upstream,
                Duration::from_millis(config.timeout_ms),
                config.user_agent.clone(),
                "application/json",
            ),
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    /// `{chart_base_url}/{symbol}?interval=..&range=..`
    pub fn chart_url(&self) -> Result<Url, QuoteError> {
        let mut url = Url::parse(&self.config.chart_base_url)
            .map_err(|e| QuoteError::Endpoint(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| QuoteError::Endpoint(self.config.chart_base_url.clone()))?
            .pop_if_empty()
            .push(&self.config.symbol);
        url.query_pairs_mut()
            .append_pair("interval", &self.config.interval)
            .append_pair("range", &self.config.range);
        Ok(url)
    }

    /// Fetch and reshape a live quote.
    pub async fn fetch_quote(&self) -> Result<StockQuote, QuoteError> {
        let upstream = self.fetcher.fetch(self.chart_url()?).await?;
        if !upstream.status.is_success() {
            return Err(QuoteError::Status(upstream.status.as_u16()));
        }

        let envelope: ChartEnvelope = serde_json::from_str(&upstream.body)?;
        let meta = envelope.into_meta().ok_or(QuoteError::NoData)?;
        Ok(build_quote(&self.config, meta, now_iso()))
    }

    /// A live quote, or the fallback with the failure reason attached.
    pub async fn quote_or_fallback(&self) -> StockQuote {
        match self.fetch_quote().await {
            Ok(quote) => quote,
            Err(e) => {
                tracing::warn!(symbol = %self.config.symbol, error = %e, "Serving fallback quote");
                fallback_quote(&self.config, &e.to_string(), now_iso())
            }
        }
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Two decimals, exact halves rounded away from zero.
fn fixed2(value: f64) -> String {
    match Decimal::from_f64_retain(value) {
        Some(exact) => {
            let rounded = exact.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("{rounded:.2}")
        }
        None => format!("{value:.2}"),
    }
}

/// Zero and missing are treated alike, as are non-finite values.
fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

/// Reshape chart metadata into a quote.
pub fn build_quote(config: &QuoteConfig, meta: ChartMeta, last_update: String) -> StockQuote {
    let price = nonzero(meta.regular_market_price).unwrap_or(0.0);
    let previous_close = nonzero(meta.previous_close)
        .or(nonzero(meta.chart_previous_close))
        .unwrap_or(0.0);
    let change = price - previous_close;
    let change_percent = if previous_close != 0.0 {
        change / previous_close * 100.0
    } else {
        0.0
    };

    StockQuote {
        symbol: config.symbol.clone(),
        name: config.name.clone(),
        price: fixed2(price),
        previous_close: fixed2(previous_close),
        change: fixed2(change),
        change_percent: fixed2(change_percent),
        currency: meta
            .currency
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "EUR".to_string()),
        market_state: meta.market_state,
        day_high: meta.regular_market_day_high.map(fixed2),
        day_low: meta.regular_market_day_low.map(fixed2),
        volume: meta.regular_market_volume,
        fifty_two_week_high: meta.fifty_two_week_high.map(fixed2),
        fifty_two_week_low: meta.fifty_two_week_low.map(fixed2),
        fallback: None,
        error: None,
        last_update,
    }
}

/// The static quote served when the chart endpoint fails.
pub fn fallback_quote(config: &QuoteConfig, error: &str, last_update: String) -> StockQuote {
    let fallback = &config.fallback;
    StockQuote {
        symbol: config.symbol.clone(),
        name: config.name.clone(),
        price: fallback.price.clone(),
        previous_close: fallback.previous_close.clone(),
        change: fallback.change.clone(),
        change_percent: fallback.change_percent.clone(),
        currency: fallback.currency.clone(),
        market_state: Some(fallback.market_state.clone()),
        day_high: None,
        day_low: None,
        volume: None,
        fifty_two_week_high: None,
        fifty_two_week_low: None,
        fallback: Some(true),
        error: Some(error.to_string()),
        last_update,
    }
}
