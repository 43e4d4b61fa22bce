//! Stock quote payloads.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fetch::FetchError;

/// Chart API envelope: `{"chart": {"result": [{"meta": {...}}]}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartEnvelope {
    #[serde(default)]
    pub chart: Option<Chart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    pub meta: ChartMeta,
}

/// The subset of chart metadata the quote is built from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub regular_market_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub chart_previous_close: Option<f64>,
    pub currency: Option<String>,
    pub market_state: Option<String>,
    pub regular_market_day_high: Option<f64>,
    pub regular_market_day_low: Option<f64>,
    pub regular_market_volume: Option<serde_json::Number>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

impl ChartEnvelope {
    /// Metadata of the first chart result, if any.
    pub fn into_meta(self) -> Option<ChartMeta> {
        self.chart?.result?.into_iter().next().map(|r| r.meta)
    }
}

/// Quote returned to callers; monetary values are two-decimal strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockQuote {
    pub symbol: String,
    pub name: String,
    pub price: String,
    pub previous_close: String,
    pub change: String,
    pub change_percent: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_high: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_low: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<serde_json::Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_high: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_low: Option<String>,
    /// Set only on the static fallback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<bool>,
    /// Why the fallback was served.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub last_update: String,
}

/// Reasons a live quote could not be produced.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quote upstream returned {0}")]
    Status(u16),

    #[error("no data from quote upstream")]
    NoData,

    #[error("malformed chart payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid chart endpoint: {0}")]
    Endpoint(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
