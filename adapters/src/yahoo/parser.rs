//! Yahoo Finance chart response parser
//!
//! The v8 chart endpoint returns columnar data: one `timestamp` array and,
//! under `indicators`, parallel arrays of OHLCV values plus an optional
//! `adjclose` array:
//!
//! ```jsonc
//! {
//!   "chart": {
//!     "result": [{
//!       "meta": { "symbol": "AAPL", "gmtoffset": -18000, ... },
//!       "timestamp": [1609770600, ...],
//!       "indicators": {
//!         "quote": [{ "close": [129.41, null, ...], ... }],
//!         "adjclose": [{ "adjclose": [127.16, null, ...] }]
//!       }
//!     }],
//!     "error": null
//!   }
//! }
//! ```
//!
//! Rows are dated in exchange-local time (timestamp + `gmtoffset`). Null
//! prices are kept as `None` here and dropped when the series is built.
//! If a date appears twice (Yahoo sometimes appends a live bar for the
//! current session) the later row wins.

use chrono::{DateTime, NaiveDate};

use super::errors::YahooError;
use super::types::{ChartEnvelope, ChartResult};

/// Which price column to extract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PriceField {
    Close,

    /// Split/dividend adjusted close; falls back to `Close` when absent.
    #[default]
    AdjClose,
}

/// Daily rows for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRows {
    pub symbol: String,
    pub rows: Vec<(NaiveDate, Option<f64>)>,
}

pub fn parse_chart(raw: &str, field: PriceField) -> Result<ChartRows, YahooError> {
    let envelope: ChartEnvelope = serde_json::from_str(raw)?;

    if let Some(err) = envelope.chart.error {
        return Err(YahooError::Api {
            code: err.code,
            description: err.description,
        });
    }

    let results = envelope
        .chart
        .result
        .ok_or_else(|| YahooError::InvalidResponse("chart has neither result nor error".into()))?;

    match results.into_iter().next() {
        Some(result) => rows_from_result(result, field),
        None => Ok(ChartRows {
            symbol: String::new(),
            rows: Vec::new(),
        }),
    }
}

fn rows_from_result(result: ChartResult, field: PriceField) -> Result<ChartRows, YahooError> {
    let symbol = result.meta.symbol;
    let offset = result.meta.gmtoffset;
    let n = result.timestamp.len();

    if n == 0 {
        return Ok(ChartRows {
            symbol,
            rows: Vec::new(),
        });
    }

    let close = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let adjusted = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .filter(|a| !a.is_empty());

    let prices = match (field, adjusted) {
        (PriceField::AdjClose, Some(adj)) => adj,
        _ => close,
    };

    if prices.len() != n {
        return Err(YahooError::InvalidResponse(format!(
            "{symbol}: {n} timestamps but {} prices",
            prices.len()
        )));
    }

    let mut rows: Vec<(NaiveDate, Option<f64>)> = Vec::with_capacity(n);

    for (&ts, price) in result.timestamp.iter().zip(prices) {
        let date = ts
            .checked_add(offset)
            .and_then(|local| DateTime::from_timestamp(local, 0))
            .ok_or_else(|| YahooError::InvalidResponse(format!("{symbol}: bad timestamp {ts}")))?
            .date_naive();

        if let Some(last) = rows.last_mut() {
            if last.0 == date {
                if price.is_some() {
                    last.1 = price;
                }
                continue;
            }
            if last.0 > date {
                return Err(YahooError::InvalidResponse(format!(
                    "{symbol}: timestamps out of order at {date}"
                )));
            }
        }

        rows.push((date, price));
    }

    Ok(ChartRows { symbol, rows })
}
