use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::PriceSeries;

/// Boxed source error so adapters can surface their own error types
/// without this crate depending on them.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Opaque failure reported by a market data provider.
#[derive(Error, Debug)]
#[error("market data for {ticker} unavailable: {source}")]
pub struct DataSourceError {
    pub ticker: String,

    #[source]
    pub source: BoxError,
}

impl DataSourceError {
    pub fn new(ticker: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            ticker: ticker.into(),
            source: source.into(),
        }
    }
}

/// Supplies daily prices for one instrument.
///
/// Implementations return an empty or partial series when the symbol or the
/// range has no history; `Err` is reserved for actual provider failures.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Prices for `ticker` on dates in `[start, end)`.
    async fn fetch_series(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataSourceError>;
}
