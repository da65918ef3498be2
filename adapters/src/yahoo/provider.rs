use async_trait::async_trait;
use chrono::NaiveDate;
use corelib::{DataSourceError, MarketDataProvider, PriceSeries};
use tracing::warn;

use super::client::{YahooClient, YahooConfig};
use super::errors::YahooError;
use super::parser::ChartRows;

/// Daily prices from the Yahoo Finance chart API.
pub struct YahooProvider {
    client: YahooClient,
}

impl YahooProvider {
    pub fn new(config: YahooConfig) -> Result<Self, YahooError> {
        Ok(Self {
            client: YahooClient::new(config)?,
        })
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch_series(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, DataSourceError> {
        let chart = self
            .client
            .fetch_daily(ticker, start, end)
            .await
            .map_err(|e| DataSourceError::new(ticker, e))?;

        series_in_range(ticker, chart, start, end)
    }
}

/// Keeps rows dated in `[start, end)` and drops rows without a price.
pub fn series_in_range(
    ticker: &str,
    chart: ChartRows,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceSeries, DataSourceError> {
    let total = chart.rows.len();
    let rows: Vec<_> = chart
        .rows
        .into_iter()
        .filter(|(date, _)| *date >= start && *date < end)
        .collect();

    let series =
        PriceSeries::from_observations(ticker, rows).map_err(|e| DataSourceError::new(ticker, e))?;

    if series.len() < total {
        warn!(
            ticker,
            kept = series.len(),
            total,
            "dropped rows outside range or without a price"
        );
    }

    Ok(series)
}
