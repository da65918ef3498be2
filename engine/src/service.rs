use std::sync::Arc;

use chrono::NaiveDate;
use common::logger::{TraceId, annotate_pair, child_span, root_span};
use corelib::{MarketDataProvider, SpreadRecord};
use serde::{Deserialize, Serialize};
use tracing::{Instrument, info};

use crate::analyzer::analyze;
use crate::config::AnalysisParams;
use crate::error::AnalysisError;

/// One spread analysis for a ticker pair over `[start, end)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub ticker_a: String,
    pub ticker_b: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub params: AnalysisParams,
}

impl AnalysisRequest {
    pub fn new(
        ticker_a: impl Into<String>,
        ticker_b: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            ticker_a: ticker_a.into(),
            ticker_b: ticker_b.into(),
            start,
            end,
            params: AnalysisParams::default(),
        }
    }

    pub fn with_params(mut self, params: AnalysisParams) -> Self {
        self.params = params;
        self
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.ticker_a.trim().is_empty() || self.ticker_b.trim().is_empty() {
            return Err(AnalysisError::invalid("ticker symbols must not be empty"));
        }

        if self.start >= self.end {
            return Err(AnalysisError::invalid(format!(
                "start date {} must be before end date {}",
                self.start, self.end
            )));
        }

        self.params.validate()
    }
}

/// Fetches both legs from a market data provider and runs the analyzer.
#[derive(Clone)]
pub struct SpreadService {
    provider: Arc<dyn MarketDataProvider>,
}

impl SpreadService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Validation happens before the provider is called. Provider failures
    /// surface as [`AnalysisError::DataSource`] unchanged.
    pub async fn run(&self, req: &AnalysisRequest) -> Result<Vec<SpreadRecord>, AnalysisError> {
        let trace_id = TraceId::new();
        let span = root_span("spread_analysis", &trace_id);

        async move {
            req.validate()?;
            annotate_pair(&req.ticker_a, &req.ticker_b);

            let fetch = async {
                tokio::try_join!(
                    self.provider.fetch_series(&req.ticker_a, req.start, req.end),
                    self.provider.fetch_series(&req.ticker_b, req.start, req.end),
                )
            };
            let (a, b) = fetch.instrument(child_span("fetch_prices")).await?;

            info!(
                ticker_a = %req.ticker_a,
                ticker_b = %req.ticker_b,
                len_a = a.len(),
                len_b = b.len(),
                "price series fetched"
            );

            let records = analyze(&a, &b, &req.params)?;

            info!(records = records.len(), "spread analysis finished");

            Ok::<_, AnalysisError>(records)
        }
        .instrument(span)
        .await
    }
}
