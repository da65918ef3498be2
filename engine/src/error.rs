use corelib::DataSourceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Bad configuration. Reported before any data is fetched or computed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The two series have no date in common with a usable price on both sides.
    #[error("insufficient data: {ticker_a} and {ticker_b} share no dates with usable prices")]
    InsufficientData { ticker_a: String, ticker_b: String },

    #[error(transparent)]
    DataSource(#[from] DataSourceError),
}

impl AnalysisError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}
