use adapters::yahoo::parser::PriceField;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use engine::{AnalysisError, AnalysisParams, AnalysisRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table with BUY/SELL markers and a summary footer
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[clap(
    name = "zspread",
    version,
    about = "Rolling z-score of the price spread between two tickers"
)]
pub struct Cli {
    /// First instrument of the pair
    #[clap(long, default_value = "AAPL")]
    pub ticker1: String,

    /// Second instrument of the pair
    #[clap(long, default_value = "MSFT")]
    pub ticker2: String,

    /// First day of the range, YYYY-MM-DD
    #[clap(long, default_value = "2021-01-01")]
    pub start: NaiveDate,

    /// Day after the last one fetched, YYYY-MM-DD
    #[clap(long, default_value = "2021-12-31")]
    pub end: NaiveDate,

    /// Rolling window length in observations [env: ZSPREAD_WINDOW, default 30]
    #[clap(long)]
    pub window: Option<usize>,

    /// Sell when the z-score is above this [env: ZSPREAD_UPPER, default 2.0]
    #[clap(long, allow_negative_numbers = true)]
    pub upper: Option<f64>,

    /// Buy when the z-score is below this [env: ZSPREAD_LOWER, default -2.0]
    #[clap(long, allow_negative_numbers = true)]
    pub lower: Option<f64>,

    #[clap(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Only print rows carrying a buy or sell signal
    #[clap(long)]
    pub signals_only: bool,

    /// Use the unadjusted close instead of the split/dividend adjusted one
    #[clap(long)]
    pub raw_close: bool,

    /// Emit logs as JSON (also enabled by APP_ENV=production)
    #[clap(long)]
    pub log_json: bool,
}

impl Cli {
    /// Flags override `base`, which normally comes from the environment.
    pub fn params_over(&self, base: AnalysisParams) -> AnalysisParams {
        AnalysisParams {
            window: self.window.unwrap_or(base.window),
            upper_threshold: self.upper.unwrap_or(base.upper_threshold),
            lower_threshold: self.lower.unwrap_or(base.lower_threshold),
        }
    }

    pub fn request(&self) -> Result<AnalysisRequest, AnalysisError> {
        let params = self.params_over(AnalysisParams::from_env()?);

        let request = AnalysisRequest::new(&self.ticker1, &self.ticker2, self.start, self.end)
            .with_params(params);
        request.validate()?;

        Ok(request)
    }

    pub fn price_field(&self) -> PriceField {
        if self.raw_close {
            PriceField::Close
        } else {
            PriceField::AdjClose
        }
    }
}
