use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use tracing::{debug, instrument};

use super::errors::YahooError;
use super::parser::{ChartRows, PriceField, parse_chart};

pub const DEFAULT_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36";

#[derive(Clone, Debug)]
pub struct YahooConfig {
    /// Chart endpoint without the trailing symbol, e.g. [`DEFAULT_CHART_URL`].
    pub base_url: String,

    pub timeout: Duration,

    pub price_field: PriceField,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CHART_URL.to_string(),
            timeout: Duration::from_secs(10),
            price_field: PriceField::AdjClose,
        }
    }
}

pub const ENV_CHART_URL: &str = "YAHOO_CHART_URL";
pub const ENV_TIMEOUT_SECS: &str = "YAHOO_TIMEOUT_SECS";

impl YahooConfig {
    /// Defaults overridden by `YAHOO_CHART_URL` and `YAHOO_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, YahooError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`YahooConfig::from_env`] with an injectable variable source.
    /// A malformed timeout is an error, not a silent default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, YahooError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup(ENV_CHART_URL).unwrap_or(defaults.base_url);

        let timeout = match lookup(ENV_TIMEOUT_SECS) {
            None => defaults.timeout,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                Ok(_) => {
                    return Err(YahooError::Config(format!(
                        "{ENV_TIMEOUT_SECS} must be positive, got {raw:?}"
                    )));
                }
                Err(e) => {
                    return Err(YahooError::Config(format!("{ENV_TIMEOUT_SECS}={raw:?}: {e}")));
                }
            },
        };

        Ok(Self {
            base_url,
            timeout,
            ..defaults
        })
    }
}

#[derive(Clone)]
pub struct YahooClient {
    http: Client,
    base_url: String,
    price_field: PriceField,
}

impl YahooClient {
    pub fn new(config: YahooConfig) -> Result<Self, YahooError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            price_field: config.price_field,
        })
    }

    /// Chart URL for daily bars on `[start, end)`, both at UTC midnight.
    pub fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/{}?period1={}&period2={}&interval=1d&events=div%2Csplit&includeAdjustedClose=true",
            self.base_url,
            symbol,
            midnight_utc(start),
            midnight_utc(end),
        )
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_daily(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ChartRows, YahooError> {
        let url = self.chart_url(symbol, start, end);

        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        let parsed = parse_chart(&body, self.price_field);

        // Unknown symbols come back as 404 with a chart-level error body;
        // prefer that message over the bare status.
        if !status.is_success() {
            return Err(match parsed {
                Err(e @ YahooError::Api { .. }) => e,
                _ => YahooError::Status {
                    status: status.as_u16(),
                },
            });
        }

        let rows = parsed?;

        debug!(rows = rows.rows.len(), "yahoo chart fetched");

        Ok(rows)
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}
