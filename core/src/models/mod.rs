use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod series;

pub use series::{PricePoint, PriceSeries, SeriesError};

/// Discrete trading indicator derived from thresholding the spread z-score.
///
/// Serialized as the integer `+1` (buy), `-1` (sell) or `0` (none).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Signal {
    /// Spread is unusually low relative to its rolling mean.
    Buy,

    /// Spread is unusually high relative to its rolling mean.
    Sell,

    #[default]
    None,
}

impl Signal {
    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Sell => -1,
            Signal::None => 0,
        }
    }

    pub fn is_active(self) -> bool {
        self != Signal::None
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal.as_i8()
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid signal value {0}, expected -1, 0 or 1")]
pub struct InvalidSignalValue(pub i8);

impl TryFrom<i8> for Signal {
    type Error = InvalidSignalValue;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Signal::Buy),
            -1 => Ok(Signal::Sell),
            0 => Ok(Signal::None),
            other => Err(InvalidSignalValue(other)),
        }
    }
}

/// One aligned observation of the pair, enriched with rolling statistics.
///
/// `None` marks a statistic that is undefined at this position (warm-up, or
/// a zero rolling standard deviation for `z_score`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadRecord {
    pub date: NaiveDate,

    /// Price of the first instrument on `date`.
    pub price_a: f64,

    /// Price of the second instrument on `date`.
    pub price_b: f64,

    /// `price_a - price_b`.
    pub spread: f64,

    pub rolling_mean: Option<f64>,
    pub rolling_std: Option<f64>,
    pub z_score: Option<f64>,

    pub signal: Signal,
}
