use std::str::FromStr;

use corelib::Signal;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

pub const DEFAULT_WINDOW: usize = 30;
pub const DEFAULT_UPPER_THRESHOLD: f64 = 2.0;
pub const DEFAULT_LOWER_THRESHOLD: f64 = -2.0;

pub const ENV_WINDOW: &str = "ZSPREAD_WINDOW";
pub const ENV_UPPER: &str = "ZSPREAD_UPPER";
pub const ENV_LOWER: &str = "ZSPREAD_LOWER";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// Number of trailing spread values the rolling mean and standard
    /// deviation are computed over. Must be at least 2.
    pub window: usize,

    /// Z-scores strictly above this emit a sell signal.
    pub upper_threshold: f64,

    /// Z-scores strictly below this emit a buy signal.
    pub lower_threshold: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            upper_threshold: DEFAULT_UPPER_THRESHOLD,
            lower_threshold: DEFAULT_LOWER_THRESHOLD,
        }
    }
}

impl AnalysisParams {
    pub fn new(window: usize, upper_threshold: f64, lower_threshold: f64) -> Self {
        Self {
            window,
            upper_threshold,
            lower_threshold,
        }
    }

    /// Defaults overridden by `ZSPREAD_WINDOW`, `ZSPREAD_UPPER` and
    /// `ZSPREAD_LOWER` when set.
    pub fn from_env() -> Result<Self, AnalysisError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AnalysisParams::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AnalysisError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            window: parse_var(&lookup, ENV_WINDOW)?.unwrap_or(defaults.window),
            upper_threshold: parse_var(&lookup, ENV_UPPER)?.unwrap_or(defaults.upper_threshold),
            lower_threshold: parse_var(&lookup, ENV_LOWER)?.unwrap_or(defaults.lower_threshold),
        })
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.window < 2 {
            return Err(AnalysisError::invalid(format!(
                "window must be at least 2, got {}",
                self.window
            )));
        }

        if !self.upper_threshold.is_finite() || !self.lower_threshold.is_finite() {
            return Err(AnalysisError::invalid(format!(
                "thresholds must be finite, got upper={} lower={}",
                self.upper_threshold, self.lower_threshold
            )));
        }

        if self.upper_threshold <= self.lower_threshold {
            return Err(AnalysisError::invalid(format!(
                "upper threshold ({}) must be greater than lower threshold ({})",
                self.upper_threshold, self.lower_threshold
            )));
        }

        Ok(())
    }

    /// Maps a z-score onto a signal. Values on either threshold are neutral.
    pub fn classify(&self, z_score: Option<f64>) -> Signal {
        match z_score {
            Some(z) if z < self.lower_threshold => Signal::Buy,
            Some(z) if z > self.upper_threshold => Signal::Sell,
            _ => Signal::None,
        }
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, AnalysisError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e| AnalysisError::invalid(format!("{key}={raw:?}: {e}")))
}
