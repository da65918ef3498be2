use chrono::NaiveDate;
use corelib::{Signal, SpreadRecord};
use serde::Serialize;

/// Aggregate view of an analysis result, used for the report footer and the
/// buy/sell markers on the spread chart.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SignalSummary {
    pub observations: usize,

    /// Leading records with undefined rolling statistics.
    pub warm_up: usize,

    pub buy_dates: Vec<NaiveDate>,
    pub sell_dates: Vec<NaiveDate>,

    /// Most recent defined z-score and its date.
    pub last_z_score: Option<(NaiveDate, f64)>,
}

impl SignalSummary {
    pub fn from_records(records: &[SpreadRecord]) -> Self {
        let mut summary = Self {
            observations: records.len(),
            warm_up: records
                .iter()
                .take_while(|r| r.rolling_mean.is_none())
                .count(),
            ..Self::default()
        };

        for r in records {
            match r.signal {
                Signal::Buy => summary.buy_dates.push(r.date),
                Signal::Sell => summary.sell_dates.push(r.date),
                Signal::None => {}
            }
        }

        summary.last_z_score = records
            .iter()
            .rev()
            .find_map(|r| r.z_score.map(|z| (r.date, z)));

        summary
    }

    pub fn buys(&self) -> usize {
        self.buy_dates.len()
    }

    pub fn sells(&self) -> usize {
        self.sell_dates.len()
    }
}
