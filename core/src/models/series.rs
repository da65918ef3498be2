use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single dated price observation for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }

    /// A point with a NaN or infinite price carries no usable observation and
    /// is excluded from alignment.
    pub fn is_usable(&self) -> bool {
        self.price.is_finite()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("{ticker}: dates must be strictly increasing (index {index}: {prev} then {next})")]
    NotIncreasing {
        ticker: String,
        index: usize,
        prev: NaiveDate,
        next: NaiveDate,
    },
}

/// Chronologically ordered prices for one instrument.
///
/// Dates are strictly increasing, so a date appears at most once. This also
/// holds for deserialized series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceSeries")]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

#[derive(Deserialize)]
struct RawPriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl TryFrom<RawPriceSeries> for PriceSeries {
    type Error = SeriesError;

    fn try_from(raw: RawPriceSeries) -> Result<Self, Self::Error> {
        Self::new(raw.ticker, raw.points)
    }
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        let ticker = ticker.into();

        if let Some(index) = points.windows(2).position(|w| w[0].date >= w[1].date) {
            return Err(SeriesError::NotIncreasing {
                index: index + 1,
                prev: points[index].date,
                next: points[index + 1].date,
                ticker,
            });
        }

        Ok(Self { ticker, points })
    }

    /// Builds a series from raw provider rows, dropping rows without a price.
    pub fn from_observations<I>(ticker: impl Into<String>, rows: I) -> Result<Self, SeriesError>
    where
        I: IntoIterator<Item = (NaiveDate, Option<f64>)>,
    {
        let points = rows
            .into_iter()
            .filter_map(|(date, price)| price.map(|p| PricePoint::new(date, p)))
            .collect();

        Self::new(ticker, points)
    }

    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            points: Vec::new(),
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Returns a copy with `delta` added to every price.
    pub fn shifted(&self, delta: f64) -> Self {
        Self {
            ticker: self.ticker.clone(),
            points: self
                .points
                .iter()
                .map(|p| PricePoint::new(p.date, p.price + delta))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, day).unwrap()
    }

    #[test]
    fn accepts_strictly_increasing_dates() {
        let s = PriceSeries::new(
            "AAPL",
            vec![PricePoint::new(d(1), 1.0), PricePoint::new(d(2), 2.0)],
        )
        .unwrap();

        assert_eq!(s.ticker(), "AAPL");
        assert_eq!(s.len(), 2);
        assert_eq!(s.last_date(), Some(d(2)));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = PriceSeries::new(
            "AAPL",
            vec![PricePoint::new(d(1), 1.0), PricePoint::new(d(1), 2.0)],
        )
        .unwrap_err();

        assert_eq!(
            err,
            SeriesError::NotIncreasing {
                ticker: "AAPL".into(),
                index: 1,
                prev: d(1),
                next: d(1),
            }
        );
    }

    #[test]
    fn rejects_out_of_order_dates() {
        let res = PriceSeries::new(
            "MSFT",
            vec![
                PricePoint::new(d(1), 1.0),
                PricePoint::new(d(3), 2.0),
                PricePoint::new(d(2), 3.0),
            ],
        );

        assert!(matches!(res, Err(SeriesError::NotIncreasing { index: 2, .. })));
    }

    #[test]
    fn from_observations_drops_missing_rows() {
        let s = PriceSeries::from_observations(
            "MSFT",
            vec![(d(1), Some(10.0)), (d(2), None), (d(3), Some(12.0))],
        )
        .unwrap();

        let dates: Vec<_> = s.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(1), d(3)]);
    }

    #[test]
    fn non_finite_price_is_not_usable() {
        assert!(PricePoint::new(d(1), 1.5).is_usable());
        assert!(!PricePoint::new(d(1), f64::NAN).is_usable());
        assert!(!PricePoint::new(d(1), f64::INFINITY).is_usable());
    }

    #[test]
    fn deserializing_enforces_date_order() {
        let ok: PriceSeries = serde_json::from_str(
            r#"{ "ticker": "AAPL", "points": [
                { "date": "2021-01-01", "price": 1.0 },
                { "date": "2021-01-02", "price": 2.0 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(ok.len(), 2);

        let err = serde_json::from_str::<PriceSeries>(
            r#"{ "ticker": "AAPL", "points": [
                { "date": "2021-01-03", "price": 3.0 },
                { "date": "2021-01-01", "price": 1.0 },
                { "date": "2021-01-02", "price": 2.0 }
            ] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn serialized_series_reads_back() {
        let s = PriceSeries::new(
            "MSFT",
            vec![PricePoint::new(d(1), 10.5), PricePoint::new(d(4), 11.0)],
        )
        .unwrap();

        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(serde_json::from_str::<PriceSeries>(&json).unwrap(), s);
    }

    #[test]
    fn shifted_keeps_dates() {
        let s = PriceSeries::new("X", vec![PricePoint::new(d(1), 1.0)]).unwrap();
        let shifted = s.shifted(5.0);

        assert_eq!(shifted.points()[0], PricePoint::new(d(1), 6.0));
        assert_eq!(shifted.ticker(), "X");
    }
}
