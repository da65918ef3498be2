use chrono::NaiveDate;
use corelib::PriceSeries;
use std::cmp::Ordering;

/// Prices of both instruments on one shared date.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignedPoint {
    pub date: NaiveDate,
    pub price_a: f64,
    pub price_b: f64,
}

/// Two series restricted to the dates where both have a usable price.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AlignedPair {
    points: Vec<AlignedPoint>,
}

impl AlignedPair {
    pub fn points(&self) -> &[AlignedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Inner join of `a` and `b` on date.
///
/// Both inputs are sorted by strictly increasing date, so this is a single
/// merge pass. Dates where either side has a non-finite price, or where the
/// difference of the two prices overflows, are skipped.
pub fn align(a: &PriceSeries, b: &PriceSeries) -> AlignedPair {
    let (xs, ys) = (a.points(), b.points());
    let mut points = Vec::with_capacity(xs.len().min(ys.len()));

    let (mut i, mut j) = (0, 0);
    while i < xs.len() && j < ys.len() {
        match xs[i].date.cmp(&ys[j].date) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                let usable = xs[i].is_usable()
                    && ys[j].is_usable()
                    && (xs[i].price - ys[j].price).is_finite();
                if usable {
                    points.push(AlignedPoint {
                        date: xs[i].date,
                        price_a: xs[i].price,
                        price_b: ys[j].price,
                    });
                }
                i += 1;
                j += 1;
            }
        }
    }

    AlignedPair { points }
}
