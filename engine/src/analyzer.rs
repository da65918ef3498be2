use corelib::{PriceSeries, Signal, SpreadRecord};
use tracing::{Span, debug, field, instrument};

use crate::align::align;
use crate::config::AnalysisParams;
use crate::error::AnalysisError;
use crate::rolling_window::{RollingWindow, WindowStats};

/// Rolling z-score of the spread `a - b` with threshold signals.
///
/// Steps:
/// - inner join of both series on date (non-finite prices excluded)
/// - spread per shared date
/// - mean and sample standard deviation over the trailing `params.window`
///   spreads, undefined until the window is full
/// - z-score where the standard deviation is defined and non-zero
/// - `Buy` below the lower threshold, `Sell` above the upper one
///
/// The output has one record per aligned date, in date order. Fewer aligned
/// dates than `params.window` is not an error: every statistic is `None`.
#[instrument(
    skip_all,
    fields(
        ticker_a = %a.ticker(),
        ticker_b = %b.ticker(),
        window = params.window,
        aligned_len = field::Empty
    )
)]
pub fn analyze(
    a: &PriceSeries,
    b: &PriceSeries,
    params: &AnalysisParams,
) -> Result<Vec<SpreadRecord>, AnalysisError> {
    params.validate()?;

    let aligned = align(a, b);
    Span::current().record("aligned_len", aligned.len());

    if aligned.is_empty() {
        return Err(AnalysisError::InsufficientData {
            ticker_a: a.ticker().to_string(),
            ticker_b: b.ticker().to_string(),
        });
    }

    debug!(
        dropped_a = a.len() - aligned.len(),
        dropped_b = b.len() - aligned.len(),
        "series aligned"
    );

    if aligned.len() < params.window {
        debug!(
            required = params.window,
            "fewer aligned dates than window; all statistics undefined"
        );
    }

    let mut window = RollingWindow::new(params.window);
    let mut records = Vec::with_capacity(aligned.len());

    for p in aligned.points() {
        let spread = p.price_a - p.price_b;
        window.push(spread);

        let stats = window.stats();
        let z_score = stats.and_then(|s| standardize(spread, s));

        records.push(SpreadRecord {
            date: p.date,
            price_a: p.price_a,
            price_b: p.price_b,
            spread,
            rolling_mean: stats.map(|s| s.mean),
            rolling_std: stats.map(|s| s.std),
            z_score,
            signal: params.classify(z_score),
        });
    }

    debug!(
        buys = records.iter().filter(|r| r.signal == Signal::Buy).count(),
        sells = records.iter().filter(|r| r.signal == Signal::Sell).count(),
        "spread analysis complete"
    );

    Ok(records)
}

/// `None` when the window has zero dispersion or the quotient overflows.
fn standardize(spread: f64, stats: WindowStats) -> Option<f64> {
    if stats.std > 0.0 {
        Some((spread - stats.mean) / stats.std).filter(|z| z.is_finite())
    } else {
        None
    }
}
