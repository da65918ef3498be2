use tracing::{Span, field};

use super::TraceId;

/// Root span for one request / analysis run.
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "root",
        name = %name,
        trace_id = %trace_id,
        pair = field::Empty
    )
}

/// Child span; inherits `trace_id` from the enclosing root span.
pub fn child_span(name: &'static str) -> Span {
    tracing::info_span!("child", name = %name)
}

/// Tags the current span with the instrument pair being analyzed.
pub fn annotate_pair(ticker_a: &str, ticker_b: &str) {
    Span::current().record("pair", field::display(format!("{ticker_a}/{ticker_b}")));
}
