use std::io::Write;

use corelib::{Signal, SpreadRecord};
use engine::SignalSummary;
use serde::Serialize;

use crate::cli::OutputFormat;

/// What gets printed for one run. The summary always covers every record,
/// even when only the signal rows are shown.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub ticker_a: &'a str,
    pub ticker_b: &'a str,
    pub summary: SignalSummary,
    pub records: Vec<&'a SpreadRecord>,
}

impl<'a> Report<'a> {
    pub fn new(
        ticker_a: &'a str,
        ticker_b: &'a str,
        records: &'a [SpreadRecord],
        signals_only: bool,
    ) -> Self {
        Self {
            ticker_a,
            ticker_b,
            summary: SignalSummary::from_records(records),
            records: records
                .iter()
                .filter(|r| !signals_only || r.signal.is_active())
                .collect(),
        }
    }
}

pub fn render<W: Write>(out: &mut W, format: OutputFormat, report: &Report<'_>) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => write_table(out, report)?,
        OutputFormat::Csv => write_csv(out, report)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
    }

    Ok(())
}

fn marker(signal: Signal) -> &'static str {
    match signal {
        Signal::Buy => "BUY",
        Signal::Sell => "SELL",
        Signal::None => "",
    }
}

fn cell(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.4}")).unwrap_or_else(|| "-".into())
}

fn write_table<W: Write>(out: &mut W, report: &Report<'_>) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<10} {:>12} {:>12} {:>12} {:>12} {:>10} {:>8}  {}",
        "date", report.ticker_a, report.ticker_b, "spread", "mean", "std", "z", "signal"
    )?;

    for r in &report.records {
        writeln!(
            out,
            "{:<10} {:>12.4} {:>12.4} {:>12.4} {:>12} {:>10} {:>8}  {}",
            r.date,
            r.price_a,
            r.price_b,
            r.spread,
            cell(r.rolling_mean),
            cell(r.rolling_std),
            cell(r.z_score),
            marker(r.signal),
        )?;
    }

    let s = &report.summary;
    writeln!(out)?;
    writeln!(
        out,
        "{} - {}: {} observations, {} warm-up, {} buy, {} sell",
        report.ticker_a,
        report.ticker_b,
        s.observations,
        s.warm_up,
        s.buys(),
        s.sells()
    )?;

    match s.last_z_score {
        Some((date, z)) => writeln!(out, "last z-score {z:.4} on {date}"),
        None if s.warm_up == s.observations => {
            writeln!(out, "no defined z-score (fewer observations than the window)")
        }
        None => writeln!(out, "no defined z-score after the warm-up"),
    }
}

fn csv_cell(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn write_csv<W: Write>(out: &mut W, report: &Report<'_>) -> std::io::Result<()> {
    writeln!(
        out,
        "date,price_a,price_b,spread,rolling_mean,rolling_std,z_score,signal"
    )?;

    for r in &report.records {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{}",
            r.date,
            r.price_a,
            r.price_b,
            r.spread,
            csv_cell(r.rolling_mean),
            csv_cell(r.rolling_std),
            csv_cell(r.z_score),
            r.signal.as_i8(),
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(day: u32, stats: Option<(f64, f64, f64)>, signal: Signal) -> SpreadRecord {
        SpreadRecord {
            date: NaiveDate::from_ymd_opt(2021, 3, day).unwrap(),
            price_a: 120.5,
            price_b: 230.25,
            spread: -109.75,
            rolling_mean: stats.map(|s| s.0),
            rolling_std: stats.map(|s| s.1),
            z_score: stats.map(|s| s.2),
            signal,
        }
    }

    fn sample() -> Vec<SpreadRecord> {
        vec![
            rec(1, None, Signal::None),
            rec(2, Some((-100.0, 4.0, -2.4375)), Signal::Buy),
            rec(3, Some((-101.0, 3.0, 0.5)), Signal::None),
            rec(4, Some((-112.0, 1.0, 2.25)), Signal::Sell),
        ]
    }

    fn rendered(format: OutputFormat, report: &Report<'_>) -> String {
        let mut buf = Vec::new();
        render(&mut buf, format, report).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn table_marks_signals_and_summarizes() {
        let records = sample();
        let out = rendered(OutputFormat::Table, &Report::new("AAPL", "MSFT", &records, false));

        let lines: Vec<_> = out.lines().collect();
        assert!(lines[0].contains("AAPL") && lines[0].contains("MSFT"));
        assert!(lines[1].starts_with("2021-03-01") && lines[1].contains(" -"));
        assert!(lines[2].ends_with("BUY"));
        assert!(lines[4].ends_with("SELL"));
        assert!(out.contains("4 observations, 1 warm-up, 1 buy, 1 sell"));
        assert!(out.contains("last z-score 2.2500 on 2021-03-04"));
    }

    #[test]
    fn csv_leaves_undefined_stats_empty() {
        let records = sample();
        let out = rendered(OutputFormat::Csv, &Report::new("AAPL", "MSFT", &records, false));

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "2021-03-01,120.5,230.25,-109.75,,,,0");
        assert_eq!(lines[2], "2021-03-02,120.5,230.25,-109.75,-100,4,-2.4375,1");
        assert!(lines[4].ends_with(",-1"));
    }

    #[test]
    fn signals_only_filters_rows_but_not_summary() {
        let records = sample();
        let report = Report::new("AAPL", "MSFT", &records, true);

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.summary.observations, 4);

        let out = rendered(OutputFormat::Csv, &report);
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn json_carries_summary_and_integer_signals() {
        let records = sample();
        let out = rendered(OutputFormat::Json, &Report::new("AAPL", "MSFT", &records, false));

        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["ticker_a"], "AAPL");
        assert_eq!(v["summary"]["warm_up"], 1);
        assert_eq!(v["summary"]["sell_dates"][0], "2021-03-04");
        assert_eq!(v["records"][0]["z_score"], serde_json::Value::Null);
        assert_eq!(v["records"][1]["signal"], 1);
        assert_eq!(v["records"][3]["signal"], -1);
    }

    #[test]
    fn table_without_defined_z_says_so() {
        let records = vec![rec(1, None, Signal::None)];
        let out = rendered(OutputFormat::Table, &Report::new("A", "B", &records, false));

        assert!(out.contains("no defined z-score (fewer observations than the window)"));
    }

    #[test]
    fn flat_spread_is_not_reported_as_warm_up() {
        let mut flat = rec(2, None, Signal::None);
        flat.rolling_mean = Some(-109.75);
        flat.rolling_std = Some(0.0);
        let records = vec![rec(1, None, Signal::None), flat];

        let out = rendered(OutputFormat::Table, &Report::new("A", "B", &records, false));

        assert!(out.contains("no defined z-score after the warm-up"));
        assert!(!out.contains("fewer observations"));
    }
}
