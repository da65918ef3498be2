mod cli;
mod render;

use std::io::Write;
use std::sync::Arc;

use adapters::yahoo::{YahooConfig, YahooProvider};
use anyhow::Context;
use clap::Parser;
use common::logger::{init_logger, is_production};
use engine::SpreadService;
use tracing::info;

use cli::Cli;
use render::{Report, render};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logger("zspread", cli.log_json || is_production());

    let request = cli.request().context("invalid analysis parameters")?;

    let config = YahooConfig {
        price_field: cli.price_field(),
        ..YahooConfig::from_env().context("invalid yahoo configuration")?
    };
    info!(base_url = %config.base_url, price_field = ?config.price_field, "using yahoo chart api");

    let provider = YahooProvider::new(config).context("failed to build yahoo client")?;
    let service = SpreadService::new(Arc::new(provider));

    let records = service.run(&request).await.with_context(|| {
        format!(
            "spread analysis for {} / {} failed",
            request.ticker_a, request.ticker_b
        )
    })?;

    let report = Report::new(&request.ticker_a, &request.ticker_b, &records, cli.signals_only);

    let mut out = std::io::stdout().lock();
    render(&mut out, cli.format, &report)?;
    out.flush()?;

    Ok(())
}
