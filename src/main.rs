//! Crypto Advisor - one-shot technical + sentiment analysis
//!
//! # Usage
//! ```sh
//! cargo run -- --ticker BTC/USD --timeframe 24h --to trader@example.com
//! PRICE_SOURCE=mock NEWS_SOURCE=none cargo run -- --ticker ETH/USD --timeframe 1h --dry-run
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use crypto_advisor::application::DeliveryStatus;
use crypto_advisor::config::Config;
use crypto_advisor::infrastructure::ServiceFactory;
use crypto_advisor::infrastructure::delivery::render_text;
use crypto_advisor::infrastructure::observability::Metrics;
use tracing::{Level, debug, error, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Pair to analyze, e.g. BTC/USD
    #[arg(short, long)]
    ticker: String,

    /// One of 1h, 12h, 24h, 1m, 3m, 1y
    #[arg(short = 'f', long, default_value = "24h")]
    timeframe: String,

    /// Report destination (falls back to REPORT_RECIPIENT)
    #[arg(long)]
    to: Option<String>,

    /// Print the report instead of delivering it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();
    info!("Crypto Advisor {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let destination = if cli.dry_run {
        None
    } else {
        Some(
            cli.to
                .clone()
                .or_else(|| config.delivery.default_recipient.clone())
                .context("No destination: pass --to, set REPORT_RECIPIENT, or use --dry-run")?,
        )
    };

    let metrics = if config.observability.metrics_enabled {
        Some(Metrics::new()?)
    } else {
        None
    };

    let pipeline = ServiceFactory::create_pipeline(&config, metrics.clone())?;
    let result = pipeline
        .run(&cli.ticker, &cli.timeframe, destination.as_deref())
        .await;

    if let Some(metrics) = &metrics {
        debug!("Metrics:\n{}", metrics.render());
    }

    let outcome = result?;
    if outcome.dropped_articles > 0 {
        info!(
            "{} articles could not be scored and were ignored",
            outcome.dropped_articles
        );
    }

    match &outcome.delivery {
        DeliveryStatus::Skipped => println!("{}", render_text(&outcome.report)),
        DeliveryStatus::Delivered { destination } => {
            info!("Report {} delivered to {}", outcome.report.id, destination);
        }
        DeliveryStatus::Failed { error: e } => {
            // The analysis itself succeeded; show it so it is not lost
            println!("{}", render_text(&outcome.report));
            error!("Report computed but not delivered: {}", e);
            std::process::exit(2);
        }
    }

    Ok(())
}
