//! Prediction anomaly gate - Entry Point

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use tracing::info;

/// Detect market anomalies in daily OHLCV bars and decide whether
/// price predictions should be served.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via PGATE_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,

    /// JSON bar file, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    bars: String,

    /// Stock code; omit for market-wide analysis
    #[arg(short, long)]
    stock_code: Option<String>,

    /// Date to label the detection with (YYYY-MM-DD)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = pgate_app::AppConfig::load(args.config.as_deref())?;
    pgate_telemetry::init_logging(config.telemetry.log_level.as_deref())?;

    info!("Starting pgate v{}", env!("CARGO_PKG_VERSION"));

    let app = pgate_app::Application::new(config)?;

    let input = pgate_app::BarInput::read(&args.bars)?;
    info!(source = %args.bars, bars = input.bars.len(), "Bars loaded");

    let request = pgate_app::Application::request(input, args.stock_code, args.as_of);
    let result = app.run(&request);

    println!("{}", pgate_app::Application::render(&result, args.pretty)?);

    if let Some(metrics) = app.metrics_snapshot()? {
        eprintln!("{metrics}");
    }

    Ok(())
}
