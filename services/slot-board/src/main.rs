//! Slot Board CLI
//!
//! Command-line interface for the kids park vacancy board service.

use std::path::PathBuf;

use clap::Parser;
use slot_board::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "slot-board")]
#[command(about = "Time-slot vacancy board for the kids park booking pages")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server port (overrides config file)
    #[arg(long)]
    port: Option<u16>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, port={:?}, log_level={:?}",
        args.config,
        args.port,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Starting slot board service");
    tracing::debug!(
        "Booking pages: {}, strategy: {}, cool-down: {:?}",
        config.booking_pages.len(),
        config.fetch.strategy.type_name(),
        config.refresh.cooldown
    );

    slot_board::run(config).await?;

    Ok(())
}
