//! Glucosense: diabetes risk assessment in the terminal.
//!
//! Main entry point for the terminal application.

use anyhow::{Context, Result};

use glucosense::config::AppConfig;
use glucosense::logging;
use glucosense::tui::App;

fn main() -> Result<()> {
    let config = AppConfig::from_env().context("Failed to read configuration")?;

    // Held until exit so buffered log lines are flushed.
    let _guard = logging::init(&config.log).context("Failed to initialize logging")?;

    tracing::info!("Starting Glucosense...");

    let mut app = App::new(&config)?;
    app.run()?;

    tracing::info!("Glucosense shutdown complete.");
    Ok(())
}
