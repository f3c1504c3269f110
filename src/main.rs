use anyhow::{Context, Result};
use colored::Colorize;
use index_signals::api_server_axum::{self, AppState};
use index_signals::app_config::{AppConfig, RunMode};
use index_signals::commands::SignalCommands;
use index_signals::{LiveProvider, SignalEngine, SignalSettings, calendar, logging};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;

    // No network call happens before a token is resolved
    let app_config = match AppConfig::load() {
        Ok(app_config) => app_config,
        Err(e) => {
            error!(error = %e, "Startup aborted");
            eprintln!("{} {}", "✗".red(), e.to_string().red().bold());
            std::process::exit(1);
        }
    };
    app_config.print_summary();
    info!(mode = app_config.mode.as_str(), "Starting");

    let provider = LiveProvider::new(&app_config.access_token).context("Failed to build HTTP clients")?;
    let engine = SignalEngine::new(
        Arc::new(provider),
        SignalSettings {
            sixth_sense_days: app_config.sixth_sense_days,
        },
    );

    match app_config.mode {
        RunMode::Signals => SignalCommands::run_signals(&engine, calendar::exchange_now()).await,
        RunMode::Bid => SignalCommands::run_bid(&engine, calendar::exchange_now()).await,
        RunMode::Server => api_server_axum::start_server(app_config.port, AppState::new(engine)).await,
    }
}
