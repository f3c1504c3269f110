use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_DIR: &str = "./logs";
const LOG_FILE: &str = "index-signals.log";

/// Console plus daily-rotated JSON file under ./logs.
/// Level comes from RUST_LOG, default info.
pub fn init_logging() -> Result<()> {
    std::fs::create_dir_all(LOG_DIR).context("Failed to create logs directory")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, LOG_FILE);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_ansi(true),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_target(true)
                .with_line_number(true)
                .with_ansi(false)
                .json(),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}
