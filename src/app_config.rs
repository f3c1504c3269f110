use crate::config;
use crate::error::SignalError;
use colored::Colorize;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Signals,
    Bid,
    Server,
}

impl RunMode {
    /// Unknown values fall back to `Signals`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "bid" => RunMode::Bid,
            "server" => RunMode::Server,
            "signals" | "" => RunMode::Signals,
            other => {
                warn!(mode = other, "Unknown run mode, using signals");
                RunMode::Signals
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::Signals => "signals",
            RunMode::Bid => "bid",
            RunMode::Server => "server",
        }
    }
}

/// On-disk config file; only the token is read
#[derive(Debug, Deserialize)]
struct ConfigFile {
    access_token: Option<String>,
}

/// Application configuration handler
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: RunMode,
    pub port: u16,
    pub sixth_sense_days: usize,
    pub access_token: String,
}

impl AppConfig {
    /// Build configuration from the environment and config files.
    ///
    /// Fails with `MissingCredential` when no token is found.
    pub fn load() -> Result<Self, SignalError> {
        let mut paths = Vec::new();
        if let Some(path) = config::get_config_path() {
            paths.push(PathBuf::from(path));
        }
        paths.push(PathBuf::from(config::DEFAULT_CONFIG_FILE));

        let access_token = resolve_access_token(&paths, config::get_env_access_token())?;

        Ok(Self {
            mode: RunMode::parse(&config::get_execution_mode()),
            port: config::get_port(),
            sixth_sense_days: config::get_sixth_sense_days(),
            access_token,
        })
    }

    pub fn print_summary(&self) {
        println!("{} Mode: {}", "→".cyan(), self.mode.as_str().yellow());
        if self.mode == RunMode::Server {
            println!("{} Port: {}", "→".cyan(), self.port.to_string().yellow());
        }
        println!();
    }
}

fn token_from_file(path: &Path) -> Option<String> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) => {
            debug!(path = %path.display(), "Config file not found");
            return None;
        }
    };

    match serde_json::from_str::<ConfigFile>(&text) {
        Ok(file) => file.access_token.filter(|t| !t.trim().is_empty()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
            None
        }
    }
}

/// First non-empty `access_token` among `paths`, then `env_token`
pub fn resolve_access_token(
    paths: &[PathBuf],
    env_token: Option<String>,
) -> Result<String, SignalError> {
    paths
        .iter()
        .find_map(|p| token_from_file(p))
        .or_else(|| env_token.filter(|t| !t.trim().is_empty()))
        .ok_or(SignalError::MissingCredential)
}
