pub mod api_server_axum;
pub mod app_config;
pub mod calendar;
pub mod commands;
pub mod config;
pub mod coverage;
pub mod error;
pub mod expiry;
pub mod http;
pub mod logging;
pub mod models;
pub mod nse_client;
pub mod processor;
pub mod provider;
pub mod signals;
pub mod upstox_client;
pub mod yahoo_client;

// Re-exports for convenience
pub use error::{ProviderError, SignalError};
pub use models::{BidBoardEntry, Direction, GapResult, Instrument, SignalBundle};
pub use provider::{LiveProvider, MarketDataProvider};
pub use signals::{SignalEngine, SignalSettings};
