use crate::models::{Instrument, InstrumentSpec};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::time::Duration;

// -----------------------------------------------
// BROKER API ENDPOINTS
// -----------------------------------------------
pub const UPSTOX_BASE_URL: &str = "https://api.upstox.com/v2";

pub fn upstox_historical_candle_url(key: &str, date: &str) -> String {
    format!(
        "{}/historical-candle/{}/1minute/{}/{}",
        UPSTOX_BASE_URL,
        urlencoding::encode(key),
        date,
        date
    )
}

pub fn upstox_intraday_candle_url(key: &str) -> String {
    format!(
        "{}/historical-candle/intraday/{}/1minute",
        UPSTOX_BASE_URL,
        urlencoding::encode(key)
    )
}

pub fn upstox_option_contract_url(key: &str) -> String {
    format!(
        "{}/option/contract?instrument_key={}",
        UPSTOX_BASE_URL,
        urlencoding::encode(key)
    )
}

// -----------------------------------------------
// YAHOO CHART API
// -----------------------------------------------
pub const YAHOO_CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

pub fn yahoo_chart_range_url(ticker: &str, range: &str) -> String {
    format!(
        "{}/{}?range={}&interval=1d",
        YAHOO_CHART_BASE_URL,
        urlencoding::encode(ticker),
        range
    )
}

pub fn yahoo_chart_period_url(ticker: &str, period1: i64, period2: i64) -> String {
    format!(
        "{}/{}?period1={}&period2={}&interval=1d",
        YAHOO_CHART_BASE_URL,
        urlencoding::encode(ticker),
        period1,
        period2
    )
}

// -----------------------------------------------
// EXCHANGE WEBSITE (NIFTY SPOT)
// -----------------------------------------------
pub const NSE_BASE_URL: &str = "https://www.nseindia.com";

pub fn nse_index_quote_url(index: &str) -> String {
    format!(
        "{}/api/equity-stockIndices?index={}",
        NSE_BASE_URL,
        urlencoding::encode(index)
    )
}

pub const NSE_SPOT_INDEX: &str = "NIFTY 50";

// -----------------------------------------------
// INSTRUMENTS
// -----------------------------------------------
pub const NIFTY: InstrumentSpec = InstrumentSpec {
    instrument: Instrument::Nifty,
    display_name: "NIFTY 50",
    key: "NSE_INDEX|Nifty 50",
    yahoo_ticker: "^NSEI",
    expiry_window: Some((0, 2)),
};

pub const SENSEX: InstrumentSpec = InstrumentSpec {
    instrument: Instrument::Sensex,
    display_name: "SENSEX",
    key: "BSE_INDEX|SENSEX",
    yahoo_ticker: "^BSESN",
    expiry_window: Some((0, 1)),
};

pub const BANK_NIFTY: InstrumentSpec = InstrumentSpec {
    instrument: Instrument::BankNifty,
    display_name: "BANK NIFTY",
    key: "NSE_INDEX|Nifty Bank",
    yahoo_ticker: "^NSEBANK",
    expiry_window: None,
};

/// Instruments whose options are traded (selector + coverage order)
pub const TRADED_INSTRUMENTS: &[Instrument] = &[Instrument::Nifty, Instrument::Sensex];

/// Instruments shown on the BID board
pub const BID_BOARD_INSTRUMENTS: &[Instrument] =
    &[Instrument::Nifty, Instrument::BankNifty, Instrument::Sensex];

pub fn instrument_spec(instrument: Instrument) -> &'static InstrumentSpec {
    match instrument {
        Instrument::Nifty => &NIFTY,
        Instrument::Sensex => &SENSEX,
        Instrument::BankNifty => &BANK_NIFTY,
    }
}

// -----------------------------------------------
// SESSION CUTOFFS (exchange local time)
// -----------------------------------------------
pub const EXCHANGE_TZ: chrono_tz::Tz = chrono_tz::Asia::Kolkata;

/// BID data for "today" exists once the 09:15 candle has opened
pub const MARKET_OPEN_HM: (u32, u32) = (9, 15);

/// PriceGap data for "today" exists once the session has closed
pub const MARKET_CLOSE_HM: (u32, u32) = (15, 30);

/// Last minute candle that counts towards the 3:30 LTP
pub const LTP_CANDLE_HOUR: u32 = 15;
pub const LTP_CANDLE_LAST_MINUTE: u32 = 29;

// -----------------------------------------------
// COVERAGE PREMIUM TABLE (DTE -> % of spot)
// -----------------------------------------------
pub const PREMIUM_PCT: &[(i64, Decimal)] = &[
    (0, dec!(0.54)),
    (1, dec!(0.81)),
    (2, dec!(1.05)),
    (3, dec!(1.20)),
    (4, dec!(1.38)),
];

pub const DEFAULT_PREMIUM_PCT: Decimal = dec!(0.54);

// -----------------------------------------------
// SIXTHSENSE
// -----------------------------------------------
pub const DEFAULT_SIXTH_SENSE_DAYS: usize = 5;
pub const MAX_SIXTH_SENSE_DAYS: usize = 30;
pub const SIXTH_SENSE_LOOKBACK_PADDING_DAYS: i64 = 10;

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                               AppleWebKit/537.36 (KHTML, like Gecko) \
                               Chrome/131.0.0.0 Safari/537.36";

pub const ACCEPT_LANGUAGES: &[&str] = &[
    "en-US,en;q=0.9",
    "en-GB,en;q=0.8",
    "en-IN,en;q=0.9",
];

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(20);
pub const SPOT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

// -----------------------------------------------
// SESSION WARMUP
// -----------------------------------------------
pub const WARMUP_DELAY_MS: u64 = 200;

// -----------------------------------------------
// RETRY CONFIG
// -----------------------------------------------
pub const RETRY_BASE_DELAY_MS: u64 = 100;
pub const RETRY_FACTOR: u64 = 2;
pub const RETRY_MAX_DELAY_SECS: u64 = 3;
pub const RETRY_MAX_ATTEMPTS: usize = 3;

// -----------------------------------------------
// HTTP HEADERS
// -----------------------------------------------
pub const HEADER_REFERER: &str = "https://www.nseindia.com/";
pub const HEADER_X_REQUESTED_WITH: &str = "XMLHttpRequest";
pub const HEADER_ACCEPT_HTML: &str = "text/html";
pub const HEADER_ACCEPT_JSON: &str = "application/json";

// -----------------------------------------------
// RUNTIME CONFIGURATION
// -----------------------------------------------
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const ACCESS_TOKEN_ENV: &str = "UPSTOX_ACCESS_TOKEN";

/// Get the execution mode from environment or default to signals
pub fn get_execution_mode() -> String {
    std::env::var("SIGNALS_MODE").unwrap_or_else(|_| "signals".to_string())
}

/// Get server port from environment or default
pub fn get_port() -> u16 {
    std::env::var("SIGNALS_PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// SixthSense window, clamped to 1..=30
pub fn get_sixth_sense_days() -> usize {
    std::env::var("SIGNALS_SIXTH_SENSE_DAYS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .map(|n| n.clamp(1, MAX_SIXTH_SENSE_DAYS))
        .unwrap_or(DEFAULT_SIXTH_SENSE_DAYS)
}

/// Optional extra config file path
pub fn get_config_path() -> Option<String> {
    std::env::var("SIGNALS_CONFIG").ok().filter(|p| !p.is_empty())
}

pub fn get_env_access_token() -> Option<String> {
    std::env::var(ACCESS_TOKEN_ENV).ok().filter(|t| !t.trim().is_empty())
}
