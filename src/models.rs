use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// -----------------------------------------------
// INSTRUMENTS
// -----------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Instrument {
    Nifty,
    Sensex,
    BankNifty,
}

impl Instrument {
    pub fn as_str(&self) -> &'static str {
        match self {
            Instrument::Nifty => "NIFTY",
            Instrument::Sensex => "SENSEX",
            Instrument::BankNifty => "BANKNIFTY",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static per-instrument configuration
#[derive(Debug, Clone, Copy)]
pub struct InstrumentSpec {
    pub instrument: Instrument,
    pub display_name: &'static str,
    /// Broker instrument key, e.g. "NSE_INDEX|Nifty 50"
    pub key: &'static str,
    /// Yahoo-style ticker, e.g. "^NSEI"
    pub yahoo_ticker: &'static str,
    /// Inclusive DTE window in which the instrument is tradable.
    /// `None` for instruments only used on the BID board.
    pub expiry_window: Option<(i64, i64)>,
}

// -----------------------------------------------
// RAW MARKET DATA
// -----------------------------------------------

/// One minute candle as delivered by the broker. The timestamp is kept
/// raw so malformed entries can be skipped during extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: i64,
}

/// One daily session (used by SixthSense)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySession {
    pub date: NaiveDate,
    pub open: Decimal,
    pub close: Decimal,
}

// -----------------------------------------------
// DERIVED VALUES
// -----------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceKind {
    ThreePmLastTraded,
    NineFifteenOpen,
    DailyClose,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub value: Decimal,
    pub date: NaiveDate,
    pub kind: PriceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "▲",
            Direction::Down => "▼",
            Direction::Flat => "─",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Flat => "Flat",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapResult {
    pub gap: Decimal,
    pub gap_pct: Decimal,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirySelection {
    pub instrument: Instrument,
    pub expiry_date: NaiveDate,
    pub dte: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageEstimate {
    pub instrument: Instrument,
    pub dte: i64,
    pub spot: Decimal,
    pub premium_pct: Decimal,
    pub premium: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub open: Decimal,
    pub close: Decimal,
    pub change_pct: Decimal,
}

// -----------------------------------------------
// SIGNAL BUNDLE
// -----------------------------------------------

/// Overnight gap: previous session's 3:30 LTP vs today's 9:15 open
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidSignal {
    pub prev_date: NaiveDate,
    pub today_date: NaiveDate,
    pub market_open: bool,
    pub ltp_330: Option<Decimal>,
    pub open_915: Option<Decimal>,
    pub gap: Option<GapResult>,
}

/// 3:30 LTP vs the daily close of the same session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceGapSignal {
    pub date: NaiveDate,
    pub data_available: bool,
    pub ltp_330: Option<Decimal>,
    pub daily_close: Option<Decimal>,
    pub gap: Option<GapResult>,
}

/// Why an instrument has no coverage estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageMissing {
    NoValidExpiry,
    SpotUnavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSkip {
    pub instrument: Instrument,
    pub reason: CoverageMissing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub date: NaiveDate,
    pub label: String,
    pub instruments: Vec<CoverageEstimate>,
    /// Instruments omitted from `instruments`
    #[serde(default)]
    pub skipped: Vec<CoverageSkip>,
}

/// Everything the presentation layer renders for one invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalBundle {
    pub instrument: Instrument,
    pub expiry_date: NaiveDate,
    pub dte: i64,
    pub trading_day_dte: i64,
    pub timestamp: String,
    pub bid: BidSignal,
    pub pricegap: PriceGapSignal,
    pub sixthsense: Vec<DailyRecord>,
    pub coverage: CoverageReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidBoardEntry {
    pub instrument: Instrument,
    pub name: String,
    pub signal: BidSignal,
}

// -----------------------------------------------
// WIRE PAYLOADS
// -----------------------------------------------

/// Broker candle endpoint: `{ "status": ..., "data": { "candles": [[ts, o, h, l, c, v, oi], ...] } }`
#[derive(Debug, Clone, Deserialize)]
pub struct CandleResponse {
    pub data: Option<CandleData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandleData {
    #[serde(default)]
    pub candles: Vec<serde_json::Value>,
}

/// Broker option contract endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct OptionContractResponse {
    #[serde(default)]
    pub data: Vec<OptionContract>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionContract {
    pub expiry: Option<String>,
}

/// Yahoo chart endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartBody {
    pub result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartQuote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

/// Exchange index endpoint: `{ "data": [{ "lastPrice": 24850.5, ... }, ...] }`
#[derive(Debug, Clone, Deserialize)]
pub struct IndexQuoteResponse {
    #[serde(default)]
    pub data: Vec<IndexQuote>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexQuote {
    #[serde(rename = "lastPrice")]
    pub last_price: Option<f64>,
}
