use crate::config;
use crate::error::ProviderError;
use crate::models::{Candle, DailySession, Instrument};
use crate::nse_client::NSEClient;
use crate::upstox_client::UpstoxClient;
use crate::yahoo_client::YahooClient;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

/// Source of prices and expiries. Every call may fail; callers treat a
/// failure as "value not available".
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// One-minute candles for a session. `intraday` is set when `date` is
    /// the current calendar date.
    async fn candles(
        &self,
        instrument: Instrument,
        date: NaiveDate,
        intraday: bool,
    ) -> Result<Vec<Candle>, ProviderError>;

    /// Option expiries, ascending and de-duplicated
    async fn expiry_dates(&self, instrument: Instrument) -> Result<Vec<NaiveDate>, ProviderError>;

    /// End-of-day settlement value of the latest session
    async fn daily_close(&self, instrument: Instrument) -> Result<Decimal, ProviderError>;

    async fn spot_price(&self, instrument: Instrument) -> Result<Decimal, ProviderError>;

    /// Daily sessions from `from` up to `until`
    async fn daily_sessions(
        &self,
        instrument: Instrument,
        from: NaiveDate,
        until: NaiveDateTime,
    ) -> Result<Vec<DailySession>, ProviderError>;
}

// -----------------------------------------------
// NUMERIC HELPERS
// -----------------------------------------------

/// JSON number -> Decimal via its shortest decimal text, so 24800.05 stays exact
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    let number = value.as_number()?;
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

pub fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string()).ok()
}

pub fn json_i64(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

// -----------------------------------------------
// LIVE PROVIDER
// -----------------------------------------------

/// Broker for candles and expiries, Yahoo for daily data, the exchange
/// website for NIFTY spot (Yahoo as fallback).
pub struct LiveProvider {
    upstox: UpstoxClient,
    yahoo: YahooClient,
    nse: NSEClient,
}

impl LiveProvider {
    pub fn new(access_token: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            upstox: UpstoxClient::new(access_token)?,
            yahoo: YahooClient::new()?,
            nse: NSEClient::new()?,
        })
    }
}

#[async_trait]
impl MarketDataProvider for LiveProvider {
    async fn candles(
        &self,
        instrument: Instrument,
        date: NaiveDate,
        intraday: bool,
    ) -> Result<Vec<Candle>, ProviderError> {
        let spec = config::instrument_spec(instrument);
        self.upstox.fetch_candles(spec.key, date, intraday).await
    }

    async fn expiry_dates(&self, instrument: Instrument) -> Result<Vec<NaiveDate>, ProviderError> {
        let spec = config::instrument_spec(instrument);
        self.upstox.fetch_expiry_dates(spec.key).await
    }

    async fn daily_close(&self, instrument: Instrument) -> Result<Decimal, ProviderError> {
        let spec = config::instrument_spec(instrument);
        self.yahoo.fetch_daily_close(spec.yahoo_ticker).await
    }

    async fn spot_price(&self, instrument: Instrument) -> Result<Decimal, ProviderError> {
        if instrument == Instrument::Nifty {
            match self.nse.fetch_index_last_price(config::NSE_SPOT_INDEX).await {
                Ok(price) => return Ok(price),
                Err(e) => warn!(error = %e, "Exchange spot unavailable, falling back to daily close"),
            }
        }

        let spec = config::instrument_spec(instrument);
        self.yahoo.fetch_daily_close(spec.yahoo_ticker).await
    }

    async fn daily_sessions(
        &self,
        instrument: Instrument,
        from: NaiveDate,
        until: NaiveDateTime,
    ) -> Result<Vec<DailySession>, ProviderError> {
        let spec = config::instrument_spec(instrument);
        self.yahoo.fetch_daily_sessions(spec.yahoo_ticker, from, until).await
    }
}
