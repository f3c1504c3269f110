use crate::config;
use crate::error::ProviderError;
use crate::expiry::normalize_expiries;
use crate::http;
use crate::models::{Candle, CandleResponse, OptionContractResponse};
use crate::provider::{decimal_from_json, json_i64};
use chrono::NaiveDate;
use reqwest::{header, Client};
use serde_json::Value;
use tracing::{debug, info};

// -----------------------------------------------
// BROKER REST CLIENT (candles + option expiries)
// -----------------------------------------------
pub struct UpstoxClient {
    client: Client,
    access_token: String,
}

impl UpstoxClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http::build_client(config::HTTP_TIMEOUT, false)?,
            access_token: access_token.into(),
        })
    }

    async fn get(&self, url: &str) -> Result<String, ProviderError> {
        let bearer = format!("Bearer {}", self.access_token);
        http::fetch_json(|| {
            self.client
                .get(url)
                .header(header::ACCEPT, config::HEADER_ACCEPT_JSON)
                .header(header::AUTHORIZATION, bearer.as_str())
        })
        .await
    }

    /// One-minute candles for `key` on `date`. The intraday endpoint serves
    /// the current session; the historical one serves completed sessions.
    pub async fn fetch_candles(
        &self,
        key: &str,
        date: NaiveDate,
        intraday: bool,
    ) -> Result<Vec<Candle>, ProviderError> {
        let url = if intraday {
            config::upstox_intraday_candle_url(key)
        } else {
            config::upstox_historical_candle_url(key, &date.format("%Y-%m-%d").to_string())
        };

        let text = self.get(&url).await?;
        let candles = parse_candles(&text)?;
        info!(key, %date, intraday, count = candles.len(), "Fetched candles");
        Ok(candles)
    }

    /// Option expiries for `key`, ascending and de-duplicated
    pub async fn fetch_expiry_dates(&self, key: &str) -> Result<Vec<NaiveDate>, ProviderError> {
        let url = config::upstox_option_contract_url(key);
        let text = self.get(&url).await?;
        parse_expiry_dates(&text)
    }
}

/// `[timestamp, open, high, low, close, volume, (oi)]`
fn parse_candle_row(row: &Value) -> Option<Candle> {
    let fields = row.as_array()?;
    if fields.len() < 5 {
        return None;
    }

    Some(Candle {
        timestamp: fields[0].as_str()?.to_string(),
        open: decimal_from_json(&fields[1])?,
        high: decimal_from_json(&fields[2])?,
        low: decimal_from_json(&fields[3])?,
        close: decimal_from_json(&fields[4])?,
        volume: fields.get(5).and_then(json_i64).unwrap_or(0),
    })
}

/// Parse a candle payload, skipping rows that do not have the expected shape
pub fn parse_candles(text: &str) -> Result<Vec<Candle>, ProviderError> {
    let response: CandleResponse = serde_json::from_str(text)?;
    let rows = response
        .data
        .ok_or_else(|| ProviderError::NoData("candles".to_string()))?
        .candles;

    Ok(rows
        .iter()
        .filter_map(|row| {
            let candle = parse_candle_row(row);
            if candle.is_none() {
                debug!(%row, "Skipping malformed candle row");
            }
            candle
        })
        .collect())
}

/// Parse an option contract payload into sorted unique expiry dates.
/// Contracts without a parseable `expiry` are skipped.
pub fn parse_expiry_dates(text: &str) -> Result<Vec<NaiveDate>, ProviderError> {
    let response: OptionContractResponse = serde_json::from_str(text)?;

    let dates = response.data.iter().filter_map(|contract| {
        let raw = contract.expiry.as_deref()?;
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(d) => Some(d),
            Err(_) => {
                debug!(expiry = raw, "Skipping contract with malformed expiry");
                None
            }
        }
    });

    Ok(normalize_expiries(dates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_candles_skips_bad_rows() {
        let text = r#"{
            "status": "success",
            "data": {
                "candles": [
                    ["2025-01-10T15:29:00+05:30", 23450.1, 23460.0, 23440.25, 23455.05, 0, 0],
                    ["2025-01-10T15:28:00+05:30", "x", 1, 1, 1, 0, 0],
                    [1736503080, 1, 1, 1, 1, 0, 0],
                    ["2025-01-10T15:27:00+05:30", 1, 2],
                    ["2025-01-10T09:15:00+05:30", 23500, 23510, 23490, 23505, 120]
                ]
            }
        }"#;

        let candles = parse_candles(text).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].close, dec!(23455.05));
        assert_eq!(candles[0].low, dec!(23440.25));
        assert_eq!(candles[1].open, dec!(23500));
        assert_eq!(candles[1].volume, 120);
    }

    #[test]
    fn test_parse_candles_without_data_is_no_data() {
        let err = parse_candles(r#"{"status": "error"}"#).unwrap_err();
        assert!(matches!(err, ProviderError::NoData(_)));
    }

    #[test]
    fn test_parse_expiry_dates() {
        let text = r#"{
            "status": "success",
            "data": [
                {"expiry": "2025-01-16", "strike_price": 23000},
                {"expiry": "2025-01-09", "strike_price": 23000},
                {"expiry": "2025-01-09", "strike_price": 23100},
                {"expiry": "09-Jan-2025"},
                {"strike_price": 23200}
            ]
        }"#;

        let dates = parse_expiry_dates(text).unwrap();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2025, 1, 9).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 16).unwrap(),
            ]
        );
    }
}
