use crate::config;
use crate::error::ProviderError;
use crate::http;
use crate::models::{ChartResponse, ChartResult, DailySession};
use crate::provider::decimal_from_f64;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use reqwest::{header, Client};
use rust_decimal::Decimal;
use tracing::info;

// -----------------------------------------------
// YAHOO CHART CLIENT (daily close, daily sessions)
// -----------------------------------------------
pub struct YahooClient {
    client: Client,
}

fn exchange_timestamp(local: NaiveDateTime) -> Option<i64> {
    local
        .and_local_timezone(config::EXCHANGE_TZ)
        .earliest()
        .map(|dt| dt.timestamp())
}

impl YahooClient {
    pub fn new() -> Result<Self, ProviderError> {
        Ok(Self {
            client: http::build_client(config::HTTP_TIMEOUT, false)?,
        })
    }

    async fn fetch_chart(&self, url: &str) -> Result<ChartResult, ProviderError> {
        let text = http::fetch_json(|| {
            self.client
                .get(url)
                .header(header::ACCEPT, config::HEADER_ACCEPT_JSON)
        })
        .await?;

        let response: ChartResponse = serde_json::from_str(&text)?;
        response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| ProviderError::NoData(format!("chart {}", url)))
    }

    /// Close of the most recent daily bar, rounded to 2 decimals
    pub async fn fetch_daily_close(&self, ticker: &str) -> Result<Decimal, ProviderError> {
        let chart = self
            .fetch_chart(&config::yahoo_chart_range_url(ticker, "5d"))
            .await?;

        let close = latest_close(&chart)
            .ok_or_else(|| ProviderError::NoData(format!("daily close for {}", ticker)))?;
        info!(ticker, %close, "Fetched daily close");
        Ok(close)
    }

    pub async fn fetch_daily_sessions(
        &self,
        ticker: &str,
        from: NaiveDate,
        until: NaiveDateTime,
    ) -> Result<Vec<DailySession>, ProviderError> {
        let period1 = exchange_timestamp(from.and_time(NaiveTime::MIN))
            .ok_or_else(|| ProviderError::Parse(format!("invalid start {}", from)))?;
        let period2 = exchange_timestamp(until)
            .ok_or_else(|| ProviderError::Parse(format!("invalid end {}", until)))?;

        let chart = self
            .fetch_chart(&config::yahoo_chart_period_url(ticker, period1, period2))
            .await?;
        Ok(daily_sessions(&chart))
    }
}

pub fn latest_close(chart: &ChartResult) -> Option<Decimal> {
    let quote = chart.indicators.quote.first()?;
    quote
        .close
        .iter()
        .rev()
        .find_map(|c| c.and_then(decimal_from_f64))
        .map(|c| c.round_dp(2))
}

/// Zip timestamps with open/close; bars with a missing value are dropped.
/// Dates are taken on the exchange clock.
pub fn daily_sessions(chart: &ChartResult) -> Vec<DailySession> {
    let Some(quote) = chart.indicators.quote.first() else {
        return Vec::new();
    };

    chart
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| {
            let open = quote.open.get(i).copied().flatten().and_then(decimal_from_f64)?;
            let close = quote.close.get(i).copied().flatten().and_then(decimal_from_f64)?;
            let date = DateTime::from_timestamp(*ts, 0)?
                .with_timezone(&config::EXCHANGE_TZ)
                .date_naive();
            Some(DailySession { date, open, close })
        })
        .collect()
}
