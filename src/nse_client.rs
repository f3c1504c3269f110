use crate::config;
use crate::error::ProviderError;
use crate::http;
use crate::models::IndexQuoteResponse;
use crate::provider::decimal_from_f64;
use reqwest::{header, Client};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

// -----------------------------------------------
// EXCHANGE WEBSITE CLIENT WITH SESSION STATE
// -----------------------------------------------
pub struct NSEClient {
    client: Client,
    warmed_up: Arc<RwLock<bool>>,
}

impl NSEClient {
    pub fn new() -> Result<Self, ProviderError> {
        Ok(Self {
            client: http::build_client(config::SPOT_HTTP_TIMEOUT, true)?,
            warmed_up: Arc::new(RwLock::new(false)),
        })
    }

    /// The JSON API refuses requests without the cookies set by the home page
    async fn warmup_if_needed(&self) -> Result<(), ProviderError> {
        if *self.warmed_up.read().await {
            return Ok(());
        }

        let mut warmed = self.warmed_up.write().await;
        if !*warmed {
            self.client
                .get(config::NSE_BASE_URL)
                .header(header::ACCEPT, config::HEADER_ACCEPT_HTML)
                .send()
                .await?;

            tokio::time::sleep(Duration::from_millis(config::WARMUP_DELAY_MS)).await;
            *warmed = true;
        }

        Ok(())
    }

    async fn fetch_json(&self, url: &str) -> Result<String, ProviderError> {
        self.warmup_if_needed().await?;

        http::fetch_json(|| {
            self.client
                .get(url)
                .header(header::REFERER, config::HEADER_REFERER)
                .header("X-Requested-With", config::HEADER_X_REQUESTED_WITH)
        })
        .await
    }

    /// Last traded price of an index, e.g. "NIFTY 50"
    pub async fn fetch_index_last_price(&self, index: &str) -> Result<Decimal, ProviderError> {
        let text = self.fetch_json(&config::nse_index_quote_url(index)).await?;
        let price = parse_last_price(&text)?;
        info!(index, %price, "Fetched exchange spot");
        Ok(price)
    }
}

/// `data[0].lastPrice` of an index quote payload
pub fn parse_last_price(text: &str) -> Result<Decimal, ProviderError> {
    let response: IndexQuoteResponse = serde_json::from_str(text)?;
    response
        .data
        .first()
        .and_then(|q| q.last_price)
        .and_then(decimal_from_f64)
        .ok_or_else(|| ProviderError::NoData("lastPrice".to_string()))
}
