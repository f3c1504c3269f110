use crate::config;
use crate::error::ProviderError;
use rand::{seq::SliceRandom, thread_rng};
use reqwest::{header, Client, RequestBuilder};
use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;
use tokio_retry::RetryIf;
use tracing::debug;

// -----------------------------------------------
// HTTP CLIENT BUILDER
// -----------------------------------------------
pub fn build_client(timeout: Duration, cookie_store: bool) -> Result<Client, ProviderError> {
    let mut headers = header::HeaderMap::new();

    let lang = config::ACCEPT_LANGUAGES
        .choose(&mut thread_rng())
        .copied()
        .unwrap_or("en-US,en;q=0.9");
    headers.insert(header::ACCEPT_LANGUAGE, header::HeaderValue::from_static(lang));
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("*/*"));

    Client::builder()
        .default_headers(headers)
        .cookie_store(cookie_store)
        .user_agent(config::USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(ProviderError::from)
}

fn preview(text: &str) -> String {
    text.chars().take(200).collect()
}

async fn attempt<F>(build: &F) -> Result<String, ProviderError>
where
    F: Fn() -> RequestBuilder,
{
    let res = build().send().await?;
    let status = res.status();

    if status.is_success() {
        let text = res.text().await?;

        let trimmed = text.trim();
        if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
            return Err(ProviderError::NonJsonResponse(preview(&text)));
        }

        Ok(text)
    } else {
        let body = res.text().await.unwrap_or_default();
        Err(ProviderError::Status {
            status: status.as_u16(),
            body_preview: preview(&body),
        })
    }
}

/// Send the request built by `build`, retrying on network errors, 429 and
/// 5xx with exponential backoff. Other client errors fail immediately.
pub async fn fetch_json<F>(build: F) -> Result<String, ProviderError>
where
    F: Fn() -> RequestBuilder,
{
    let backoff = ExponentialBackoff::from_millis(config::RETRY_BASE_DELAY_MS)
        .factor(config::RETRY_FACTOR)
        .max_delay(Duration::from_secs(config::RETRY_MAX_DELAY_SECS))
        .take(config::RETRY_MAX_ATTEMPTS);

    let build = &build;
    RetryIf::spawn(
        backoff,
        || attempt(build),
        |e: &ProviderError| {
            let retry = e.is_retryable();
            if retry {
                debug!(error = %e, "Retrying request");
            }
            retry
        },
    )
    .await
}
