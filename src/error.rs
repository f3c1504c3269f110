use std::fmt;

/// Failures at the provider boundary. The engine absorbs these and reports
/// the affected value as unavailable.
#[derive(Debug)]
pub enum ProviderError {
    Request(String),
    Status { status: u16, body_preview: String },
    NonJsonResponse(String),
    Parse(String),
    NoData(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProviderError::Request(msg) => write!(f, "Request error: {}", msg),
            ProviderError::Status { status, body_preview } => {
                write!(f, "HTTP {}: {}", status, body_preview)
            }
            ProviderError::NonJsonResponse(preview) => write!(f, "Non-JSON response: {}", preview),
            ProviderError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ProviderError::NoData(what) => write!(f, "No data: {}", what),
        }
    }
}

impl std::error::Error for ProviderError {}

impl ProviderError {
    /// Network failures, rate limits and server errors are worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Request(_) => true,
            ProviderError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Request(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(err.to_string())
    }
}

/// Conditions that stop an invocation outright
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    MissingCredential,
    NoValidExpiry,
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SignalError::MissingCredential => write!(
                f,
                "No access token found. Set UPSTOX_ACCESS_TOKEN or create config.json"
            ),
            SignalError::NoValidExpiry => write!(f, "No valid expiry found for trading today"),
        }
    }
}

impl std::error::Error for SignalError {}
