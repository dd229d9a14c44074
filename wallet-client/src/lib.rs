//! # Exchange Rate Client
//!
//! A typed Rust client for the public currency rate API
//! (`GET {base}/currencies/{code}.min.json`).
//!
//! Endpoints are tried in order; the first one that answers with a usable
//! rate table wins. Every lower-level failure is collapsed into a
//! [`CurrencyError`] at this boundary.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, warn};

use wallet_types::{CurrencyCode, CurrencyError, ExchangeRateSource, RateTable};

/// Primary mirror of the rate API.
pub const PRIMARY_BASE_URL: &str = "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1";

/// Fallback mirror of the rate API.
pub const FALLBACK_BASE_URL: &str = "https://latest.currency-api.pages.dev/v1";

/// Upper bound on a single endpoint attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for a single endpoint attempt.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: status {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Format(String),
}

/// Exchange rate API client.
pub struct ExchangeRateClient {
    endpoints: Vec<String>,
    timeout: Duration,
    http: Client,
}

impl ExchangeRateClient {
    /// Creates a client using the primary and fallback mirrors.
    pub fn new() -> Self {
        Self::with_endpoints([PRIMARY_BASE_URL, FALLBACK_BASE_URL])
    }

    /// Creates a client that tries `endpoints` in order.
    pub fn with_endpoints<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            endpoints: endpoints
                .into_iter()
                .map(|url| {
                    let url: String = url.into();
                    url.trim_end_matches('/').to_string()
                })
                .collect(),
            timeout: DEFAULT_TIMEOUT,
            http: Client::new(),
        }
    }

    /// Sets the per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, endpoint: &str, base: CurrencyCode) -> Result<RateTable, ClientError> {
        let url = format!("{}/currencies/{}.min.json", endpoint, base.code());
        let resp = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        let payload: Value =
            serde_json::from_str(&body).map_err(|e| ClientError::Format(e.to_string()))?;
        parse_rate_table(base, &payload).map_err(ClientError::Format)
    }
}

impl Default for ExchangeRateClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExchangeRateSource for ExchangeRateClient {
    #[tracing::instrument(skip(self))]
    async fn get_exchange_rates(&self, base: CurrencyCode) -> Result<RateTable, CurrencyError> {
        let mut last_error = None;
        let mut format_failures = 0;

        for endpoint in &self.endpoints {
            match self.fetch(endpoint, base).await {
                Ok(rates) => {
                    debug!(endpoint = %endpoint, count = rates.len(), "Fetched rate table");
                    return Ok(rates);
                }
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "Rate endpoint failed");
                    if matches!(e, ClientError::Format(_)) {
                        format_failures += 1;
                    }
                    last_error = Some(e);
                }
            }
        }

        let detail = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no endpoints configured".to_string());

        if format_failures > 0 && format_failures == self.endpoints.len() {
            Err(CurrencyError::InvalidResponseFormat(detail))
        } else {
            Err(CurrencyError::ServiceUnavailable(detail))
        }
    }
}

/// Extracts the rate table for `base` from an API payload.
///
/// The table sits under a key equal to the base code or, failing that, under
/// the first other object-valued key that is not `date`. Entries for
/// currencies outside the catalogue and non-numeric entries are skipped.
pub fn parse_rate_table(base: CurrencyCode, payload: &Value) -> Result<RateTable, String> {
    let object = payload
        .as_object()
        .ok_or_else(|| "payload is not a JSON object".to_string())?;

    let table = match object.get(base.code()) {
        Some(Value::Object(table)) => table,
        _ => object
            .iter()
            .filter(|(key, _)| key.as_str() != "date")
            .find_map(|(_, value)| value.as_object())
            .ok_or_else(|| format!("no rate table for {} in payload", base))?,
    };

    Ok(CurrencyCode::all()
        .iter()
        .filter_map(|&code| {
            table
                .get(code.code())
                .and_then(Value::as_f64)
                .map(|rate| (code, rate))
        })
        .collect())
}
