//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use wallet_types::CurrencyCode;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Currency stored amounts are denominated in.
    pub base_currency: CurrencyCode,
    /// Rate API mirrors in the order they are tried. Empty means the client
    /// defaults.
    pub rate_api_urls: Vec<String>,
    pub rate_timeout: Duration,
    pub rate_cache_ttl: Duration,
    pub otel_endpoint: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("Invalid PORT: {e}"))?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://wallet.db?mode=rwc".to_string());

        let base_currency = lookup("BASE_CURRENCY")
            .unwrap_or_else(|| "vnd".to_string())
            .parse::<CurrencyCode>()?;

        let rate_api_urls = lookup("RATE_API_URLS")
            .map(|urls| {
                urls.split(',')
                    .map(str::trim)
                    .filter(|u| !u.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let rate_timeout = Duration::from_secs(secs(&lookup, "RATE_TIMEOUT_SECS", 10)?);
        let rate_cache_ttl = Duration::from_secs(secs(&lookup, "RATE_CACHE_TTL_SECS", 3600)?);

        let otel_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT").filter(|v| !v.is_empty());

        Ok(Self {
            port,
            database_url,
            base_currency,
            rate_api_urls,
            rate_timeout,
            rate_cache_ttl,
            otel_endpoint,
        })
    }
}

fn secs(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> anyhow::Result<u64> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map_err(|e| anyhow::anyhow!("Invalid {key}: {e}")),
        None => Ok(default),
    }
}
