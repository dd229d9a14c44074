//! Exchange rate source port.
//!
//! This trait defines the interface for exchange rate services.
//! Implementations can be HTTP clients, mock providers, etc.

use crate::domain::RateTable;
use crate::error::CurrencyError;
use crate::CurrencyCode;

/// Port trait for exchange rate sources.
#[async_trait::async_trait]
pub trait ExchangeRateSource: Send + Sync + 'static {
    /// Get every known rate quoted against `base`.
    async fn get_exchange_rates(&self, base: CurrencyCode) -> Result<RateTable, CurrencyError>;

    /// Get the exchange rate from one currency to another.
    /// Returns how many units of `to` you get for 1 unit of `from`.
    ///
    /// Identical currencies resolve to `1.0` without touching the source.
    async fn get_exchange_rate(
        &self,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<f64, CurrencyError> {
        if from == to {
            return Ok(1.0);
        }
        let rates = self.get_exchange_rates(from).await?;
        rates
            .get(&to)
            .copied()
            .ok_or(CurrencyError::RateNotFound { from, to })
    }
}
