//! Currency Application Service
//!
//! Orchestrates rate lookups through the exchange rate port and keeps a
//! time-boxed cache of fetched pairs. Contains NO transport logic.

use wallet_currency::format_currency;
use wallet_types::{
    ConversionRequest, CurrencyCode, CurrencyConversion, CurrencyError, ExchangeRate,
    ExchangeRateSource, RateTable,
};

use crate::cache::{CacheStats, RateCache, RateCacheConfig};

/// Application service for conversions and rate lookups.
///
/// Generic over `P: ExchangeRateSource` - the adapter is injected at compile time,
/// so tests drive the service with an in-process fake.
pub struct CurrencyService<P: ExchangeRateSource> {
    source: P,
    cache: RateCache,
}

impl<P: ExchangeRateSource> CurrencyService<P> {
    /// Creates a service with the default one hour rate cache.
    pub fn new(source: P) -> Self {
        Self::with_cache_config(source, RateCacheConfig::default())
    }

    pub fn with_cache_config(source: P, config: RateCacheConfig) -> Self {
        Self {
            source,
            cache: RateCache::with_config(config),
        }
    }

    /// Returns a reference to the underlying rate source.
    pub fn source(&self) -> &P {
        &self.source
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Conversion
    // ─────────────────────────────────────────────────────────────────────────────

    /// Converts an amount between two currencies using the cached rate.
    ///
    /// The amount and both codes are validated before the rate source is touched.
    #[tracing::instrument(skip(self))]
    pub async fn convert_currency(
        &self,
        req: ConversionRequest,
    ) -> Result<CurrencyConversion, CurrencyError> {
        if !req.amount.is_finite() || req.amount < 0.0 {
            return Err(CurrencyError::InvalidAmount(req.amount.to_string()));
        }
        let from: CurrencyCode = req.from.parse()?;
        let to: CurrencyCode = req.to.parse()?;

        let rate = self.get_rate_details(from, to).await?;
        let conversion = CurrencyConversion::new(req.amount, &rate);
        tracing::debug!(converted = conversion.converted_amount, "Conversion complete");
        Ok(conversion)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Rates
    // ─────────────────────────────────────────────────────────────────────────────

    /// Uncached lookup straight from the source.
    #[tracing::instrument(skip(self))]
    pub async fn get_exchange_rate(
        &self,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<f64, CurrencyError> {
        self.source.get_exchange_rate(from, to).await
    }

    /// Cached lookup: served from the cache while the entry is younger than
    /// the TTL, otherwise fetched and stored.
    pub async fn get_exchange_rate_with_cache(
        &self,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<f64, CurrencyError> {
        self.get_rate_details(from, to).await.map(|r| r.rate)
    }

    /// Cached lookup returning the rate together with its fetch time.
    #[tracing::instrument(skip(self))]
    pub async fn get_rate_details(
        &self,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<ExchangeRate, CurrencyError> {
        if from == to {
            return Ok(ExchangeRate::new(from, to, 1.0));
        }
        if let Some(rate) = self.cache.get(from, to) {
            return Ok(rate);
        }

        let rate = ExchangeRate::new(from, to, self.source.get_exchange_rate(from, to).await?);
        self.cache.insert(rate.clone());
        Ok(rate)
    }

    /// Every rate quoted against `base`, uncached.
    #[tracing::instrument(skip(self))]
    pub async fn get_rate_table(&self, base: CurrencyCode) -> Result<RateTable, CurrencyError> {
        self.source.get_exchange_rates(base).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Formatting & Catalogue
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn format_currency(&self, amount: f64, currency: CurrencyCode) -> String {
        format_currency(amount, currency)
    }

    pub fn supported_currencies(&self) -> &'static [CurrencyCode] {
        CurrencyCode::all()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Cache Management
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn clear_cache(&self) {
        self.cache.clear();
        tracing::info!("Rate cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
