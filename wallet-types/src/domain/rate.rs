//! Exchange rates and conversion results.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use wallet_currency::{CurrencyCode, round_to};

/// Rates quoted against one base currency: units of the key currency per one
/// unit of the base.
pub type RateTable = HashMap<CurrencyCode, f64>;

/// A single currency-pair rate as fetched from the rate API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExchangeRate {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    /// Units of `to` per one unit of `from`.
    #[schema(example = 25000.0)]
    pub rate: f64,
    pub last_updated: DateTime<Utc>,
}

impl ExchangeRate {
    pub fn new(from: CurrencyCode, to: CurrencyCode, rate: f64) -> Self {
        Self {
            from,
            to,
            rate,
            last_updated: Utc::now(),
        }
    }

    /// Applies the rate and rounds to the target currency's precision.
    pub fn apply(&self, amount: f64) -> f64 {
        round_to(amount * self.rate, self.to.decimal_places())
    }
}

/// Result of one conversion. Returned to the caller, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyConversion {
    #[schema(example = 100.0)]
    pub amount: f64,
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    #[schema(example = 2500000.0)]
    pub converted_amount: f64,
    #[schema(example = 25000.0)]
    pub exchange_rate: f64,
    pub timestamp: DateTime<Utc>,
}

impl CurrencyConversion {
    pub fn new(amount: f64, rate: &ExchangeRate) -> Self {
        Self {
            amount,
            from_currency: rate.from,
            to_currency: rate.to,
            converted_amount: rate.apply(amount),
            exchange_rate: rate.rate,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_rounds_to_target_precision() {
        let to_vnd = ExchangeRate::new(CurrencyCode::USD, CurrencyCode::VND, 25_432.7);
        assert_eq!(to_vnd.apply(1.5), 38_149.0);

        let to_usd = ExchangeRate::new(CurrencyCode::VND, CurrencyCode::USD, 0.0000393);
        assert_eq!(to_usd.apply(1_000_000.0), 39.3);
    }

    #[test]
    fn test_conversion_from_rate() {
        let rate = ExchangeRate::new(CurrencyCode::USD, CurrencyCode::VND, 25_000.0);
        let conversion = CurrencyConversion::new(100.0, &rate);
        assert_eq!(conversion.converted_amount, 2_500_000.0);
        assert_eq!(conversion.exchange_rate, 25_000.0);
        assert_eq!(conversion.to_currency, CurrencyCode::VND);
    }

    #[test]
    fn test_conversion_serializes_camel_case() {
        let rate = ExchangeRate::new(CurrencyCode::USD, CurrencyCode::VND, 25_000.0);
        let json = serde_json::to_value(CurrencyConversion::new(2.0, &rate)).unwrap();
        assert_eq!(json["fromCurrency"], "usd");
        assert_eq!(json["convertedAmount"], 50_000.0);
    }
}
