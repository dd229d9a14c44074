//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Language;
use crate::CurrencyCode;

// ─────────────────────────────────────────────────────────────────────────────
// Conversion DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to convert an amount between two currencies.
///
/// Codes are plain strings so unsupported currencies are reported as a
/// validation error instead of a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversionRequest {
    /// Non-negative amount in major units of `from`
    #[schema(example = 100.0)]
    pub amount: f64,
    #[schema(example = "usd")]
    pub from: String,
    #[schema(example = "vnd")]
    pub to: String,
}

impl ConversionRequest {
    pub fn new(amount: f64, from: CurrencyCode, to: CurrencyCode) -> Self {
        Self {
            amount,
            from: from.code().to_string(),
            to: to.code().to_string(),
        }
    }
}

/// Query for formatting an amount in a currency.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormatQuery {
    #[schema(example = 1000000.0)]
    pub amount: f64,
    #[schema(example = "vnd")]
    pub currency: String,
}

/// A formatted amount ready for display.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FormattedAmount {
    #[schema(example = "1.000.000₫")]
    pub formatted: String,
}

/// An amount without currency, interpreted by the endpoint it is sent to.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AmountBody {
    #[schema(example = 250000.0)]
    pub amount: f64,
}

/// Every rate quoted against one base currency.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateTableResponse {
    pub base: CurrencyCode,
    /// Rates keyed by lowercase currency code
    pub rates: std::collections::BTreeMap<String, f64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Preference DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// The selected display currency.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrencyPreference {
    pub currency: CurrencyCode,
}

/// Request to change the display currency.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetCurrencyRequest {
    #[schema(example = "usd")]
    pub currency: String,
}

/// The selected UI language.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LanguagePreference {
    pub language: Language,
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalogue DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// A supported currency and how it is displayed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrencyInfo {
    pub code: CurrencyCode,
    #[schema(example = "₫")]
    pub symbol: String,
    #[schema(example = 0)]
    pub decimal_places: u32,
    #[schema(example = "vi-VN")]
    pub locale: String,
}

impl From<CurrencyCode> for CurrencyInfo {
    fn from(code: CurrencyCode) -> Self {
        Self {
            code,
            symbol: code.symbol().to_string(),
            decimal_places: code.decimal_places(),
            locale: code.locale().tag.to_string(),
        }
    }
}
