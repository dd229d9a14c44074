//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use utoipa::OpenApi;

use wallet_types::domain::{CurrencyConversion, ExchangeRate, Language};
use wallet_types::dto::{
    AmountBody, ConversionRequest, CurrencyInfo, CurrencyPreference, FormattedAmount,
    LanguagePreference, RateTableResponse, SetCurrencyRequest,
};
use wallet_types::CurrencyCode;

use crate::cache::CacheStats;

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// List supported currencies
#[utoipa::path(
    get,
    path = "/api/currencies",
    tag = "rates",
    responses(
        (status = 200, description = "Supported currencies", body = Vec<CurrencyInfo>)
    )
)]
async fn list_currencies() {}

/// All rates quoted against a base currency
#[utoipa::path(
    get,
    path = "/api/rates/{base}",
    tag = "rates",
    params(("base" = String, Path, description = "Base currency code", example = "usd")),
    responses(
        (status = 200, description = "Rate table", body = RateTableResponse),
        (status = 400, description = "Unsupported currency"),
        (status = 503, description = "Rate API unreachable or returned an unexpected payload")
    )
)]
async fn get_rate_table() {}

/// Rate for one currency pair (cached for one hour)
#[utoipa::path(
    get,
    path = "/api/rates/{from}/{to}",
    tag = "rates",
    params(
        ("from" = String, Path, description = "Source currency code", example = "usd"),
        ("to" = String, Path, description = "Target currency code", example = "vnd")
    ),
    responses(
        (status = 200, description = "Exchange rate", body = ExchangeRate),
        (status = 400, description = "Unsupported currency"),
        (status = 404, description = "Rate not available for the pair"),
        (status = 503, description = "Rate API unreachable")
    )
)]
async fn get_rate() {}

/// Rate cache statistics
#[utoipa::path(
    get,
    path = "/api/cache",
    tag = "rates",
    responses((status = 200, description = "Cache statistics", body = CacheStats))
)]
async fn cache_stats() {}

/// Drop every cached rate
#[utoipa::path(
    delete,
    path = "/api/cache",
    tag = "rates",
    responses((status = 204, description = "Cache cleared"))
)]
async fn clear_cache() {}

/// Convert an amount between currencies
#[utoipa::path(
    post,
    path = "/api/convert",
    tag = "conversion",
    request_body = ConversionRequest,
    responses(
        (status = 200, description = "Conversion result", body = CurrencyConversion),
        (status = 400, description = "Invalid amount or unsupported currency"),
        (status = 404, description = "Rate not available for the pair"),
        (status = 503, description = "Rate API unreachable")
    )
)]
async fn convert() {}

/// Format an amount for display
#[utoipa::path(
    get,
    path = "/api/format",
    tag = "conversion",
    params(
        ("amount" = f64, Query, description = "Amount in major units", example = 1000000.0),
        ("currency" = String, Query, description = "Currency code", example = "vnd")
    ),
    responses(
        (status = 200, description = "Formatted amount", body = FormattedAmount),
        (status = 400, description = "Unsupported currency")
    )
)]
async fn format_amount() {}

/// Current display currency
#[utoipa::path(
    get,
    path = "/api/preferences/currency",
    tag = "preferences",
    responses((status = 200, description = "Display currency", body = CurrencyPreference))
)]
async fn get_currency() {}

/// Change the display currency
#[utoipa::path(
    put,
    path = "/api/preferences/currency",
    tag = "preferences",
    request_body = SetCurrencyRequest,
    responses(
        (status = 200, description = "Display currency updated", body = CurrencyPreference),
        (status = 400, description = "Unsupported currency")
    )
)]
async fn set_currency() {}

/// Current UI language
#[utoipa::path(
    get,
    path = "/api/preferences/language",
    tag = "preferences",
    responses((status = 200, description = "UI language", body = LanguagePreference))
)]
async fn get_language() {}

/// Change the UI language
#[utoipa::path(
    put,
    path = "/api/preferences/language",
    tag = "preferences",
    request_body = LanguagePreference,
    responses((status = 200, description = "UI language updated", body = LanguagePreference))
)]
async fn set_language() {}

/// Format a base-currency amount in the display currency
#[utoipa::path(
    post,
    path = "/api/display/format",
    tag = "display",
    request_body = AmountBody,
    responses(
        (status = 200, description = "Formatted amount; falls back to the base currency when no rate is available", body = FormattedAmount)
    )
)]
async fn display_format() {}

/// Convert a display-currency amount into the base currency
#[utoipa::path(
    post,
    path = "/api/display/to-base",
    tag = "display",
    request_body = AmountBody,
    responses(
        (status = 200, description = "Amount in the base currency; unchanged when no rate is available", body = AmountBody)
    )
)]
async fn display_to_base() {}

/// OpenAPI documentation for the Wallet Currency API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wallet Currency Service API",
        version = "1.0.0",
        description = "Exchange rates, conversions and display-currency helpers for the personal finance dashboard.\n\nAmounts are stored in the base currency (`vnd` by default) and rendered in the currency selected under `/api/preferences/currency`.",
        license(name = "MIT"),
    ),
    paths(
        health,
        list_currencies,
        get_rate_table,
        get_rate,
        cache_stats,
        clear_cache,
        convert,
        format_amount,
        get_currency,
        set_currency,
        get_language,
        set_language,
        display_format,
        display_to_base,
    ),
    components(
        schemas(
            CurrencyCode,
            CurrencyInfo,
            ExchangeRate,
            RateTableResponse,
            CacheStats,
            ConversionRequest,
            CurrencyConversion,
            FormattedAmount,
            CurrencyPreference,
            SetCurrencyRequest,
            Language,
            LanguagePreference,
            AmountBody,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "rates", description = "Exchange rates and the rate cache"),
        (name = "conversion", description = "Conversion and formatting"),
        (name = "preferences", description = "Client-local preferences"),
        (name = "display", description = "Display currency helpers"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for path in [
            "/health",
            "/api/currencies",
            "/api/rates/{base}",
            "/api/rates/{from}/{to}",
            "/api/convert",
            "/api/format",
            "/api/preferences/currency",
            "/api/preferences/language",
            "/api/display/format",
            "/api/display/to-base",
        ] {
            assert!(paths.contains(&path), "missing {path}");
        }
    }
}
