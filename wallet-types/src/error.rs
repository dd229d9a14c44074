//! Error types for the wallet currency service.

use wallet_currency::{CurrencyCode, UnknownCurrency};

/// Currency-level errors (conversion and rate lookup failures).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurrencyError {
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Rate not available for {from} -> {to}")]
    RateNotFound { from: CurrencyCode, to: CurrencyCode },

    #[error("Exchange rate service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid response format: {0}")]
    InvalidResponseFormat(String),
}

impl From<UnknownCurrency> for CurrencyError {
    fn from(err: UnknownCurrency) -> Self {
        CurrencyError::UnsupportedCurrency(err.0)
    }
}

/// Preference store errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid stored value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CurrencyError> for AppError {
    fn from(err: CurrencyError) -> Self {
        match err {
            CurrencyError::UnsupportedCurrency(_) | CurrencyError::InvalidAmount(_) => {
                AppError::BadRequest(err.to_string())
            }
            CurrencyError::RateNotFound { .. } => AppError::NotFound(err.to_string()),
            CurrencyError::ServiceUnavailable(_) | CurrencyError::InvalidResponseFormat(_) => {
                AppError::ServiceUnavailable(err.to_string())
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}
