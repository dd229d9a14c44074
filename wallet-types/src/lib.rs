//! # Wallet Types
//!
//! Domain types and port traits for the wallet currency service.
//! This crate has ZERO external IO dependencies - only data structures,
//! validation rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (ExchangeRate, CurrencyConversion, preferences)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    CurrencyConversion, ExchangeRate, Language, PreferenceKey, RateTable, Session,
};
pub use dto::*;
pub use error::{AppError, CurrencyError, StoreError};
pub use ports::{ExchangeRateSource, PreferenceStore};
pub use wallet_currency::CurrencyCode;
