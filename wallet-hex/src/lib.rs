//! # Wallet Hex
//!
//! Application service layer and HTTP adapter for the wallet currency service.
//!
//! ## Architecture
//!
//! - `service` - Conversion service (rate lookups, cache, formatting)
//! - `display` - Display currency context backed by the preference store
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `P: ExchangeRateSource` and the display
//! context over `S: PreferenceStore`, so adapters are injected at compile time.

pub mod cache;
pub mod display;
pub mod inbound;
pub mod openapi;
pub mod service;

#[cfg(test)]
mod service_tests;

pub use cache::{CacheStats, RateCacheConfig};
pub use display::DisplayCurrency;
pub use service::CurrencyService;
