//! Domain models for the wallet currency service.

pub mod preference;
pub mod rate;

pub use preference::{Language, PreferenceKey, Session};
pub use rate::{CurrencyConversion, ExchangeRate, RateTable};
