//! Currency Catalogue with Macro-Based Currency Generation
//!
//! Supported currencies are defined declaratively with `define_currencies!`,
//! which generates the runtime `CurrencyCode` enum together with the metadata
//! the formatter and the amount input parser need: symbol, precision, locale
//! punctuation and symbol placement.
//!
//! # Adding a New Currency
//! Add a line to the `define_currencies!` invocation:
//! ```ignore
//! define_currencies! {
//!     // ... existing currencies ...
//!     EUR => ("eur", "€", 2, "de-DE", '.', ',', SymbolPosition::Suffix),
//! }
//! ```
//!
//! # Example
//! ```
//! use wallet_currency::{CurrencyCode, format_currency, input::parse_amount};
//!
//! assert_eq!(format_currency(1_000_000.0, CurrencyCode::VND), "1.000.000₫");
//! assert_eq!(format_currency(1234.5, CurrencyCode::USD), "$1,234.50");
//! assert_eq!(parse_amount("1,234.5", CurrencyCode::USD).unwrap(), 1234.5);
//! ```

pub mod format;
pub mod input;

pub use format::{FormatError, LocaleFormatter, PlainFormatter, format_currency};
pub use input::{AmountInput, AmountInputState, AmountSource, InputPhase, InputUpdate, ValidationError};

// ─────────────────────────────────────────────────────────────────────────────
// Locale Metadata
// ─────────────────────────────────────────────────────────────────────────────

/// Where the currency symbol sits relative to the digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

/// Number punctuation of the locale a currency is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale {
    pub tag: &'static str,
    pub grouping_separator: char,
    pub decimal_separator: char,
}

/// Returned when a currency code is not part of the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown currency: {0}")]
pub struct UnknownCurrency(pub String);

/// Rounds half away from zero to `decimals` places.
///
/// `f64::EPSILON` is added to the magnitude before scaling so values such as
/// `1.005` that sit just under the midpoint in binary still round up.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (((value.abs() + f64::EPSILON) * factor).round() / factor).copysign(value)
}

// ─────────────────────────────────────────────────────────────────────────────
// THE MACRO: Defines all currencies and the CurrencyCode enum
// ─────────────────────────────────────────────────────────────────────────────

/// Macro to define currencies with auto-generated metadata accessors.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     Name => ("code", "symbol", decimal_places, "locale", grouping, decimal, position),
/// }
/// ```
#[macro_export]
macro_rules! define_currencies {
    (
        $(
            $name:ident => ($code:literal, $symbol:literal, $decimals:expr, $locale:literal, $grouping:literal, $decimal:literal, $position:expr)
        ),* $(,)?
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
        #[serde(rename_all = "lowercase")]
        pub enum CurrencyCode {
            $($name),*
        }

        impl CurrencyCode {
            /// Lowercase code as used by the rate API and the preference store.
            pub fn code(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $code),*
                }
            }

            pub fn symbol(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $symbol),*
                }
            }

            /// Number of fractional digits amounts are rounded to.
            pub fn decimal_places(&self) -> u32 {
                match self {
                    $(CurrencyCode::$name => $decimals),*
                }
            }

            pub fn locale(&self) -> Locale {
                match self {
                    $(CurrencyCode::$name => Locale {
                        tag: $locale,
                        grouping_separator: $grouping,
                        decimal_separator: $decimal,
                    }),*
                }
            }

            pub fn symbol_position(&self) -> SymbolPosition {
                match self {
                    $(CurrencyCode::$name => $position),*
                }
            }

            pub fn is_zero_decimal(&self) -> bool {
                self.decimal_places() == 0
            }

            pub fn all() -> &'static [CurrencyCode] {
                &[$(CurrencyCode::$name),*]
            }
        }

        impl std::fmt::Display for CurrencyCode {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.code())
            }
        }

        impl std::str::FromStr for CurrencyCode {
            type Err = UnknownCurrency;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($code => Ok(CurrencyCode::$name),)*
                    _ => Err(UnknownCurrency(s.to_string())),
                }
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// CURRENCY DEFINITIONS - Add new currencies here!
// ─────────────────────────────────────────────────────────────────────────────

define_currencies! {
    USD => ("usd", "$", 2, "en-US", ',', '.', SymbolPosition::Prefix),
    VND => ("vnd", "₫", 0, "vi-VN", '.', ',', SymbolPosition::Suffix),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
