//! Locale-aware currency formatting.
//!
//! Formatting is two-tiered: [`LocaleFormatter`] renders amounts with the
//! punctuation and symbol placement of the currency's locale, and
//! [`PlainFormatter`] is a deterministic fallback used whenever the locale
//! formatter rejects an amount.

use crate::{CurrencyCode, SymbolPosition, round_to};

/// Largest integer an `f64` represents exactly (2^53 - 1).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Reasons the locale formatter refuses an amount.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("Amount is not a finite number: {0}")]
    NonFinite(f64),

    #[error("Amount {0} is too large to format exactly")]
    OutOfRange(f64),
}

/// Primary formatter: grouped digits, locale separators, currency symbol.
///
/// Zero-decimal currencies never show fractional digits and their symbol is
/// attached without a space (`1.000.000₫`).
#[derive(Debug, Default, Clone, Copy)]
pub struct LocaleFormatter;

impl LocaleFormatter {
    pub fn format(&self, amount: f64, currency: CurrencyCode) -> Result<String, FormatError> {
        if !amount.is_finite() {
            return Err(FormatError::NonFinite(amount));
        }

        let decimals = currency.decimal_places();
        let factor = 10f64.powi(decimals as i32);
        let rounded = round_to(amount, decimals);
        if rounded.abs() * factor > MAX_EXACT_INTEGER {
            return Err(FormatError::OutOfRange(amount));
        }

        let minor_units = (rounded.abs() * factor).round() as u64;
        let scale = factor as u64;
        let whole = minor_units / scale;
        let fraction = minor_units % scale;

        let locale = currency.locale();
        let mut number = group_digits(&whole.to_string(), locale.grouping_separator);
        if decimals > 0 {
            number.push(locale.decimal_separator);
            number.push_str(&format!("{:0width$}", fraction, width = decimals as usize));
        }

        let sign = if rounded < 0.0 && minor_units != 0 { "-" } else { "" };
        Ok(match currency.symbol_position() {
            SymbolPosition::Prefix => format!("{sign}{}{number}", currency.symbol()),
            SymbolPosition::Suffix => format!("{sign}{number}{}", currency.symbol()),
        })
    }
}

/// Fallback formatter: `"<amount> <CODE>"` with the currency precision and no
/// grouping. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainFormatter;

impl PlainFormatter {
    pub fn format(&self, amount: f64, currency: CurrencyCode) -> String {
        format!(
            "{:.*} {}",
            currency.decimal_places() as usize,
            amount,
            currency.code().to_uppercase()
        )
    }
}

/// Formats `amount` in `currency`, falling back to the plain form when the
/// locale formatter rejects it.
pub fn format_currency(amount: f64, currency: CurrencyCode) -> String {
    LocaleFormatter
        .format(amount, currency)
        .unwrap_or_else(|_| PlainFormatter.format(amount, currency))
}

/// Inserts `separator` between every group of three digits, counting from the
/// right. `digits` must be ASCII digits only.
pub(crate) fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("0", ','), "0");
        assert_eq!(group_digits("999", ','), "999");
        assert_eq!(group_digits("1000", ','), "1,000");
        assert_eq!(group_digits("1234567", '.'), "1.234.567");
    }

    #[test]
    fn test_vnd_has_no_space_before_symbol() {
        assert_eq!(format_currency(1_000_000.0, CurrencyCode::VND), "1.000.000₫");
        assert_eq!(format_currency(0.0, CurrencyCode::VND), "0₫");
    }

    #[test]
    fn test_vnd_rounds_to_whole_units() {
        assert_eq!(format_currency(25_000.6, CurrencyCode::VND), "25.001₫");
        assert_eq!(format_currency(999.4, CurrencyCode::VND), "999₫");
    }

    #[test]
    fn test_usd_shows_two_decimals_with_leading_symbol() {
        assert_eq!(format_currency(1234.5, CurrencyCode::USD), "$1,234.50");
        assert_eq!(format_currency(0.1, CurrencyCode::USD), "$0.10");
        assert_eq!(format_currency(1_000_000.0, CurrencyCode::USD), "$1,000,000.00");
    }

    #[test]
    fn test_negative_amounts() {
        assert_eq!(format_currency(-1234.5, CurrencyCode::USD), "-$1,234.50");
        assert_eq!(format_currency(-50_000.0, CurrencyCode::VND), "-50.000₫");
        // Rounds to zero, so no sign.
        assert_eq!(format_currency(-0.001, CurrencyCode::USD), "$0.00");
    }

    #[test]
    fn test_locale_formatter_rejects_non_finite() {
        assert_eq!(
            LocaleFormatter.format(f64::INFINITY, CurrencyCode::USD),
            Err(FormatError::NonFinite(f64::INFINITY))
        );
        assert!(matches!(
            LocaleFormatter.format(1e300, CurrencyCode::VND),
            Err(FormatError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_plain_formatter() {
        assert_eq!(PlainFormatter.format(1234.5, CurrencyCode::USD), "1234.50 USD");
        assert_eq!(PlainFormatter.format(1_000_000.0, CurrencyCode::VND), "1000000 VND");
    }

    #[test]
    fn test_falls_back_to_plain_formatter() {
        assert_eq!(format_currency(f64::INFINITY, CurrencyCode::USD), "inf USD");
        assert_eq!(format_currency(1e300, CurrencyCode::VND), format!("{:.0} VND", 1e300));
    }
}
