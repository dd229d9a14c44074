//! Live amount input parsing.
//!
//! [`AmountInput`] keeps a text field's display string and its numeric value
//! in step while the user types. Display strings carry the currency locale's
//! thousand separators; the numeric value is what callers persist.
//!
//! ```
//! use wallet_currency::{AmountInput, CurrencyCode};
//!
//! let mut input = AmountInput::new(CurrencyCode::USD);
//! let update = input.on_change("1234.5", 6);
//! assert_eq!(update.display, "1,234.5");
//! assert_eq!(update.value, Some(1234.5));
//! assert_eq!(update.cursor, 7);
//! ```

use crate::format::group_digits;
use crate::{CurrencyCode, round_to};

/// Validation failures surfaced next to the field on each keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Only digits are allowed")]
    DigitsOnly,

    #[error("Only digits and a decimal point are allowed")]
    InvalidCharacters,

    #[error("Only one decimal point is allowed")]
    MultipleDecimalPoints,

    #[error("Negative amounts are not allowed")]
    NegativeNotAllowed,

    #[error("Amount is too large")]
    TooLarge,
}

/// Where a field is in its edit lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPhase {
    Empty,
    /// Incomplete but acceptable text: a lone `-` or a trailing decimal point.
    Typing,
    Valid,
    Invalid,
    Committed,
}

/// Display string and numeric value of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountInputState {
    pub display: String,
    pub value: f64,
}

/// Result of feeding a keystroke to [`AmountInput::on_change`].
#[derive(Debug, Clone, PartialEq)]
pub struct InputUpdate {
    pub display: String,
    /// New numeric value to hand to the caller, `None` when the text was rejected.
    pub value: Option<f64>,
    /// Caret position in characters, shifted by the reformatting delta.
    pub cursor: usize,
    pub error: Option<ValidationError>,
}

/// Value assigned from outside the keystroke flow, e.g. when editing a record.
#[derive(Debug, Clone, PartialEq)]
pub enum AmountSource {
    Number(f64),
    Text(String),
}

impl From<f64> for AmountSource {
    fn from(value: f64) -> Self {
        AmountSource::Number(value)
    }
}

impl From<&str> for AmountSource {
    fn from(text: &str) -> Self {
        AmountSource::Text(text.to_string())
    }
}

impl From<String> for AmountSource {
    fn from(text: String) -> Self {
        AmountSource::Text(text)
    }
}

/// Outcome of reading a piece of text under a currency's grammar.
#[derive(Debug, Clone, PartialEq)]
enum Reading {
    Empty,
    LoneMinus,
    Number {
        display: String,
        value: f64,
        partial: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Amount Input
// ─────────────────────────────────────────────────────────────────────────────

/// Per-field amount input state machine.
#[derive(Debug, Clone)]
pub struct AmountInput {
    currency: CurrencyCode,
    allow_negative: bool,
    state: AmountInputState,
    phase: InputPhase,
    error: Option<ValidationError>,
}

impl AmountInput {
    pub fn new(currency: CurrencyCode) -> Self {
        Self {
            currency,
            allow_negative: false,
            state: AmountInputState {
                display: String::new(),
                value: 0.0,
            },
            phase: InputPhase::Empty,
            error: None,
        }
    }

    /// Accept a leading `-` in this field.
    pub fn allow_negative(mut self, allow: bool) -> Self {
        self.allow_negative = allow;
        self
    }

    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    pub fn state(&self) -> &AmountInputState {
        &self.state
    }

    pub fn display(&self) -> &str {
        &self.state.display
    }

    pub fn value(&self) -> f64 {
        self.state.value
    }

    pub fn phase(&self) -> InputPhase {
        self.phase
    }

    pub fn error(&self) -> Option<ValidationError> {
        self.error
    }

    pub fn is_transient(&self) -> bool {
        self.phase == InputPhase::Typing
    }

    /// Handles a new raw text value with the caret at `cursor` (in characters).
    pub fn on_change(&mut self, text: &str, cursor: usize) -> InputUpdate {
        let typed_len = text.chars().count();

        match read(text, self.currency, self.allow_negative) {
            Ok(reading) => {
                self.apply(reading);
                let new_len = self.state.display.chars().count() as isize;
                let shifted = cursor as isize + (new_len - typed_len as isize);
                InputUpdate {
                    display: self.state.display.clone(),
                    value: Some(self.state.value),
                    cursor: shifted.clamp(0, new_len) as usize,
                    error: None,
                }
            }
            Err(err) => {
                self.state.display = text.to_string();
                self.phase = InputPhase::Invalid;
                self.error = Some(err);
                InputUpdate {
                    display: self.state.display.clone(),
                    value: None,
                    cursor: cursor.min(typed_len),
                    error: Some(err),
                }
            }
        }
    }

    /// Commits the field when it loses focus and returns the committed value.
    pub fn on_blur(&mut self) -> f64 {
        match self.phase {
            InputPhase::Empty | InputPhase::Invalid => {}
            InputPhase::Typing if self.state.display == "-" => self.clear(),
            _ => {
                let value = round_to(self.state.value, self.currency.decimal_places());
                self.state.display = format_amount(value, self.currency);
                self.state.value = normalize_zero(value);
                self.phase = InputPhase::Committed;
            }
        }
        self.state.value
    }

    /// Assigns a value from outside the keystroke flow.
    ///
    /// Numbers are rounded to the currency precision; text goes through the
    /// same grammar as typed input. Rejected text leaves the field untouched.
    pub fn set_amount(&mut self, source: impl Into<AmountSource>) -> Result<f64, ValidationError> {
        match source.into() {
            AmountSource::Number(value) if value.is_finite() => {
                if value < 0.0 && !self.allow_negative {
                    return Err(ValidationError::NegativeNotAllowed);
                }
                let display = format_amount(value, self.currency);
                let value = parse_amount(&display, self.currency)?;
                self.state = AmountInputState { display, value };
                self.phase = InputPhase::Valid;
                self.error = None;
            }
            AmountSource::Number(_) => self.clear(),
            AmountSource::Text(text) => {
                let reading = read(&text, self.currency, self.allow_negative)?;
                self.apply(reading);
            }
        }
        Ok(self.state.value)
    }

    pub fn clear(&mut self) {
        self.state.display.clear();
        self.state.value = 0.0;
        self.phase = InputPhase::Empty;
        self.error = None;
    }

    fn apply(&mut self, reading: Reading) {
        self.error = None;
        match reading {
            Reading::Empty => {
                self.state.display.clear();
                self.state.value = 0.0;
                self.phase = InputPhase::Empty;
            }
            Reading::LoneMinus => {
                self.state.display = "-".to_string();
                self.state.value = 0.0;
                self.phase = InputPhase::Typing;
            }
            Reading::Number {
                display,
                value,
                partial,
            } => {
                self.state.display = display;
                self.state.value = value;
                self.phase = if partial {
                    InputPhase::Typing
                } else {
                    InputPhase::Valid
                };
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Free-standing format / parse
// ─────────────────────────────────────────────────────────────────────────────

/// Renders `value` the way an input field shows it: grouped digits, at most
/// the currency's fractional digits, trailing fractional zeros dropped, no
/// symbol. Non-finite values render as an empty string.
pub fn format_amount(value: f64, currency: CurrencyCode) -> String {
    if !value.is_finite() {
        return String::new();
    }

    let decimals = currency.decimal_places();
    let rounded = round_to(value, decimals);
    let fixed = format!("{:.*}", decimals as usize, rounded.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let locale = currency.locale();
    let mut out = String::new();
    if rounded < 0.0 && (whole != "0" || !fraction.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_digits(whole, locale.grouping_separator));
    if !fraction.is_empty() {
        out.push(locale.decimal_separator);
        out.push_str(fraction);
    }
    out
}

/// Parses display text back into a number. Empty text and a lone `-` read as
/// zero.
pub fn parse_amount(text: &str, currency: CurrencyCode) -> Result<f64, ValidationError> {
    match read(text, currency, true)? {
        Reading::Empty | Reading::LoneMinus => Ok(0.0),
        Reading::Number { value, .. } => Ok(value),
    }
}

fn read(text: &str, currency: CurrencyCode, allow_negative: bool) -> Result<Reading, ValidationError> {
    let locale = currency.locale();
    let zero_decimal = currency.is_zero_decimal();

    // Zero-decimal currencies have no fractional part, so every separator
    // character is punctuation. Otherwise only grouping separators are, and
    // the locale decimal separator is read as `.`.
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|&c| {
            if zero_decimal {
                c != locale.grouping_separator && c != locale.decimal_separator
            } else {
                c != locale.grouping_separator
            }
        })
        .map(|c| if c == locale.decimal_separator { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Ok(Reading::Empty);
    }

    let (negative, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };
    if negative && !allow_negative {
        return Err(ValidationError::NegativeNotAllowed);
    }
    if body.is_empty() {
        return Ok(Reading::LoneMinus);
    }

    let (whole, fraction) = match body.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (body, None),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if zero_decimal {
        if !all_digits(body) {
            return Err(ValidationError::DigitsOnly);
        }
    } else {
        if fraction.is_some_and(|f| f.contains('.')) {
            return Err(ValidationError::MultipleDecimalPoints);
        }
        if !all_digits(whole) || !fraction.is_none_or(all_digits) {
            return Err(ValidationError::InvalidCharacters);
        }
    }

    let whole = match whole.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    let sign = if negative { "-" } else { "" };

    let mut display = format!("{sign}{}", group_digits(whole, locale.grouping_separator));
    if let Some(fraction) = fraction {
        display.push(locale.decimal_separator);
        display.push_str(fraction);
    }

    let canonical = match fraction {
        Some(fraction) if !fraction.is_empty() => format!("{sign}{whole}.{fraction}"),
        _ => format!("{sign}{whole}"),
    };
    let value = canonical
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidCharacters)?;
    // Overlong digit strings parse to infinity rather than failing.
    if !value.is_finite() {
        return Err(ValidationError::TooLarge);
    }

    Ok(Reading::Number {
        display,
        value: normalize_zero(value),
        partial: fraction == Some(""),
    })
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}
