//! Client-local preferences.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Keys of the client-local key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    AccessToken,
    RefreshToken,
    Language,
    DisplayCurrency,
}

impl PreferenceKey {
    pub const ACCESS_TOKEN: &'static str = "access_token";
    pub const REFRESH_TOKEN: &'static str = "refresh_token";
    pub const LANGUAGE: &'static str = "language";
    pub const DISPLAY_CURRENCY: &'static str = "display_currency";

    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::AccessToken => Self::ACCESS_TOKEN,
            PreferenceKey::RefreshToken => Self::REFRESH_TOKEN,
            PreferenceKey::Language => Self::LANGUAGE,
            PreferenceKey::DisplayCurrency => Self::DISPLAY_CURRENCY,
        }
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Vi,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Vi => "vi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "vi" => Ok(Language::Vi),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

/// Tokens issued by the bookkeeping backend, kept alongside the preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
}
