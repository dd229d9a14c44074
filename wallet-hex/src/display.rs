//! Display currency context.
//!
//! Amounts are stored in the base currency. Screens render them in the
//! currency the user picked, which is persisted in the preference store.
//! Conversion failures never surface here: the helpers log and fall back to
//! the unconverted amount.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use wallet_currency::format_currency;
use wallet_types::{
    CurrencyCode, ExchangeRateSource, Language, PreferenceKey, PreferenceStore, Session,
    StoreError,
};

use crate::CurrencyService;

/// Display currency, UI language and session tokens for one client.
pub struct DisplayCurrency<S: PreferenceStore, P: ExchangeRateSource> {
    service: Arc<CurrencyService<P>>,
    store: S,
    base: CurrencyCode,
    currency: RwLock<CurrencyCode>,
    language: RwLock<Language>,
}

impl<S: PreferenceStore, P: ExchangeRateSource> DisplayCurrency<S, P> {
    /// Loads the persisted preferences once. A missing or unreadable display
    /// currency falls back to `base`; a missing language to the default.
    pub async fn load(service: Arc<CurrencyService<P>>, store: S, base: CurrencyCode) -> Self {
        let currency = match store.get(PreferenceKey::DisplayCurrency).await {
            Ok(Some(value)) => value.parse::<CurrencyCode>().unwrap_or_else(|_| {
                warn!(value = %value, "Ignoring invalid stored display currency");
                base
            }),
            Ok(None) => base,
            Err(e) => {
                warn!(error = %e, "Failed to read display currency");
                base
            }
        };

        let language = match store.get(PreferenceKey::Language).await {
            Ok(Some(value)) => value.parse::<Language>().unwrap_or_else(|_| {
                warn!(value = %value, "Ignoring invalid stored language");
                Language::default()
            }),
            Ok(None) => Language::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read language");
                Language::default()
            }
        };

        debug!(%base, %currency, %language, "Display preferences loaded");
        Self {
            service,
            store,
            base,
            currency: RwLock::new(currency),
            language: RwLock::new(language),
        }
    }

    /// Currency every stored amount is denominated in.
    pub fn base(&self) -> CurrencyCode {
        self.base
    }

    pub fn service(&self) -> &CurrencyService<P> {
        &self.service
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Display Currency
    // ─────────────────────────────────────────────────────────────────────────────

    pub async fn currency(&self) -> CurrencyCode {
        *self.currency.read().await
    }

    /// Changes the display currency and persists it.
    pub async fn set_currency(&self, currency: CurrencyCode) -> Result<(), StoreError> {
        let mut current = self.currency.write().await;
        self.store
            .set(PreferenceKey::DisplayCurrency, currency.code())
            .await?;
        *current = currency;
        tracing::info!(%currency, "Display currency changed");
        Ok(())
    }

    /// Converts a base-currency amount into the display currency and formats it.
    ///
    /// Falls back to formatting the unconverted amount in the base currency
    /// when no rate is available. Returns `None` only if `cancel` fires first.
    pub async fn convert_and_format(
        &self,
        amount: f64,
        cancel: &CancellationToken,
    ) -> Option<String> {
        if cancel.is_cancelled() {
            return None;
        }
        let display_currency = self.currency().await;
        if display_currency == self.base {
            return Some(format_currency(amount, display_currency));
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Display conversion cancelled");
                return None;
            }
            result = self.service.get_rate_details(self.base, display_currency) => result,
        };

        Some(match result {
            Ok(rate) => format_currency(rate.apply(amount), display_currency),
            Err(e) => {
                warn!(error = %e, from = %self.base, to = %display_currency, "Conversion failed, showing base amount");
                format_currency(amount, self.base)
            }
        })
    }

    /// Converts an amount typed in the display currency back into the base
    /// currency. Falls back to the amount unchanged when no rate is available.
    pub async fn convert_from_display(
        &self,
        amount: f64,
        cancel: &CancellationToken,
    ) -> Option<f64> {
        if cancel.is_cancelled() {
            return None;
        }
        let display_currency = self.currency().await;
        if display_currency == self.base {
            return Some(amount);
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Display conversion cancelled");
                return None;
            }
            result = self.service.get_rate_details(display_currency, self.base) => result,
        };

        Some(match result {
            Ok(rate) => rate.apply(amount),
            Err(e) => {
                warn!(error = %e, from = %display_currency, to = %self.base, "Conversion failed, keeping amount");
                amount
            }
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Language
    // ─────────────────────────────────────────────────────────────────────────────

    pub async fn language(&self) -> Language {
        *self.language.read().await
    }

    pub async fn set_language(&self, language: Language) -> Result<(), StoreError> {
        let mut current = self.language.write().await;
        self.store
            .set(PreferenceKey::Language, language.code())
            .await?;
        *current = language;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────────

    /// Stored tokens, if both are present.
    pub async fn session(&self) -> Result<Option<Session>, StoreError> {
        let access = self.store.get(PreferenceKey::AccessToken).await?;
        let refresh = self.store.get(PreferenceKey::RefreshToken).await?;
        Ok(match (access, refresh) {
            (Some(access_token), Some(refresh_token)) => Some(Session {
                access_token,
                refresh_token,
            }),
            _ => None,
        })
    }

    pub async fn set_session(&self, session: &Session) -> Result<(), StoreError> {
        self.store
            .set(PreferenceKey::AccessToken, &session.access_token)
            .await?;
        self.store
            .set(PreferenceKey::RefreshToken, &session.refresh_token)
            .await
    }

    pub async fn clear_session(&self) -> Result<(), StoreError> {
        self.store.remove(PreferenceKey::AccessToken).await?;
        self.store.remove(PreferenceKey::RefreshToken).await
    }
}
