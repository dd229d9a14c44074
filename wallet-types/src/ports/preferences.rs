//! Preference store port.
//!
//! A small key-value store holding client-local state: session tokens, the UI
//! language and the display currency. Adapters: SQLite, in-memory.

use crate::domain::PreferenceKey;
use crate::error::StoreError;

#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync + 'static {
    /// Reads a value. Missing keys are `Ok(None)`.
    async fn get(&self, key: PreferenceKey) -> Result<Option<String>, StoreError>;

    /// Writes a value, replacing any previous one.
    async fn set(&self, key: PreferenceKey, value: &str) -> Result<(), StoreError>;

    /// Deletes a value. Deleting a missing key is not an error.
    async fn remove(&self, key: PreferenceKey) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<T: PreferenceStore> PreferenceStore for std::sync::Arc<T> {
    async fn get(&self, key: PreferenceKey) -> Result<Option<String>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: PreferenceKey, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: PreferenceKey) -> Result<(), StoreError> {
        (**self).remove(key).await
    }
}
