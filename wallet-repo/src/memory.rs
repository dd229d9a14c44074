//! In-memory preference store.

use async_trait::async_trait;
use dashmap::DashMap;

use wallet_types::{PreferenceKey, PreferenceStore, StoreError};

/// Process-local store; contents are lost on exit. Used by tests and by the
/// `memory://` store URL.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: DashMap<PreferenceKey, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn get(&self, key: PreferenceKey) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(&key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: PreferenceKey, value: &str) -> Result<(), StoreError> {
        self.values.insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: PreferenceKey) -> Result<(), StoreError> {
        self.values.remove(&key);
        Ok(())
    }
}
