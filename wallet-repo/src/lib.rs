//! # Wallet Repository
//!
//! Concrete preference store implementations (adapters) for the wallet
//! currency service. This crate provides adapters that implement the
//! `PreferenceStore` port.

use async_trait::async_trait;
use wallet_types::{PreferenceKey, PreferenceStore, StoreError};

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Unified store wrapper selected from a database URL.
pub enum Store {
    Memory(MemoryStore),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteStore),
}

/// Build and initialize a preference store from a database URL.
///
/// This function:
/// 1. Picks the adapter from the URL scheme
/// 2. Connects and runs migrations (SQLite)
/// 3. Returns a ready-to-use `Store`
///
/// # Examples
///
/// ```ignore
/// // Process-local, nothing persisted
/// let store = build_store("memory://").await?;
///
/// // SQLite (with `sqlite` feature)
/// let store = build_store("sqlite://wallet.db?mode=rwc").await?;
/// ```
pub async fn build_store(database_url: &str) -> anyhow::Result<Store> {
    if database_url.starts_with("memory:") {
        tracing::debug!("Using in-memory preference store");
        return Ok(Store::Memory(MemoryStore::new()));
    }

    #[cfg(feature = "sqlite")]
    {
        if database_url.starts_with("sqlite:") {
            return Ok(Store::Sqlite(SqliteStore::new(database_url).await?));
        }
    }

    anyhow::bail!("Unsupported preference store URL: {}", database_url)
}

// ─────────────────────────────────────────────────────────────────────────────
// Implement PreferenceStore for Store (delegation)
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl PreferenceStore for Store {
    async fn get(&self, key: PreferenceKey) -> Result<Option<String>, StoreError> {
        match self {
            Store::Memory(inner) => inner.get(key).await,
            #[cfg(feature = "sqlite")]
            Store::Sqlite(inner) => inner.get(key).await,
        }
    }

    async fn set(&self, key: PreferenceKey, value: &str) -> Result<(), StoreError> {
        match self {
            Store::Memory(inner) => inner.set(key, value).await,
            #[cfg(feature = "sqlite")]
            Store::Sqlite(inner) => inner.set(key, value).await,
        }
    }

    async fn remove(&self, key: PreferenceKey) -> Result<(), StoreError> {
        match self {
            Store::Memory(inner) => inner.remove(key).await,
            #[cfg(feature = "sqlite")]
            Store::Sqlite(inner) => inner.remove(key).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_memory_store() {
        let store = build_store("memory://").await.unwrap();
        assert!(matches!(store, Store::Memory(_)));
        store.set(PreferenceKey::Language, "en").await.unwrap();
        assert_eq!(
            store.get(PreferenceKey::Language).await.unwrap().as_deref(),
            Some("en")
        );
    }

    #[tokio::test]
    async fn test_build_store_rejects_unknown_scheme() {
        let err = build_store("postgres://localhost/wallet").await.err().unwrap();
        assert!(err.to_string().contains("Unsupported preference store URL"));
    }
}
