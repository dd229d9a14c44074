//! Exchange rate cache with TTL support.

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use wallet_types::{CurrencyCode, ExchangeRate};

/// Default time a fetched rate stays fresh.
pub const DEFAULT_RATE_TTL: Duration = Duration::from_secs(60 * 60);

/// Cached rate entry.
#[derive(Debug, Clone)]
struct CacheEntry {
    rate: ExchangeRate,
    fetched_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Configuration for the rate cache.
#[derive(Debug, Clone)]
pub struct RateCacheConfig {
    /// How long a fetched rate is served without asking the source again.
    pub ttl: Duration,
}

impl Default for RateCacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_RATE_TTL,
        }
    }
}

/// Thread-safe rate cache keyed by `"<from>-<to>"`.
///
/// Expired entries are never removed eagerly; they are overwritten the next
/// time the pair is fetched. Concurrent misses each fetch and the last insert
/// wins.
#[derive(Debug, Default)]
pub struct RateCache {
    entries: DashMap<String, CacheEntry>,
    config: RateCacheConfig,
}

impl RateCache {
    pub fn new() -> Self {
        Self::with_config(RateCacheConfig::default())
    }

    pub fn with_config(config: RateCacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    fn key(from: CurrencyCode, to: CurrencyCode) -> String {
        format!("{}-{}", from.code(), to.code())
    }

    /// Returns the cached rate for the pair if it is still fresh.
    pub fn get(&self, from: CurrencyCode, to: CurrencyCode) -> Option<ExchangeRate> {
        let key = Self::key(from, to);
        match self.entries.get(&key) {
            Some(entry) if entry.is_fresh(self.config.ttl) => {
                debug!(pair = %key, "Cache hit");
                Some(entry.rate.clone())
            }
            Some(_) => {
                debug!(pair = %key, "Cache entry expired");
                None
            }
            None => {
                debug!(pair = %key, "Cache miss");
                None
            }
        }
    }

    /// Stores a freshly fetched rate, replacing any previous entry for the pair.
    pub fn insert(&self, rate: ExchangeRate) {
        let key = Self::key(rate.from, rate.to);
        self.entries.insert(
            key,
            CacheEntry {
                rate,
                fetched_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let total = self.entries.len();
        let fresh = self
            .entries
            .iter()
            .filter(|e| e.is_fresh(self.config.ttl))
            .count();

        CacheStats {
            total_entries: total,
            fresh_entries: fresh,
            expired_entries: total - fresh,
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
pub struct CacheStats {
    pub total_entries: usize,
    pub fresh_entries: usize,
    pub expired_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd_vnd(rate: f64) -> ExchangeRate {
        ExchangeRate::new(CurrencyCode::USD, CurrencyCode::VND, rate)
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_and_get() {
        let cache = RateCache::new();
        cache.insert(usd_vnd(25_000.0));

        let rate = cache.get(CurrencyCode::USD, CurrencyCode::VND).unwrap();
        assert_eq!(rate.rate, 25_000.0);
        assert!(cache.get(CurrencyCode::VND, CurrencyCode::USD).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = RateCache::with_config(RateCacheConfig {
            ttl: Duration::from_secs(10),
        });
        cache.insert(usd_vnd(25_000.0));

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(cache.get(CurrencyCode::USD, CurrencyCode::VND).is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get(CurrencyCode::USD, CurrencyCode::VND).is_none());

        // Stale entries stay until overwritten.
        assert_eq!(
            cache.stats(),
            CacheStats {
                total_entries: 1,
                fresh_entries: 0,
                expired_entries: 1,
            }
        );

        cache.insert(usd_vnd(26_000.0));
        assert_eq!(
            cache.get(CurrencyCode::USD, CurrencyCode::VND).unwrap().rate,
            26_000.0
        );
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear() {
        let cache = RateCache::new();
        cache.insert(usd_vnd(25_000.0));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_default_ttl_is_one_hour() {
        assert_eq!(RateCache::new().ttl(), Duration::from_secs(3600));
    }
}
