//! CurrencyService and DisplayCurrency unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    use wallet_repo::MemoryStore;
    use wallet_types::{
        ConversionRequest, CurrencyCode, CurrencyError, ExchangeRateSource, Language,
        PreferenceKey, PreferenceStore, RateTable, Session,
    };

    use crate::cache::RateCacheConfig;
    use crate::{CurrencyService, DisplayCurrency};

    /// In-process rate source that counts fetches.
    pub struct MockSource {
        tables: HashMap<CurrencyCode, RateTable>,
        calls: AtomicUsize,
        offline: AtomicBool,
        latency: Option<Duration>,
    }

    impl MockSource {
        pub fn new() -> Self {
            let mut tables = HashMap::new();
            tables.insert(
                CurrencyCode::USD,
                RateTable::from([(CurrencyCode::VND, 25_000.0)]),
            );
            tables.insert(
                CurrencyCode::VND,
                RateTable::from([(CurrencyCode::USD, 0.00004)]),
            );
            Self {
                tables,
                calls: AtomicUsize::new(0),
                offline: AtomicBool::new(false),
                latency: None,
            }
        }

        pub fn offline() -> Self {
            let source = Self::new();
            source.offline.store(true, Ordering::SeqCst);
            source
        }

        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = Some(latency);
            self
        }

        pub fn with_table(mut self, base: CurrencyCode, table: RateTable) -> Self {
            self.tables.insert(base, table);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExchangeRateSource for MockSource {
        async fn get_exchange_rates(&self, base: CurrencyCode) -> Result<RateTable, CurrencyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            if self.offline.load(Ordering::SeqCst) {
                return Err(CurrencyError::ServiceUnavailable("offline".into()));
            }
            Ok(self.tables.get(&base).cloned().unwrap_or_default())
        }
    }

    fn request(amount: f64, from: &str, to: &str) -> ConversionRequest {
        ConversionRequest {
            amount,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // CurrencyService
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_convert_usd_to_vnd() {
        let service = CurrencyService::new(MockSource::new());

        let conversion = service
            .convert_currency(request(100.0, "usd", "vnd"))
            .await
            .unwrap();

        assert_eq!(conversion.converted_amount, 2_500_000.0);
        assert_eq!(conversion.exchange_rate, 25_000.0);
        assert_eq!(conversion.from_currency, CurrencyCode::USD);
        assert_eq!(conversion.to_currency, CurrencyCode::VND);
    }

    #[tokio::test]
    async fn test_convert_rounds_to_target_precision() {
        let source = MockSource::new()
            .with_table(CurrencyCode::USD, RateTable::from([(CurrencyCode::VND, 25_432.7)]))
            .with_table(CurrencyCode::VND, RateTable::from([(CurrencyCode::USD, 0.0000393)]));
        let service = CurrencyService::new(source);

        let to_vnd = service
            .convert_currency(request(1.5, "USD", "VND"))
            .await
            .unwrap();
        assert_eq!(to_vnd.converted_amount, 38_149.0);

        let to_usd = service
            .convert_currency(request(1_000_000.0, "vnd", "usd"))
            .await
            .unwrap();
        assert_eq!(to_usd.converted_amount, 39.3);
    }

    #[tokio::test]
    async fn test_same_currency_never_fetches() {
        let service = CurrencyService::new(MockSource::new());

        let conversion = service
            .convert_currency(request(42.5, "usd", "usd"))
            .await
            .unwrap();
        let rate = service
            .get_exchange_rate(CurrencyCode::VND, CurrencyCode::VND)
            .await
            .unwrap();

        assert_eq!(conversion.converted_amount, 42.5);
        assert_eq!(conversion.exchange_rate, 1.0);
        assert_eq!(rate, 1.0);
        assert_eq!(service.source().calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_amount_rejected_before_fetch() {
        let service = CurrencyService::new(MockSource::new());

        let negative = service.convert_currency(request(-1.0, "usd", "vnd")).await;
        let nan = service.convert_currency(request(f64::NAN, "usd", "vnd")).await;
        let infinite = service
            .convert_currency(request(f64::INFINITY, "usd", "vnd"))
            .await;

        assert!(matches!(negative, Err(CurrencyError::InvalidAmount(_))));
        assert!(matches!(nan, Err(CurrencyError::InvalidAmount(_))));
        assert!(matches!(infinite, Err(CurrencyError::InvalidAmount(_))));
        assert_eq!(service.source().calls(), 0);
    }

    #[tokio::test]
    async fn test_zero_amount_is_valid() {
        let service = CurrencyService::new(MockSource::new());

        let conversion = service
            .convert_currency(request(0.0, "usd", "vnd"))
            .await
            .unwrap();

        assert_eq!(conversion.converted_amount, 0.0);
    }

    #[tokio::test]
    async fn test_unsupported_currency_rejected_before_fetch() {
        let service = CurrencyService::new(MockSource::new());

        let result = service.convert_currency(request(10.0, "eur", "vnd")).await;

        assert_eq!(result, Err(CurrencyError::UnsupportedCurrency("eur".into())));
        assert_eq!(service.source().calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_rate_is_not_cached() {
        let source = MockSource::new().with_table(CurrencyCode::USD, RateTable::new());
        let service = CurrencyService::new(source);

        let result = service
            .get_exchange_rate_with_cache(CurrencyCode::USD, CurrencyCode::VND)
            .await;

        assert_eq!(
            result,
            Err(CurrencyError::RateNotFound {
                from: CurrencyCode::USD,
                to: CurrencyCode::VND,
            })
        );
        assert_eq!(service.cache_stats().total_entries, 0);
    }

    #[tokio::test]
    async fn test_source_failure_propagates() {
        let service = CurrencyService::new(MockSource::offline());

        let result = service.convert_currency(request(1.0, "usd", "vnd")).await;

        assert!(matches!(result, Err(CurrencyError::ServiceUnavailable(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_rate_reused_within_ttl() {
        let service = CurrencyService::new(MockSource::new());

        for _ in 0..3 {
            let rate = service
                .get_exchange_rate_with_cache(CurrencyCode::USD, CurrencyCode::VND)
                .await
                .unwrap();
            assert_eq!(rate, 25_000.0);
        }
        assert_eq!(service.source().calls(), 1);

        tokio::time::advance(Duration::from_secs(59 * 60)).await;
        service
            .convert_currency(request(1.0, "usd", "vnd"))
            .await
            .unwrap();
        assert_eq!(service.source().calls(), 1);

        tokio::time::advance(Duration::from_secs(60)).await;
        service
            .get_exchange_rate_with_cache(CurrencyCode::USD, CurrencyCode::VND)
            .await
            .unwrap();
        assert_eq!(service.source().calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_ttl() {
        let service = CurrencyService::with_cache_config(
            MockSource::new(),
            RateCacheConfig {
                ttl: Duration::from_secs(5),
            },
        );

        service
            .get_exchange_rate_with_cache(CurrencyCode::USD, CurrencyCode::VND)
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(5)).await;
        service
            .get_exchange_rate_with_cache(CurrencyCode::USD, CurrencyCode::VND)
            .await
            .unwrap();

        assert_eq!(service.source().calls(), 2);
    }

    #[tokio::test]
    async fn test_pairs_are_cached_independently() {
        let service = CurrencyService::new(MockSource::new());

        service
            .get_exchange_rate_with_cache(CurrencyCode::USD, CurrencyCode::VND)
            .await
            .unwrap();
        service
            .get_exchange_rate_with_cache(CurrencyCode::VND, CurrencyCode::USD)
            .await
            .unwrap();

        assert_eq!(service.source().calls(), 2);
        assert_eq!(service.cache_stats().fresh_entries, 2);
    }

    #[tokio::test]
    async fn test_uncached_lookup_always_fetches() {
        let service = CurrencyService::new(MockSource::new());

        service
            .get_exchange_rate(CurrencyCode::USD, CurrencyCode::VND)
            .await
            .unwrap();
        service
            .get_exchange_rate(CurrencyCode::USD, CurrencyCode::VND)
            .await
            .unwrap();

        assert_eq!(service.source().calls(), 2);
        assert!(service.cache_stats().total_entries == 0);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let service = CurrencyService::new(MockSource::new());

        service
            .get_exchange_rate_with_cache(CurrencyCode::USD, CurrencyCode::VND)
            .await
            .unwrap();
        service.clear_cache();
        service
            .get_exchange_rate_with_cache(CurrencyCode::USD, CurrencyCode::VND)
            .await
            .unwrap();

        assert_eq!(service.source().calls(), 2);
    }

    #[tokio::test]
    async fn test_rate_details_and_table() {
        let service = CurrencyService::new(MockSource::new());

        let details = service
            .get_rate_details(CurrencyCode::USD, CurrencyCode::VND)
            .await
            .unwrap();
        let table = service.get_rate_table(CurrencyCode::USD).await.unwrap();

        assert_eq!(details.rate, 25_000.0);
        assert_eq!(table.get(&CurrencyCode::VND), Some(&25_000.0));
        assert_eq!(service.supported_currencies().len(), 2);
        assert_eq!(
            service.format_currency(1_000_000.0, CurrencyCode::VND),
            "1.000.000₫"
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // DisplayCurrency
    // ─────────────────────────────────────────────────────────────────────────

    async fn display_with(
        source: MockSource,
    ) -> DisplayCurrency<Arc<MemoryStore>, MockSource> {
        display_on(source, Arc::new(MemoryStore::new())).await
    }

    async fn display_on(
        source: MockSource,
        store: Arc<MemoryStore>,
    ) -> DisplayCurrency<Arc<MemoryStore>, MockSource> {
        DisplayCurrency::load(
            Arc::new(CurrencyService::new(source)),
            store,
            CurrencyCode::VND,
        )
        .await
    }

    #[tokio::test]
    async fn test_display_defaults_to_base_without_fetch() {
        let display = display_with(MockSource::new()).await;
        let token = CancellationToken::new();

        assert_eq!(display.currency().await, CurrencyCode::VND);
        assert_eq!(
            display.convert_and_format(1_000_000.0, &token).await.as_deref(),
            Some("1.000.000₫")
        );
        assert_eq!(display.convert_from_display(5_000.0, &token).await, Some(5_000.0));
        assert_eq!(display.service().source().calls(), 0);
    }

    #[tokio::test]
    async fn test_display_converts_into_selected_currency() {
        let store = Arc::new(MemoryStore::new());
        let display = display_on(MockSource::new(), store.clone()).await;
        let token = CancellationToken::new();

        display.set_currency(CurrencyCode::USD).await.unwrap();

        assert_eq!(
            display.convert_and_format(2_500_000.0, &token).await.as_deref(),
            Some("$100.00")
        );
        assert_eq!(
            display.convert_from_display(100.0, &token).await,
            Some(2_500_000.0)
        );
        assert_eq!(
            store.get(PreferenceKey::DisplayCurrency).await.unwrap().as_deref(),
            Some("usd")
        );
    }

    #[tokio::test]
    async fn test_display_falls_back_when_offline() {
        let display = display_with(MockSource::offline()).await;
        let token = CancellationToken::new();
        display.set_currency(CurrencyCode::USD).await.unwrap();

        assert_eq!(
            display.convert_and_format(1_000_000.0, &token).await.as_deref(),
            Some("1.000.000₫")
        );
        assert_eq!(display.convert_from_display(12.5, &token).await, Some(12.5));
    }

    #[tokio::test]
    async fn test_display_loads_persisted_currency() {
        let store = Arc::new(MemoryStore::new());
        store.set(PreferenceKey::DisplayCurrency, "usd").await.unwrap();
        store.set(PreferenceKey::Language, "en").await.unwrap();

        let display = display_on(MockSource::new(), store).await;

        assert_eq!(display.currency().await, CurrencyCode::USD);
        assert_eq!(display.language().await, Language::En);
    }

    #[tokio::test]
    async fn test_display_ignores_invalid_persisted_values() {
        let store = Arc::new(MemoryStore::new());
        store.set(PreferenceKey::DisplayCurrency, "doubloons").await.unwrap();
        store.set(PreferenceKey::Language, "klingon").await.unwrap();

        let display = display_on(MockSource::new(), store).await;

        assert_eq!(display.currency().await, CurrencyCode::VND);
        assert_eq!(display.language().await, Language::Vi);
    }

    #[tokio::test]
    async fn test_display_cancelled_before_start() {
        let display = display_with(MockSource::new()).await;
        display.set_currency(CurrencyCode::USD).await.unwrap();
        let token = CancellationToken::new();
        token.cancel();

        assert_eq!(display.convert_and_format(1.0, &token).await, None);
        assert_eq!(display.convert_from_display(1.0, &token).await, None);
        assert_eq!(display.service().source().calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_display_cancelled_mid_fetch() {
        let source = MockSource::new().with_latency(Duration::from_secs(5));
        let display = display_with(source).await;
        display.set_currency(CurrencyCode::USD).await.unwrap();
        let token = CancellationToken::new();

        let (formatted, _) = tokio::join!(display.convert_and_format(1_000.0, &token), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            token.cancel();
        });

        assert_eq!(formatted, None);
        assert_eq!(display.service().cache_stats().total_entries, 0);
    }

    #[tokio::test]
    async fn test_language_round_trip() {
        let store = Arc::new(MemoryStore::new());
        let display = display_on(MockSource::new(), store.clone()).await;

        assert_eq!(display.language().await, Language::Vi);
        display.set_language(Language::En).await.unwrap();

        assert_eq!(display.language().await, Language::En);
        assert_eq!(
            store.get(PreferenceKey::Language).await.unwrap().as_deref(),
            Some("en")
        );
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let display = display_with(MockSource::new()).await;
        let session = Session {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
        };

        assert_eq!(display.session().await.unwrap(), None);
        display.set_session(&session).await.unwrap();
        assert_eq!(display.session().await.unwrap(), Some(session));
        display.clear_session().await.unwrap();
        assert_eq!(display.session().await.unwrap(), None);
    }
}
