// tests/currency_converter_tests.rs

use backoffice_hooks::currency::{CurrencyConverter, CurrencySettings, DisplayAmounts, RateSource};
use backoffice_hooks::errors::StoreError;
use backoffice_hooks::store::{ExchangeRateStore, MemoryExchangeRateStore};
use backoffice_hooks::types::ExchangeRate;
use chrono::{Duration, Utc};
use std::sync::Arc;

fn usd_ugx(rate: f64, minutes_ago: i64) -> ExchangeRate {
    ExchangeRate {
        base_code: "USD".to_string(),
        quote_code: "UGX".to_string(),
        rate,
        fetched_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

fn converter_with(rows: Vec<ExchangeRate>) -> (CurrencyConverter<MemoryExchangeRateStore>, Arc<MemoryExchangeRateStore>) {
    let store = Arc::new(MemoryExchangeRateStore::new());
    for row in rows {
        store.record(row);
    }
    (CurrencyConverter::new(store.clone(), CurrencySettings::default()), store)
}

#[tokio::test]
async fn test_zero_amount() {
    let (converter, _) = converter_with(vec![usd_ugx(3578.5, 1)]);
    assert_eq!(
        converter.for_base(0.0).await,
        DisplayAmounts {
            base: 0.0,
            secondary: 0.0
        }
    );
}

#[tokio::test]
async fn test_stored_rate_is_inverted() {
    let (converter, _) = converter_with(vec![usd_ugx(3578.5, 1)]);
    let amounts = converter.for_base(3578.5).await;
    assert_eq!(amounts.base, 3578.5);
    assert_eq!(amounts.secondary, 1.00);

    let rate = converter.resolved_rate().await;
    assert!(matches!(rate.source, RateSource::Stored { .. }));
    assert!((rate.rate - 1.0 / 3578.5).abs() < 1e-12);
}

#[tokio::test]
async fn test_newest_row_wins() {
    let (converter, _) = converter_with(vec![
        usd_ugx(1000.0, 600),
        usd_ugx(3578.5, 2),
        usd_ugx(2000.0, 30),
    ]);
    assert_eq!(converter.for_base(3578.5).await.secondary, 1.00);
}

#[tokio::test]
async fn test_fallback_without_row_is_close_to_stored() {
    let (stored, _) = converter_with(vec![usd_ugx(3578.5, 1)]);
    let (fallback, _) = converter_with(Vec::new());

    let with_row = stored.for_base(3578.5).await.secondary;
    let without_row = fallback.for_base(3578.5).await.secondary;

    assert_eq!(fallback.resolved_rate().await.source, RateSource::Fallback);
    assert!((with_row - without_row).abs() <= 0.01, "{} vs {}", with_row, without_row);
}

#[tokio::test]
async fn test_non_positive_rate_uses_fallback() {
    for bad in [0.0, -3578.5, f64::NAN] {
        let (converter, _) = converter_with(vec![usd_ugx(bad, 1)]);
        let rate = converter.resolved_rate().await;
        assert_eq!(rate.source, RateSource::Fallback);
        assert_eq!(rate.rate, CurrencySettings::default().fallback_rate);
    }
}

#[tokio::test]
async fn test_negative_amount_passes_through() {
    let (converter, _) = converter_with(vec![usd_ugx(3578.5, 1)]);
    let amounts = converter.for_base(-7157.0).await;
    assert_eq!(amounts.base, -7157.0);
    assert_eq!(amounts.secondary, -2.00);
}

#[tokio::test]
async fn test_rate_is_queried_once_per_converter() {
    let (converter, store) = converter_with(vec![usd_ugx(3578.5, 1)]);

    for amount in [1_000.0, 25_000.0, 3578.5, 0.0, 99_999.0] {
        converter.for_base(amount).await;
    }
    converter.resolved_rate().await;
    assert_eq!(store.lookups(), 1);

    // A new context resolves again.
    let next = CurrencyConverter::new(store.clone(), CurrencySettings::default());
    next.for_base(500.0).await;
    assert_eq!(store.lookups(), 2);
}

#[tokio::test]
async fn test_cached_rate_survives_new_rows_within_context() {
    let (converter, store) = converter_with(vec![usd_ugx(3578.5, 10)]);
    assert_eq!(converter.for_base(3578.5).await.secondary, 1.00);

    store.record(usd_ugx(1789.25, 0));
    assert_eq!(converter.for_base(3578.5).await.secondary, 1.00);

    let fresh = CurrencyConverter::new(store.clone(), CurrencySettings::default());
    assert_eq!(fresh.for_base(3578.5).await.secondary, 2.00);
}

struct BrokenStore;

impl ExchangeRateStore for BrokenStore {
    async fn latest(&self, _base_code: &str, _quote_code: &str) -> Result<Option<ExchangeRate>, StoreError> {
        let err = serde_json::from_str::<ExchangeRate>("not json").unwrap_err();
        Err(StoreError::Serialization(err))
    }
}

#[tokio::test]
async fn test_store_error_uses_fallback() {
    let converter = CurrencyConverter::new(Arc::new(BrokenStore), CurrencySettings::default());
    let amounts = converter.for_base(10_000.0).await;
    assert_eq!(amounts.secondary, 2.80);
    assert_eq!(converter.resolved_rate().await.source, RateSource::Fallback);
}
