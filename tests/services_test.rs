//! Tests for the result cache and the analysis service

use std::sync::Arc;
use std::time::Duration;

use augur::config::{Config, ForecastConfig};
use augur::services::{AnalysisService, Cache};
use augur::sources::SyntheticSource;

#[test]
fn test_cache_set_then_get() {
    let cache: Cache<Vec<f64>> = Cache::new(Duration::from_secs(60));
    cache.set("AAPL", vec![1.0, 2.0]);
    assert_eq!(cache.get("AAPL"), Some(vec![1.0, 2.0]));
}

#[test]
fn test_cache_expiry_evicts_entry() {
    let cache: Cache<String> = Cache::new(Duration::from_millis(10));
    cache.set("key", "value".to_string());
    std::thread::sleep(Duration::from_millis(20));

    assert_eq!(cache.get("key"), None);
    assert_eq!(cache.stats().size, 0);
}

#[test]
fn test_cache_sets_counted_once_per_call() {
    let cache: Cache<u32> = Cache::new(Duration::from_secs(60));
    for i in 0..3 {
        cache.set("key", i);
        assert_eq!(cache.stats().sets, i as u64 + 1);
    }
    assert_eq!(cache.stats().size, 1);
}

#[test]
fn test_cache_hit_rate_without_lookups() {
    let cache: Cache<u32> = Cache::new(Duration::from_secs(60));
    assert_eq!(cache.stats().hit_rate, 0.0);
}

fn service() -> AnalysisService {
    let config = Config {
        forecast: ForecastConfig {
            hidden_units: vec![8],
            epochs: 3,
            seed: Some(11),
            ..ForecastConfig::default()
        },
        ..Config::default()
    };
    AnalysisService::new(&config, Arc::new(SyntheticSource::new().with_seed(5)))
}

#[tokio::test]
async fn test_analyze_uses_report_cache() {
    let service = service();

    let first = service.analyze("qqq").await.unwrap();
    assert!(!first.cached);
    assert_eq!(first.value.symbol, "QQQ");
    assert_eq!(first.value.forecast.history_len, first.value.history.len());

    let second = service.analyze("QQQ").await.unwrap();
    assert!(second.cached);
    assert_eq!(second.value, first.value);

    let stats = service.cache_stats();
    assert_eq!(stats.reports.hits, 1);
    assert_eq!(stats.reports.sets, 1);
    assert_eq!(stats.history.sets, 1);
}

#[tokio::test]
async fn test_clear_caches() {
    let service = service();
    service.history("iwm").await.unwrap();
    assert_eq!(service.cache_stats().history.size, 1);

    service.clear_caches();
    assert_eq!(service.cache_stats().history.size, 0);
    assert!(!service.history("iwm").await.unwrap().cached);
}

#[tokio::test]
async fn test_concurrent_analyses() {
    let service = Arc::new(service());
    let handles: Vec<_> = ["AAA", "BBB", "CCC"]
        .into_iter()
        .map(|symbol| {
            let service = service.clone();
            tokio::spawn(async move { service.analyze(symbol).await.map(|r| r.value.symbol) })
        })
        .collect();

    for handle in handles {
        let symbol = handle.await.unwrap().unwrap();
        assert_eq!(symbol.len(), 3);
    }
    assert_eq!(service.cache_stats().reports.size, 3);
}
