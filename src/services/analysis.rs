//! Per-ticker analysis: history lookup, indicators, signals and forecast.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, EngineError, Result};
use crate::services::cache::Cache;
use crate::services::forecast::Forecaster;
use crate::services::indicators::compute_indicators;
use crate::services::signals::SignalDetector;
use crate::sources::{PriceSource, SyntheticSource};
use crate::types::{
    AnalysisReport, ForecastResult, MarketStatus, PriceSeries, ServiceCacheStats, VolumeAnalysis,
};

const MAX_SYMBOL_LEN: usize = 15;

/// A value and whether it came from a cache.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: T,
    pub cached: bool,
}

/// Uppercase a ticker and reject anything that cannot be one.
pub fn normalize_symbol(symbol: &str) -> Result<String> {
    let symbol = symbol.trim().to_uppercase();
    let valid = !symbol.is_empty()
        && symbol.len() <= MAX_SYMBOL_LEN
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));

    if valid {
        Ok(symbol)
    } else {
        Err(AppError::BadRequest(format!("Invalid symbol: {:?}", symbol)))
    }
}

pub struct AnalysisService {
    source: Arc<dyn PriceSource>,
    fallback: Option<SyntheticSource>,
    forecaster: Forecaster,
    horizon: usize,
    detector: SignalDetector,
    history: Cache<PriceSeries>,
    reports: Cache<AnalysisReport>,
}

impl AnalysisService {
    pub fn new(config: &Config, source: Arc<dyn PriceSource>) -> Self {
        let forecaster = Forecaster::new(config.forecast.clone());
        let horizon = forecaster.config().horizon;

        Self {
            source,
            fallback: config.synthetic_fallback.then(SyntheticSource::new),
            forecaster,
            horizon,
            detector: SignalDetector::from_config(&config.signals),
            history: Cache::new(config.cache_ttl),
            reports: Cache::new(config.cache_ttl),
        }
    }

    /// Daily series for `symbol`, from cache or the upstream source.
    pub async fn history(&self, symbol: &str) -> Result<Fetched<PriceSeries>> {
        let key = normalize_symbol(symbol)?;

        if let Some(series) = self.history.get(&key) {
            return Ok(Fetched {
                value: series,
                cached: true,
            });
        }

        let series = match self.source.fetch_daily(&key).await {
            Ok(series) if !series.is_empty() => series,
            Ok(_) => self.fall_back(&key, AppError::NotFound(format!("No price data for {}", key)))?,
            Err(e) => self.fall_back(&key, e)?,
        };

        self.history.set(key, series.clone());
        Ok(Fetched {
            value: series,
            cached: false,
        })
    }

    fn fall_back(&self, symbol: &str, error: AppError) -> Result<PriceSeries> {
        match &self.fallback {
            Some(synthetic) => {
                warn!(
                    "{} source failed for {}: {}. Serving synthetic data",
                    self.source.name(),
                    symbol,
                    error
                );
                Ok(synthetic.generate(symbol))
            }
            None => Err(error),
        }
    }

    /// Full report for `symbol`. Reports are cached as a whole.
    pub async fn analyze(&self, symbol: &str) -> Result<Fetched<AnalysisReport>> {
        let key = normalize_symbol(symbol)?;

        if let Some(report) = self.reports.get(&key) {
            return Ok(Fetched {
                value: report,
                cached: true,
            });
        }

        let history = self.history(&key).await?.value;
        let current_price = history
            .last_close()
            .ok_or_else(|| AppError::NotFound(format!("No price data for {}", key)))?;
        let prices = history.closes();

        let indicators = compute_indicators(&prices);
        let signals = self.detector.detect_with(&prices, &indicators);
        let volume = history
            .volumes()
            .and_then(|volumes| VolumeAnalysis::from_volumes(&volumes));

        let (forecast, forecast_available) = self.run_forecast(prices).await?;

        let report = AnalysisReport {
            symbol: key.clone(),
            current_price,
            history,
            indicators,
            signals,
            forecast,
            forecast_available,
            volume,
            market: MarketStatus::now(),
            generated_at: chrono::Utc::now().timestamp_millis(),
        };

        info!(
            "Analyzed {}: {} prices, {} buy / {} sell signals, forecast {}",
            key,
            report.history.len(),
            report.signals.buy.len(),
            report.signals.sell.len(),
            if forecast_available { "ready" } else { "unavailable" }
        );

        self.reports.set(key, report.clone());
        Ok(Fetched {
            value: report,
            cached: false,
        })
    }

    /// Train and predict on the blocking pool.
    ///
    /// If this future is dropped mid-training the worker is told to stop.
    async fn run_forecast(&self, prices: Vec<f64>) -> Result<(ForecastResult, bool)> {
        let cancel = Arc::new(AtomicBool::new(false));
        let guard = CancelOnDrop::new(cancel.clone());
        let forecaster = self.forecaster.clone();
        let horizon = self.horizon;

        let (prices, result) = tokio::task::spawn_blocking(move || {
            let result = forecaster.forecast_with_cancel(&prices, horizon, &cancel);
            (prices, result)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Forecast task failed: {}", e)))?;
        guard.disarm();

        match result {
            Ok(forecast) => {
                let available = !forecast.is_identity();
                Ok((forecast, available))
            }
            Err(EngineError::ForecastUnavailable(reason)) => {
                warn!("Forecast unavailable, using identity: {}", reason);
                Ok((ForecastResult::identity(&prices), false))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn cache_stats(&self) -> ServiceCacheStats {
        ServiceCacheStats {
            history: self.history.stats(),
            reports: self.reports.stats(),
        }
    }

    pub fn clear_caches(&self) {
        self.history.clear();
        self.reports.clear();
        info!("Cleared history and report caches");
    }
}

/// Raises a cancel flag when dropped, unless disarmed first.
struct CancelOnDrop {
    flag: Arc<AtomicBool>,
    armed: bool,
}

impl CancelOnDrop {
    fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if self.armed {
            debug!("Request dropped during training, cancelling forecast");
            self.flag.store(true, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" aapl ").unwrap(), "AAPL");
        assert_eq!(normalize_symbol("brk.b").unwrap(), "BRK.B");
        assert_eq!(normalize_symbol("^gspc").unwrap(), "^GSPC");
    }

    #[test]
    fn test_normalize_symbol_rejects_garbage() {
        assert!(matches!(normalize_symbol(""), Err(AppError::BadRequest(_))));
        assert!(matches!(normalize_symbol("a b"), Err(AppError::BadRequest(_))));
        assert!(matches!(normalize_symbol("../etc"), Err(AppError::BadRequest(_))));
        assert!(normalize_symbol(&"A".repeat(16)).is_err());
    }

    #[test]
    fn test_cancel_on_drop() {
        let flag = Arc::new(AtomicBool::new(false));
        drop(CancelOnDrop::new(flag.clone()));
        assert!(flag.load(Ordering::Relaxed));
    }

    #[test]
    fn test_disarmed_guard_leaves_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        CancelOnDrop::new(flag.clone()).disarm();
        assert!(!flag.load(Ordering::Relaxed));
    }
}
