//! Technical indicator implementations.
//!
//! Every function here is pure and total over finite input: short series
//! degrade to a documented fallback instead of failing. `sma` is the one
//! exception and reports [`EngineError::InsufficientData`] on empty input.
//!
//! [`EngineError::InsufficientData`]: crate::error::EngineError::InsufficientData

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod trend;
pub mod volatility;

pub use bollinger::{bollinger_bands, bollinger_series, DEFAULT_BOLLINGER_PERIOD};
pub use ema::ema;
pub use macd::{macd, macd_latest};
pub use rsi::{rsi, rsi_series, DEFAULT_RSI_PERIOD, NEUTRAL_RSI};
pub use sma::sma;
pub use trend::{momentum, trend};
pub use volatility::{returns, std_dev, volatility};

use crate::types::{IndicatorBundle, IndicatorSummary};

/// Short EMA used for crossovers.
pub const EMA_SHORT_PERIOD: usize = 20;
/// Long EMA used for crossovers.
pub const EMA_LONG_PERIOD: usize = 50;

/// Compute every indicator series for `prices`, aligned by index.
pub fn compute_indicators(prices: &[f64]) -> IndicatorBundle {
    let bollinger = bollinger_series(prices, DEFAULT_BOLLINGER_PERIOD);
    let latest_band = bollinger_bands(prices, DEFAULT_BOLLINGER_PERIOD);

    IndicatorBundle {
        rsi: rsi_series(prices, DEFAULT_RSI_PERIOD),
        macd: macd(prices),
        bollinger,
        ema20: ema(prices, EMA_SHORT_PERIOD),
        ema50: ema(prices, EMA_LONG_PERIOD),
        latest: IndicatorSummary {
            rsi: rsi(prices, DEFAULT_RSI_PERIOD),
            macd: macd_latest(prices),
            bollinger: latest_band,
            band_width_pct: latest_band.width_pct(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_alignment() {
        let prices: Vec<f64> = (0..70).map(|i| 100.0 + (i as f64 * 0.4).sin() * 3.0).collect();
        let bundle = compute_indicators(&prices);

        assert_eq!(bundle.rsi.len(), prices.len());
        assert_eq!(bundle.macd.line.len(), prices.len());
        assert_eq!(bundle.bollinger.len(), prices.len());
        assert_eq!(bundle.ema20.len(), prices.len());
        assert_eq!(bundle.ema50.len(), prices.len());
        assert_eq!(bundle.latest.bollinger, *bundle.bollinger.last().unwrap());
    }

    #[test]
    fn test_bundle_empty_prices() {
        let bundle = compute_indicators(&[]);
        assert!(bundle.rsi.is_empty());
        assert_eq!(bundle.latest.rsi, NEUTRAL_RSI);
        assert_eq!(bundle.latest.bollinger.middle, 1.0);
        assert_eq!(bundle.latest.band_width_pct, 0.0);
    }
}
