//! Buy/sell signal detection from indicator crossovers.
//!
//! A buy fires at index `i` when either
//! - RSI is oversold (< 30) and price crosses back above the lower Bollinger band, or
//! - EMA20 crosses above EMA50 while the MACD line crosses above its signal.
//!
//! Sells mirror both rules: overbought RSI (> 70) with price dropping back
//! under the upper band, or EMA20 and MACD crossing down together. A cross
//! means the relation is false at `i - 1` and true at `i`.

use tracing::debug;

use crate::config::SignalConfig;
use crate::services::indicators::compute_indicators;
use crate::types::{IndicatorBundle, SignalSet};

/// Series shorter than this produce no signals.
pub const MIN_SIGNAL_HISTORY: usize = 30;

/// First index scanned, so EMA50 has warmed up.
pub const SCAN_START: usize = 50;

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalDetector {
    max_signals: usize,
}

impl Default for SignalDetector {
    fn default() -> Self {
        Self::from_config(&SignalConfig::default())
    }
}

impl SignalDetector {
    pub fn new(max_signals: usize) -> Self {
        Self { max_signals }
    }

    pub fn from_config(config: &SignalConfig) -> Self {
        Self::new(config.max_signals)
    }

    /// Compute indicators for `prices` and scan them.
    pub fn detect(&self, prices: &[f64]) -> SignalSet {
        if prices.len() < MIN_SIGNAL_HISTORY {
            return SignalSet::default();
        }
        self.detect_with(prices, &compute_indicators(prices))
    }

    /// Scan indicators that were already computed for `prices`.
    pub fn detect_with(&self, prices: &[f64], indicators: &IndicatorBundle) -> SignalSet {
        if prices.len() < MIN_SIGNAL_HISTORY {
            return SignalSet::default();
        }

        let scan = Scan { prices, indicators };
        let mut buy = Vec::new();
        let mut sell = Vec::new();

        for i in SCAN_START..prices.len() {
            if scan.is_buy(i) {
                buy.push(i);
            }
            if scan.is_sell(i) {
                sell.push(i);
            }
        }

        debug!(
            "Detected {} buy and {} sell signals over {} prices",
            buy.len(),
            sell.len(),
            prices.len()
        );

        SignalSet {
            buy: thin_signals(&buy, self.max_signals),
            sell: thin_signals(&sell, self.max_signals),
        }
    }
}

/// Detect signals with the default marker limit.
pub fn detect_signals(prices: &[f64]) -> SignalSet {
    SignalDetector::default().detect(prices)
}

/// Keep at most `max` evenly spaced entries.
///
/// With more than `max` entries, takes positions `0, step, 2 * step, ...`
/// where `step = len / max`.
pub fn thin_signals(indices: &[usize], max: usize) -> Vec<usize> {
    if max == 0 {
        return Vec::new();
    }
    if indices.len() <= max {
        return indices.to_vec();
    }

    let step = indices.len() / max;
    indices.iter().step_by(step).take(max).copied().collect()
}

struct Scan<'a> {
    prices: &'a [f64],
    indicators: &'a IndicatorBundle,
}

impl Scan<'_> {
    fn above_lower_band(&self, i: usize) -> bool {
        self.prices[i] >= self.indicators.bollinger[i].lower
    }

    fn below_upper_band(&self, i: usize) -> bool {
        self.prices[i] <= self.indicators.bollinger[i].upper
    }

    fn ema_bullish(&self, i: usize) -> bool {
        self.indicators.ema20[i] > self.indicators.ema50[i]
    }

    fn macd_bullish(&self, i: usize) -> bool {
        self.indicators.macd.line[i] > self.indicators.macd.signal[i]
    }

    fn is_buy(&self, i: usize) -> bool {
        let rsi = self.indicators.rsi[i];
        let oversold_bounce = rsi < RSI_OVERSOLD
            && crossed(self.above_lower_band(i - 1), self.above_lower_band(i));
        let golden_cross = crossed(self.ema_bullish(i - 1), self.ema_bullish(i))
            && crossed(self.macd_bullish(i - 1), self.macd_bullish(i));
        oversold_bounce || golden_cross
    }

    fn is_sell(&self, i: usize) -> bool {
        let rsi = self.indicators.rsi[i];
        let overbought_reversal = rsi > RSI_OVERBOUGHT
            && crossed(self.below_upper_band(i - 1), self.below_upper_band(i));
        let death_cross = crossed(!self.ema_bullish(i - 1), !self.ema_bullish(i))
            && crossed(!self.macd_bullish(i - 1), !self.macd_bullish(i));
        overbought_reversal || death_cross
    }
}

/// False at the previous index, true at the current one.
fn crossed(prev: bool, now: bool) -> bool {
    !prev && now
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flat, then a steep slide that slows on its last day.
    fn oversold_bounce() -> Vec<f64> {
        let mut prices = vec![100.0; 40];
        prices.extend([97.0, 94.0, 91.0, 88.0, 85.0, 82.0, 79.0, 76.0, 73.0, 70.0, 69.5]);
        prices
    }

    #[test]
    fn test_short_series_has_no_signals() {
        let prices: Vec<f64> = (0..29).map(|i| 100.0 - i as f64).collect();
        assert!(detect_signals(&prices).is_empty());
        assert!(detect_signals(&[]).is_empty());
    }

    #[test]
    fn test_flat_series_has_no_signals() {
        assert!(detect_signals(&[100.0; 120]).is_empty());
    }

    #[test]
    fn test_oversold_bounce_is_buy() {
        let mut prices = vec![100.0; 20];
        prices.extend(oversold_bounce());
        let signals = detect_signals(&prices);
        assert_eq!(signals.buy, vec![prices.len() - 1]);
        assert!(signals.sell.is_empty());
    }

    #[test]
    fn test_rally_gives_golden_cross_then_reversal() {
        let mut prices = vec![100.0; 60];
        prices.extend([103.0, 106.0, 109.0, 112.0, 115.0, 118.0, 121.0, 124.0, 127.0, 130.0, 130.5]);
        let signals = detect_signals(&prices);

        // First up-move: EMA20 and MACD both turn bullish from a flat line
        assert_eq!(signals.buy, vec![60]);
        // Rally stalls and price slips back under the upper band
        assert_eq!(signals.sell, vec![70]);
    }

    #[test]
    fn test_signals_are_thinned() {
        let prices: Vec<f64> = (0..8).flat_map(|_| oversold_bounce()).collect();
        let all = SignalDetector::new(usize::MAX).detect(&prices);
        assert_eq!(all.buy, vec![50, 101, 152, 203, 254, 305, 356, 407]);

        let thinned = detect_signals(&prices);
        assert_eq!(thinned.buy, vec![50, 101, 152, 203, 254]);
    }

    #[test]
    fn test_indices_inside_scan_range() {
        let prices: Vec<f64> = (0..200)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 8.0 + (i as f64 * 1.7).cos() * 3.0)
            .collect();
        let signals = detect_signals(&prices);
        for &i in signals.buy.iter().chain(&signals.sell) {
            assert!((SCAN_START..prices.len()).contains(&i));
        }
        assert!(signals.buy.len() <= 5);
        assert!(signals.sell.len() <= 5);
        assert!(signals.buy.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_thin_twelve_to_five() {
        let indices: Vec<usize> = (0..12).map(|i| 60 + i * 3).collect();
        let thinned = thin_signals(&indices, 5);

        assert_eq!(thinned.len(), 5);
        assert!(thinned.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(thinned, vec![60, 66, 72, 78, 84]);
    }

    #[test]
    fn test_thin_passthrough_and_zero() {
        assert_eq!(thin_signals(&[1, 2, 3], 5), vec![1, 2, 3]);
        assert!(thin_signals(&[1, 2, 3], 0).is_empty());
        assert_eq!(thin_signals(&[1, 2, 3, 4, 5], 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_crossed() {
        assert!(crossed(false, true));
        assert!(!crossed(true, true));
        assert!(!crossed(false, false));
        assert!(!crossed(true, false));
    }
}
