//! MACD (Moving Average Convergence Divergence).
//!
//! - MACD line = EMA(12) - EMA(26)
//! - Signal line = EMA(9) of the MACD line
//! - Histogram = MACD line - signal line

use super::ema::ema;
use crate::types::{MacdSeries, MacdValue};

pub const FAST_PERIOD: usize = 12;
pub const SLOW_PERIOD: usize = 26;
pub const SIGNAL_PERIOD: usize = 9;

/// MACD line, signal and histogram at every index.
pub fn macd(values: &[f64]) -> MacdSeries {
    let fast = ema(values, FAST_PERIOD);
    let slow = ema(values, SLOW_PERIOD);

    let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = ema(&line, SIGNAL_PERIOD);
    let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    MacdSeries {
        line,
        signal,
        histogram,
    }
}

/// Latest MACD line and signal. Zero for an empty series.
pub fn macd_latest(values: &[f64]) -> MacdValue {
    let series = macd(values);
    match (series.line.last(), series.signal.last()) {
        (Some(&line), Some(&signal)) => MacdValue { line, signal },
        _ => MacdValue::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_macd_flat_prices() {
        let series = macd(&[50.0; 40]);
        assert!(series.line.iter().all(|v| v.abs() < 1e-12));
        assert!(series.histogram.iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_macd_aligned_lengths() {
        let values: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let series = macd(&values);
        assert_eq!(series.line.len(), 60);
        assert_eq!(series.signal.len(), 60);
        assert_eq!(series.histogram.len(), 60);
    }

    #[test]
    fn test_macd_uptrend_positive() {
        let values: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let latest = macd_latest(&values);
        assert!(latest.line > 0.0);
        assert!(latest.signal > 0.0);
    }

    #[test]
    fn test_macd_histogram_is_difference() {
        let values: Vec<f64> = (0..50).map(|i| (i as f64 * 0.3).sin() * 10.0 + 100.0).collect();
        let series = macd(&values);
        for i in 0..values.len() {
            assert_relative_eq!(
                series.histogram[i],
                series.line[i] - series.signal[i],
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_macd_latest_matches_series() {
        let values: Vec<f64> = (0..45).map(|i| 100.0 - i as f64 * 0.5).collect();
        let series = macd(&values);
        let latest = macd_latest(&values);
        assert_eq!(latest.line, *series.line.last().unwrap());
        assert_eq!(latest.signal, *series.signal.last().unwrap());
    }

    #[test]
    fn test_macd_empty() {
        assert_eq!(macd(&[]), MacdSeries::default());
        assert_eq!(macd_latest(&[]), MacdValue::default());
    }
}
