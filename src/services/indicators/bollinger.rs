//! Bollinger Bands.
//!
//! - Middle band: SMA over the period
//! - Upper band: middle + 2 * StdDev
//! - Lower band: middle - 2 * StdDev

use super::sma::trailing_mean;
use crate::types::BollingerBand;

pub const DEFAULT_BOLLINGER_PERIOD: usize = 20;

const STD_DEV_MULTIPLIER: f64 = 2.0;

/// Bands over the last `period` values.
///
/// With fewer than `period` values the band collapses onto the last price;
/// an empty series yields `0 / 1 / 0`.
pub fn bollinger_bands(values: &[f64], period: usize) -> BollingerBand {
    if period == 0 || values.len() < period {
        let last = values.last().copied();
        return BollingerBand {
            upper: last.unwrap_or(0.0),
            middle: last.unwrap_or(1.0),
            lower: last.unwrap_or(0.0),
        };
    }

    let window = &values[values.len() - period..];
    let middle = trailing_mean(window, period).unwrap_or(0.0);
    let variance = window.iter().map(|v| (v - middle).powi(2)).sum::<f64>() / period as f64;
    let std_dev = variance.sqrt();

    BollingerBand {
        upper: middle + STD_DEV_MULTIPLIER * std_dev,
        middle,
        lower: middle - STD_DEV_MULTIPLIER * std_dev,
    }
}

/// Rolling bands, entry `i` computed over `values[..=i]`.
pub fn bollinger_series(values: &[f64], period: usize) -> Vec<BollingerBand> {
    (0..values.len())
        .map(|i| bollinger_bands(&values[..=i], period))
        .collect()
}
