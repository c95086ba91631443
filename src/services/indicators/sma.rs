//! Simple Moving Average (SMA).

use crate::error::EngineError;

/// Arithmetic mean of every value in `values`.
///
/// Fails with [`EngineError::InsufficientData`] on an empty slice.
pub fn sma(values: &[f64]) -> Result<f64, EngineError> {
    if values.is_empty() {
        return Err(EngineError::InsufficientData {
            required: 1,
            actual: 0,
        });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean of the last `period` values (or of all of them if fewer).
pub(crate) fn trailing_mean(values: &[f64], period: usize) -> Result<f64, EngineError> {
    let start = values.len().saturating_sub(period);
    sma(&values[start..])
}
