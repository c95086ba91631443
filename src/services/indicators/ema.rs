//! Exponential Moving Average (EMA).

/// EMA of `values` with smoothing factor `k = 2 / (period + 1)`.
///
/// The first output equals the first input; each later value is
/// `value * k + previous * (1 - k)`. The result has one entry per input.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let k = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    out.push(first);

    for &value in &values[1..] {
        let prev = out[out.len() - 1];
        out.push(value * k + prev * (1.0 - k));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ema_constant_sequence() {
        let values = vec![7.5; 40];
        for value in ema(&values, 12) {
            assert_relative_eq!(value, 7.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_ema_first_value_is_seed() {
        let result = ema(&[10.0, 20.0], 3);
        assert_eq!(result[0], 10.0);
        // k = 0.5
        assert_relative_eq!(result[1], 15.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ema_length_matches_input() {
        let values: Vec<f64> = (0..25).map(|i| i as f64).collect();
        assert_eq!(ema(&values, 9).len(), 25);
    }

    #[test]
    fn test_ema_empty() {
        assert!(ema(&[], 12).is_empty());
    }

    #[test]
    fn test_ema_lags_uptrend() {
        let values: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let result = ema(&values, 10);
        assert!(result[29] < values[29]);
        assert!(result[29] > result[28]);
    }
}
