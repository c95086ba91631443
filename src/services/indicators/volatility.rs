//! Dispersion measures: standard deviation of prices and of returns.

/// Population standard deviation of the raw values. Zero when empty.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Period-over-period percentage returns. A zero base price yields a zero return.
pub fn returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .map(|w| if w[0] == 0.0 { 0.0 } else { (w[1] - w[0]) / w[0] })
        .collect()
}

/// Standard deviation of returns. Zero for fewer than two values.
pub fn volatility(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    std_dev(&returns(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_std_dev_known_value() {
        assert_relative_eq!(std_dev(&[10.0, 20.0, 30.0]), 8.16496580927726, epsilon = 1e-9);
    }

    #[test]
    fn test_std_dev_empty_and_constant() {
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(std_dev(&[3.0, 3.0, 3.0]), 0.0);
    }

    #[test]
    fn test_returns() {
        let r = returns(&[100.0, 110.0, 99.0]);
        assert_relative_eq!(r[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(r[1], -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_returns_zero_base() {
        assert_eq!(returns(&[0.0, 5.0]), vec![0.0]);
    }

    #[test]
    fn test_volatility_short_input() {
        assert_eq!(volatility(&[]), 0.0);
        assert_eq!(volatility(&[42.0]), 0.0);
    }

    #[test]
    fn test_volatility_constant_growth_is_zero() {
        let values: Vec<f64> = (0..10).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        assert!(volatility(&values) < 1e-12);
    }

    #[test]
    fn test_volatility_differs_from_std_dev() {
        let values = [100.0, 102.0, 99.0, 105.0];
        assert!(volatility(&values) < std_dev(&values));
        assert!(volatility(&values) > 0.0);
    }
}
