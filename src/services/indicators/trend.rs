//! Momentum and least-squares trend.

/// `last / first - 1`. Zero for an empty series or a zero first price.
pub fn momentum(values: &[f64]) -> f64 {
    match (values.first(), values.last()) {
        (Some(&first), Some(&last)) if first != 0.0 => last / first - 1.0,
        _ => 0.0,
    }
}

/// Slope of an ordinary least-squares fit of price against index,
/// divided by the first price.
///
/// Zero for fewer than two values or a zero first price.
pub fn trend(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 || values[0] == 0.0 {
        return 0.0;
    }

    let n_f = n as f64;
    let (sum_x, sum_y, sum_xy, sum_xx) = values.iter().enumerate().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sxx), (i, &y)| {
            let x = i as f64;
            (sx + x, sy + y, sxy + x * y, sxx + x * x)
        },
    );

    let denominator = n_f * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }

    let slope = (n_f * sum_xy - sum_x * sum_y) / denominator;
    slope / values[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_momentum() {
        assert_relative_eq!(momentum(&[100.0, 90.0, 110.0]), 0.1, epsilon = 1e-12);
        assert_eq!(momentum(&[]), 0.0);
        assert_eq!(momentum(&[0.0, 5.0]), 0.0);
        assert_eq!(momentum(&[7.0]), 0.0);
    }

    #[test]
    fn test_trend_linear() {
        // slope 2 per step, normalized by the first price 10
        let values: Vec<f64> = (0..20).map(|i| 10.0 + 2.0 * i as f64).collect();
        assert_relative_eq!(trend(&values), 0.2, epsilon = 1e-9);
    }

    #[test]
    fn test_trend_flat_and_falling() {
        assert_eq!(trend(&[5.0; 10]), 0.0);
        let falling: Vec<f64> = (0..10).map(|i| 50.0 - i as f64).collect();
        assert!(trend(&falling) < 0.0);
    }

    #[test]
    fn test_trend_degenerate_inputs() {
        assert_eq!(trend(&[]), 0.0);
        assert_eq!(trend(&[3.0]), 0.0);
        assert_eq!(trend(&[0.0, 1.0, 2.0]), 0.0);
    }
}
