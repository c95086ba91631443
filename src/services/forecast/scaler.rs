//! Z-score standardization for model inputs and targets.

use ndarray::{Array1, Array2, Axis};

const MIN_STD: f64 = 1e-12;

/// Column-wise standardizer fitted on the training inputs.
#[derive(Debug, Clone)]
pub struct Standardizer {
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl Standardizer {
    pub fn fit(x: &Array2<f64>) -> Self {
        let cols = x.ncols();
        let mean = x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(cols));
        let std = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s.is_finite() && s > MIN_STD { s } else { 1.0 });
        Self { mean, std }
    }

    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut out = x.clone();
        for mut row in out.rows_mut() {
            row -= &self.mean;
            row /= &self.std;
        }
        out
    }
}

/// Standardizer for a single target column.
#[derive(Debug, Clone, Copy)]
pub struct TargetScaler {
    mean: f64,
    std: f64,
}

impl TargetScaler {
    pub fn fit(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self { mean: 0.0, std: 1.0 };
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt();
        Self {
            mean,
            std: if std.is_finite() && std > MIN_STD { std } else { 1.0 },
        }
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.mean) / self.std
    }

    pub fn inverse(&self, scaled: f64) -> f64 {
        scaled * self.std + self.mean
    }
}
