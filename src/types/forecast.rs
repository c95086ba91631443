use serde::{Deserialize, Serialize};

/// Number of scalars in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 6;

/// Summary statistics of a trailing price window, fed to the forecast model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    pub sma: f64,
    pub rsi: f64,
    pub volatility: f64,
    pub momentum: f64,
    pub trend: f64,
    pub std_dev: f64,
}

impl FeatureVector {
    /// Values in model input order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.sma,
            self.rsi,
            self.volatility,
            self.momentum,
            self.trend,
            self.std_dev,
        ]
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// Feature/label pairs cut from one price series.
///
/// `inputs[i]` describes the window `prices[i..i + window_size]`, `labels[i]`
/// is the price right after that window and `anchors[i]` is the window's last
/// price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    pub window_size: usize,
    pub inputs: Vec<FeatureVector>,
    pub labels: Vec<f64>,
    pub anchors: Vec<f64>,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Observed prices followed by the predicted ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub prices: Vec<f64>,
    /// Number of leading values that were observed rather than predicted.
    pub history_len: usize,
}

impl ForecastResult {
    /// A forecast that predicts nothing and returns the input unchanged.
    pub fn identity(prices: &[f64]) -> Self {
        Self {
            prices: prices.to_vec(),
            history_len: prices.len(),
        }
    }

    /// Only the predicted tail.
    pub fn predictions(&self) -> &[f64] {
        &self.prices[self.history_len.min(self.prices.len())..]
    }

    pub fn is_identity(&self) -> bool {
        self.predictions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_vector_order() {
        let features = FeatureVector {
            sma: 1.0,
            rsi: 2.0,
            volatility: 3.0,
            momentum: 4.0,
            trend: 5.0,
            std_dev: 6.0,
        };
        assert_eq!(features.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(features.is_finite());
    }

    #[test]
    fn test_forecast_identity() {
        let result = ForecastResult::identity(&[1.0, 2.0]);
        assert!(result.is_identity());
        assert_eq!(result.prices, vec![1.0, 2.0]);
    }

    #[test]
    fn test_forecast_predictions_tail() {
        let result = ForecastResult {
            prices: vec![1.0, 2.0, 3.0, 4.0],
            history_len: 2,
        };
        assert_eq!(result.predictions(), &[3.0, 4.0]);
        assert!(!result.is_identity());
    }
}
