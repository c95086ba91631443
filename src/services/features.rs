//! Feature vectors for the forecast model.

use crate::error::EngineError;
use crate::services::indicators::{
    momentum, rsi, sma, std_dev, trend, volatility, DEFAULT_RSI_PERIOD,
};
use crate::types::{FeatureVector, TrainingSet};

/// Window length the model is trained on.
pub const TRAINING_WINDOW: usize = 20;

/// Summarize a price window as `(SMA, RSI, Volatility, Momentum, Trend, StdDev)`.
///
/// Works on any length; an empty window maps every feature to its fallback.
pub fn build_features(window: &[f64]) -> FeatureVector {
    FeatureVector {
        sma: sma(window).unwrap_or(0.0),
        rsi: rsi(window, DEFAULT_RSI_PERIOD),
        volatility: volatility(window),
        momentum: momentum(window),
        trend: trend(window),
        std_dev: std_dev(window),
    }
}

/// Builds feature vectors over windows of one fixed length.
///
/// The same extractor is used to cut the training set and to describe the
/// live window at inference, so both sides always agree on the window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureExtractor {
    window_size: usize,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(TRAINING_WINDOW)
    }
}

impl FeatureExtractor {
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size: window_size.max(1),
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Features of a window that must be exactly `window_size` long.
    pub fn extract(&self, window: &[f64]) -> Result<FeatureVector, EngineError> {
        if window.len() != self.window_size {
            return Err(EngineError::FeatureArityMismatch {
                expected: self.window_size,
                actual: window.len(),
            });
        }
        Ok(build_features(window))
    }

    /// Features of the last `window_size` values of a longer context.
    pub fn extract_trailing(&self, context: &[f64]) -> Result<FeatureVector, EngineError> {
        let start = context.len().saturating_sub(self.window_size);
        self.extract(&context[start..])
    }

    /// Slide the window over `prices`; each label is the price right after it.
    ///
    /// Yields `prices.len() - window_size` samples (none if the series is not
    /// longer than one window).
    pub fn training_set(&self, prices: &[f64]) -> TrainingSet {
        let count = prices.len().saturating_sub(self.window_size);
        let mut set = TrainingSet {
            window_size: self.window_size,
            inputs: Vec::with_capacity(count),
            labels: Vec::with_capacity(count),
            anchors: Vec::with_capacity(count),
        };

        for end in self.window_size..prices.len() {
            let window = &prices[end - self.window_size..end];
            set.inputs.push(build_features(window));
            set.labels.push(prices[end]);
            set.anchors.push(prices[end - 1]);
        }

        set
    }
}
