//! Short-horizon price forecaster.
//!
//! A small feedforward network is trained from scratch on every call. Each
//! sample is the feature vector of a sliding window, and the target is the
//! next price relative to the window's last price. Inference extends the
//! series one step at a time, feeding every prediction back into the
//! trailing context.

mod layer;
mod network;
mod optimizer;
mod scaler;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

use ndarray::{s, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::config::ForecastConfig;
use crate::error::EngineError;
use crate::services::features::FeatureExtractor;
use crate::types::{ForecastResult, TrainingSet, FEATURE_COUNT};

use network::Network;
use scaler::{Standardizer, TargetScaler};

/// Trains a fresh model per call and extends a price series.
#[derive(Debug, Clone)]
pub struct Forecaster {
    config: ForecastConfig,
    extractor: FeatureExtractor,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self::new(ForecastConfig::default())
    }
}

impl Forecaster {
    pub fn new(config: ForecastConfig) -> Self {
        let config = config.normalized();
        let extractor = FeatureExtractor::new(config.window_size);
        Self { config, extractor }
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// `prices` followed by `horizon` predicted values.
    ///
    /// Series shorter than the configured minimum history come back
    /// unchanged.
    pub fn forecast(&self, prices: &[f64], horizon: usize) -> Result<ForecastResult, EngineError> {
        self.forecast_with_cancel(prices, horizon, &AtomicBool::new(false))
    }

    /// Like [`forecast`](Self::forecast), but stops with
    /// [`EngineError::Cancelled`] once `cancel` is set.
    pub fn forecast_with_cancel(
        &self,
        prices: &[f64],
        horizon: usize,
        cancel: &AtomicBool,
    ) -> Result<ForecastResult, EngineError> {
        if prices.len() < self.config.min_history || horizon == 0 {
            debug!(
                "Skipping forecast: {} prices, minimum {}",
                prices.len(),
                self.config.min_history
            );
            return Ok(ForecastResult::identity(prices));
        }

        let predictor = self.train(prices, cancel)?;
        let predicted = predictor.extend(prices, horizon)?;

        let mut out = Vec::with_capacity(prices.len() + predicted.len());
        out.extend_from_slice(prices);
        out.extend(predicted);

        Ok(ForecastResult {
            prices: out,
            history_len: prices.len(),
        })
    }

    /// Fit a model on `prices`.
    pub fn train(&self, prices: &[f64], cancel: &AtomicBool) -> Result<Predictor, EngineError> {
        let set = self.extractor.training_set(prices);
        if set.is_empty() {
            return Err(EngineError::InsufficientData {
                required: self.extractor.window_size() + 1,
                actual: prices.len(),
            });
        }
        if set.inputs.iter().any(|f| !f.is_finite()) {
            return Err(EngineError::ForecastUnavailable(
                "non-finite training features".into(),
            ));
        }

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (x, targets) = encode(&set);
        let total = targets.len();
        let held_out = (total as f64 * self.config.validation_split).floor() as usize;
        let held_out = if held_out >= total { 0 } else { held_out };
        let train_len = total - held_out;

        let x_train = x.slice(s![..train_len, ..]).to_owned();
        let feature_scaler = Standardizer::fit(&x_train);
        let target_scaler = TargetScaler::fit(&targets[..train_len]);

        let xs = feature_scaler.transform(&x);
        let ys = Array2::from_shape_fn((total, 1), |(i, _)| target_scaler.transform(targets[i]));

        let (x_val, y_val) = (
            xs.slice(s![train_len.., ..]).to_owned(),
            ys.slice(s![train_len.., ..]).to_owned(),
        );

        let mut network = Network::new(
            FEATURE_COUNT,
            &self.config.hidden_units,
            self.config.dropout_rate,
            self.config.learning_rate,
            &mut rng,
        );
        debug!(
            "Training forecast model: {} samples ({} held out), {} parameters",
            train_len,
            held_out,
            network.num_parameters()
        );

        let mut order: Vec<usize> = (0..train_len).collect();
        for epoch in 1..=self.config.epochs {
            order.shuffle(&mut rng);

            let mut epoch_loss = 0.0;
            for batch in order.chunks(self.config.batch_size) {
                if cancel.load(Ordering::Relaxed) {
                    debug!("Forecast training cancelled at epoch {}", epoch);
                    return Err(EngineError::Cancelled);
                }
                let xb = xs.select(Axis(0), batch);
                let yb = ys.select(Axis(0), batch);
                epoch_loss += network.train_batch(&xb, &yb, &mut rng)? * batch.len() as f64;
            }
            epoch_loss /= train_len as f64;

            let val_loss = if held_out > 0 {
                network.evaluate(&x_val, &y_val)
            } else {
                0.0
            };

            if !epoch_loss.is_finite() || !val_loss.is_finite() {
                warn!("Forecast training diverged at epoch {}", epoch);
                return Err(EngineError::ForecastUnavailable(format!(
                    "training loss diverged at epoch {epoch}"
                )));
            }

            if epoch % 10 == 0 || epoch == self.config.epochs {
                debug!("Epoch {}: loss {:.5}, val_loss {:.5}", epoch, epoch_loss, val_loss);
            }
        }

        Ok(Predictor {
            network,
            extractor: self.extractor,
            feature_scaler,
            target_scaler,
            context_size: self.config.context_size,
        })
    }
}

/// Feature matrix and anchor-relative targets.
fn encode(set: &TrainingSet) -> (Array2<f64>, Vec<f64>) {
    let x = Array2::from_shape_fn((set.len(), FEATURE_COUNT), |(i, j)| {
        set.inputs[i].to_array()[j]
    });
    let targets = set
        .labels
        .iter()
        .zip(&set.anchors)
        .map(|(&label, &anchor)| relative_change(anchor, label))
        .collect();
    (x, targets)
}

fn relative_change(anchor: f64, next: f64) -> f64 {
    if anchor.abs() < f64::EPSILON {
        0.0
    } else {
        next / anchor - 1.0
    }
}

/// A trained model. Dropped after the forecast that created it.
pub struct Predictor {
    network: Network,
    extractor: FeatureExtractor,
    feature_scaler: Standardizer,
    target_scaler: TargetScaler,
    context_size: usize,
}

impl Predictor {
    /// Predict the price after `features`' window, whose last price is `anchor`.
    pub fn predict_features(&self, features: &[f64], anchor: f64) -> Result<f64, EngineError> {
        if features.len() != self.network.input_size() {
            return Err(EngineError::FeatureArityMismatch {
                expected: self.network.input_size(),
                actual: features.len(),
            });
        }

        let x = Array2::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| EngineError::ForecastUnavailable(e.to_string()))?;
        let scaled = self.network.predict(&self.feature_scaler.transform(&x));
        let change = self.target_scaler.inverse(scaled[[0, 0]]);
        let price = anchor * (1.0 + change);

        if !price.is_finite() {
            return Err(EngineError::ForecastUnavailable(
                "model produced a non-finite prediction".into(),
            ));
        }
        Ok(price)
    }

    /// Predict the price following `context`.
    pub fn predict_next(&self, context: &[f64]) -> Result<f64, EngineError> {
        let features = self.extractor.extract_trailing(context)?;
        let anchor = context.last().copied().unwrap_or(0.0);
        self.predict_features(&features.to_array(), anchor)
    }

    /// Predict `horizon` steps past the end of `prices`.
    pub fn extend(&self, prices: &[f64], horizon: usize) -> Result<Vec<f64>, EngineError> {
        let start = prices.len().saturating_sub(self.context_size);
        let mut context: VecDeque<f64> = prices[start..].iter().copied().collect();
        let mut predicted = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let next = self.predict_next(context.make_contiguous())?;
            predicted.push(next);
            context.push_back(next);
            if context.len() > self.context_size {
                context.pop_front();
            }
        }

        Ok(predicted)
    }
}
