//! Feedforward regression network: ReLU hidden layers, one linear output.

use ndarray::Array2;
use rand::rngs::StdRng;

use super::layer::{Activation, DenseLayer};
use super::optimizer::RmsProp;
use crate::error::EngineError;

pub struct Network {
    layers: Vec<DenseLayer>,
    optimizers: Vec<RmsProp>,
}

impl Network {
    /// Build `input_size -> hidden[0] -> ... -> 1`.
    ///
    /// Dropout sits after the first hidden layer only.
    pub fn new(
        input_size: usize,
        hidden: &[usize],
        dropout_rate: f64,
        learning_rate: f64,
        rng: &mut StdRng,
    ) -> Self {
        let mut layers = Vec::with_capacity(hidden.len() + 1);
        let mut prev = input_size;

        for (i, &units) in hidden.iter().enumerate() {
            let mut layer = DenseLayer::new(prev, units, Activation::Relu, rng);
            if i == 0 {
                layer = layer.with_dropout(dropout_rate);
            }
            layers.push(layer);
            prev = units;
        }
        layers.push(DenseLayer::new(prev, 1, Activation::Linear, rng));

        let optimizers = layers.iter().map(|_| RmsProp::new(learning_rate)).collect();

        Self { layers, optimizers }
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map(|l| l.input_size()).unwrap_or(0)
    }

    pub fn num_parameters(&self) -> usize {
        self.layers.iter().map(|l| l.num_parameters()).sum()
    }

    pub fn predict(&self, x: &Array2<f64>) -> Array2<f64> {
        self.layers
            .iter()
            .fold(x.clone(), |activation, layer| layer.infer(&activation))
    }

    /// Mean squared error without updating weights.
    pub fn evaluate(&self, x: &Array2<f64>, y: &Array2<f64>) -> f64 {
        mse(&self.predict(x), y)
    }

    /// One forward/backward pass over a mini-batch. Returns the batch loss.
    pub fn train_batch(
        &mut self,
        x: &Array2<f64>,
        y: &Array2<f64>,
        rng: &mut StdRng,
    ) -> Result<f64, EngineError> {
        let mut output = x.clone();
        for layer in &mut self.layers {
            output = layer.forward_train(&output, rng);
        }

        let loss = mse(&output, y);
        let n = output.len().max(1) as f64;
        let mut grad = (&output - y).mapv(|d| 2.0 * d / n);

        for (layer, optimizer) in self
            .layers
            .iter_mut()
            .zip(self.optimizers.iter_mut())
            .rev()
        {
            let grads = layer.backward(&grad).ok_or_else(|| {
                EngineError::ForecastUnavailable("backward pass without forward pass".into())
            })?;
            optimizer.step(layer, &grads);
            grad = grads.input;
        }

        Ok(loss)
    }
}

pub fn mse(predictions: &Array2<f64>, targets: &Array2<f64>) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let diff = predictions - targets;
    diff.mapv(|d| d * d).sum() / predictions.len() as f64
}
