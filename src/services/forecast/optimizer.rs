//! RMSprop optimizer.

use ndarray::{Array1, Array2, Zip};

use super::layer::{DenseLayer, Gradients};

const RHO: f64 = 0.9;
const EPSILON: f64 = 1e-7;

/// Per-layer RMSprop state: a running mean of squared gradients.
pub struct RmsProp {
    learning_rate: f64,
    sq_weights: Option<Array2<f64>>,
    sq_biases: Option<Array1<f64>>,
}

impl RmsProp {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            sq_weights: None,
            sq_biases: None,
        }
    }

    pub fn step(&mut self, layer: &mut DenseLayer, grads: &Gradients) {
        let lr = self.learning_rate;

        let sq = self
            .sq_weights
            .get_or_insert_with(|| Array2::zeros(layer.weights.dim()));
        Zip::from(&mut layer.weights)
            .and(sq)
            .and(&grads.weights)
            .for_each(|w, s, &g| {
                *s = RHO * *s + (1.0 - RHO) * g * g;
                *w -= lr * g / (s.sqrt() + EPSILON);
            });

        let sq = self
            .sq_biases
            .get_or_insert_with(|| Array1::zeros(layer.biases.len()));
        Zip::from(&mut layer.biases)
            .and(sq)
            .and(&grads.biases)
            .for_each(|b, s, &g| {
                *s = RHO * *s + (1.0 - RHO) * g * g;
                *b -= lr * g / (s.sqrt() + EPSILON);
            });
    }
}
