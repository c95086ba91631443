//! Dense (fully connected) layer: `output = activation(input * weights + bias)`.

use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::Rng;

/// Activation applied to a layer's linear output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// max(0, x)
    Relu,
    /// Identity, used on the regression output.
    Linear,
}

impl Activation {
    fn apply(self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Activation::Relu => z.mapv(|v| v.max(0.0)),
            Activation::Linear => z.clone(),
        }
    }

    fn derivative(self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Activation::Relu => z.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Activation::Linear => Array2::ones(z.dim()),
        }
    }
}

/// Values kept from a training forward pass for backpropagation.
struct ForwardCache {
    input: Array2<f64>,
    z: Array2<f64>,
    dropout_mask: Option<Array2<f64>>,
}

/// Gradients produced by one backward pass.
pub struct Gradients {
    pub input: Array2<f64>,
    pub weights: Array2<f64>,
    pub biases: Array1<f64>,
}

pub struct DenseLayer {
    /// Weight matrix (input_size x output_size)
    pub weights: Array2<f64>,
    pub biases: Array1<f64>,
    pub activation: Activation,
    /// Fraction of outputs zeroed during training (0.0 = no dropout)
    pub dropout_rate: f64,
    cache: Option<ForwardCache>,
}

impl DenseLayer {
    /// Create a layer with Xavier/Glorot uniform weights and zero biases.
    pub fn new(input_size: usize, output_size: usize, activation: Activation, rng: &mut StdRng) -> Self {
        let limit = (6.0 / (input_size + output_size) as f64).sqrt();
        let weights = Array2::from_shape_fn((input_size, output_size), |_| {
            rng.gen_range(-limit..limit)
        });

        Self {
            weights,
            biases: Array1::zeros(output_size),
            activation,
            dropout_rate: 0.0,
            cache: None,
        }
    }

    pub fn with_dropout(mut self, rate: f64) -> Self {
        self.dropout_rate = rate.clamp(0.0, 0.9);
        self
    }

    pub fn input_size(&self) -> usize {
        self.weights.nrows()
    }

    pub fn num_parameters(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    fn linear(&self, input: &Array2<f64>) -> Array2<f64> {
        let mut z = input.dot(&self.weights);
        for mut row in z.rows_mut() {
            row += &self.biases;
        }
        z
    }

    /// Inference pass. No dropout, nothing cached.
    pub fn infer(&self, input: &Array2<f64>) -> Array2<f64> {
        self.activation.apply(&self.linear(input))
    }

    /// Training pass. Applies inverted dropout and caches what backprop needs.
    pub fn forward_train(&mut self, input: &Array2<f64>, rng: &mut StdRng) -> Array2<f64> {
        let z = self.linear(input);
        let mut output = self.activation.apply(&z);

        let dropout_mask = if self.dropout_rate > 0.0 {
            let keep = 1.0 - self.dropout_rate;
            let mask = Array2::from_shape_fn(output.dim(), |_| {
                if rng.gen::<f64>() < self.dropout_rate {
                    0.0
                } else {
                    1.0 / keep
                }
            });
            output = &output * &mask;
            Some(mask)
        } else {
            None
        };

        self.cache = Some(ForwardCache {
            input: input.clone(),
            z,
            dropout_mask,
        });

        output
    }

    /// Backward pass for the last `forward_train` call.
    ///
    /// Consumes the cached activations; returns `None` if there are none.
    pub fn backward(&mut self, output_gradient: &Array2<f64>) -> Option<Gradients> {
        let cache = self.cache.take()?;

        let grad = match &cache.dropout_mask {
            Some(mask) => output_gradient * mask,
            None => output_gradient.clone(),
        };
        let delta = &grad * &self.activation.derivative(&cache.z);

        Some(Gradients {
            weights: cache.input.t().dot(&delta),
            biases: delta.sum_axis(Axis(0)),
            input: delta.dot(&self.weights.t()),
        })
    }
}
