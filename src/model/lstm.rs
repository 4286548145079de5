//! Sequence model
//!
//! Three stacked LSTM layers of width 50 (dropout 0.2 between them at
//! training time), a width-25 dense layer, and a single sigmoid output head
//! read as a failure probability. Weights live in `ndarray` matrices and are
//! Glorot-uniform initialized; inference is a plain forward pass, so dropout
//! is identity here.

use ndarray::{s, Array1, Array2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::features::FEATURE_COUNT;

/// Width of each recurrent layer
pub const HIDDEN_WIDTH: usize = 50;

/// Number of stacked recurrent layers
pub const STACKED_LAYERS: usize = 3;

/// Width of the dense head
pub const DENSE_WIDTH: usize = 25;

/// Dropout rate between recurrent layers (training-time only)
pub const DROPOUT_RATE: f32 = 0.2;

// ============================================================================
// LSTM LAYER
// ============================================================================

/// One recurrent layer. Gate order in the stacked weight matrices is
/// input, forget, cell, output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LstmLayer {
    /// (4*hidden, input)
    w_input: Array2<f32>,
    /// (4*hidden, hidden)
    w_hidden: Array2<f32>,
    /// (4*hidden)
    bias: Array1<f32>,
    hidden: usize,
}

impl LstmLayer {
    fn new<R: Rng>(input_size: usize, hidden: usize, rng: &mut R) -> Self {
        Self {
            w_input: glorot(4 * hidden, input_size, rng),
            w_hidden: glorot(4 * hidden, hidden, rng),
            bias: Array1::zeros(4 * hidden),
            hidden,
        }
    }

    /// Run the layer over a (time x input) sequence, returning the
    /// (time x hidden) sequence of hidden states.
    fn forward(&self, inputs: &Array2<f32>) -> Array2<f32> {
        let steps = inputs.nrows();
        let h_size = self.hidden;

        let mut hidden = Array1::<f32>::zeros(h_size);
        let mut cell = Array1::<f32>::zeros(h_size);
        let mut outputs = Array2::<f32>::zeros((steps, h_size));

        for t in 0..steps {
            let x = inputs.row(t).to_owned();
            let gates = self.w_input.dot(&x) + self.w_hidden.dot(&hidden) + &self.bias;

            let i = gates.slice(s![0..h_size]).mapv(sigmoid);
            let f = gates.slice(s![h_size..2 * h_size]).mapv(sigmoid);
            let g = gates.slice(s![2 * h_size..3 * h_size]).mapv(f32::tanh);
            let o = gates.slice(s![3 * h_size..4 * h_size]).mapv(sigmoid);

            cell = &f * &cell + &i * &g;
            hidden = &o * &cell.mapv(f32::tanh);
            outputs.row_mut(t).assign(&hidden);
        }

        outputs
    }
}

// ============================================================================
// SEQUENCE MODEL
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceModel {
    layers: Vec<LstmLayer>,
    /// (DENSE_WIDTH, HIDDEN_WIDTH)
    dense_weight: Array2<f32>,
    dense_bias: Array1<f32>,
    /// (DENSE_WIDTH)
    output_weight: Array1<f32>,
    output_bias: f32,
    dropout_rate: f32,
}

impl SequenceModel {
    /// Construct a fresh architecture with Glorot-initialized weights.
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let mut layers = Vec::with_capacity(STACKED_LAYERS);
        let mut input_size = FEATURE_COUNT;
        for _ in 0..STACKED_LAYERS {
            layers.push(LstmLayer::new(input_size, HIDDEN_WIDTH, rng));
            input_size = HIDDEN_WIDTH;
        }

        Self {
            layers,
            dense_weight: glorot(DENSE_WIDTH, HIDDEN_WIDTH, rng),
            dense_bias: Array1::zeros(DENSE_WIDTH),
            output_weight: glorot(1, DENSE_WIDTH, rng).row(0).to_owned(),
            output_bias: 0.0,
            dropout_rate: DROPOUT_RATE,
        }
    }

    pub fn dropout_rate(&self) -> f32 {
        self.dropout_rate
    }

    /// Failure probability for one (time x features) window.
    pub fn forward(&self, window: &Array2<f32>) -> f32 {
        let mut sequence = window.clone();
        for layer in &self.layers {
            sequence = layer.forward(&sequence);
        }

        // Last hidden state feeds the dense head (linear, then sigmoid out).
        let last = sequence.row(sequence.nrows() - 1).to_owned();
        let dense = self.dense_weight.dot(&last) + &self.dense_bias;
        sigmoid(self.output_weight.dot(&dense) + self.output_bias)
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Glorot-uniform initialized (rows x cols) matrix
fn glorot<R: Rng>(rows: usize, cols: usize, rng: &mut R) -> Array2<f32> {
    let limit = (6.0 / (rows + cols) as f32).sqrt();
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-limit..limit))
}

// ============================================================================
// TESTS
// ============================================================================
