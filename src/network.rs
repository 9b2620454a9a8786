use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{PalaestraError, Result};

/// The full parameter set of the two-layer perceptron.
///
/// `weights1` is `input x hidden`, `weights2` is `hidden x output`. A second
/// instance of this struct serves as the frozen target snapshot; it is only
/// ever written by [`QNetwork::sync_target`], never by gradient steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkParameters {
    pub weights1: Array2<f64>,
    pub bias1: Array1<f64>,
    pub weights2: Array2<f64>,
    pub bias2: Array1<f64>,
}

impl NetworkParameters {
    /// Xavier/Glorot uniform initialization: weights drawn from
    /// `[-sqrt(6/(fan_in+fan_out)), +sqrt(6/(fan_in+fan_out))]`, zero biases.
    fn glorot(input_size: usize, hidden_size: usize, output_size: usize, rng: &mut StdRng) -> Self {
        let limit1 = (6.0 / (input_size + hidden_size) as f64).sqrt();
        let limit2 = (6.0 / (hidden_size + output_size) as f64).sqrt();
        NetworkParameters {
            weights1: Array2::random_using((input_size, hidden_size), Uniform::new(-limit1, limit1), rng),
            bias1: Array1::zeros(hidden_size),
            weights2: Array2::random_using((hidden_size, output_size), Uniform::new(-limit2, limit2), rng),
            bias2: Array1::zeros(output_size),
        }
    }
}

/// Result of a forward pass: the post-ReLU hidden activations and the
/// linear output (Q-values are unbounded reals, so no output nonlinearity).
#[derive(Clone, Debug)]
pub struct ForwardPass {
    pub hidden: Array1<f64>,
    pub output: Array1<f64>,
}

/// Two-layer perceptron (input -> hidden ReLU -> linear output) with manual
/// forward and batch-gradient backward passes.
///
/// The network keeps two parameter sets: the live parameters updated by
/// [`train_batch`](QNetwork::train_batch) and a target snapshot updated only
/// by an explicit hard copy. The target therefore always equals some past
/// snapshot of the live parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QNetwork {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    pub params: NetworkParameters,
    pub target: NetworkParameters,
}

impl QNetwork {
    /// Create a network with Glorot-initialized live parameters; the target
    /// starts as a copy of the live set.
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize, rng: &mut StdRng) -> Self {
        let params = NetworkParameters::glorot(input_size, hidden_size, output_size, rng);
        let target = params.clone();
        QNetwork {
            input_size,
            hidden_size,
            output_size,
            params,
            target,
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    fn check_input(&self, len: usize) -> Result<()> {
        if len != self.input_size {
            return Err(PalaestraError::dimension_mismatch(
                format!("input of length {}", self.input_size),
                format!("length {}", len),
            ));
        }
        Ok(())
    }

    /// Forward pass for a single input vector. Pure: no side effects on the
    /// network. `use_target` selects the frozen snapshot instead of the live
    /// parameters.
    pub fn forward(&self, input: ArrayView1<f64>, use_target: bool) -> Result<ForwardPass> {
        self.check_input(input.len())?;
        let p = if use_target { &self.target } else { &self.params };

        let mut hidden = input.dot(&p.weights1) + &p.bias1;
        hidden.mapv_inplace(|v| v.max(0.0));
        let output = hidden.dot(&p.weights2) + &p.bias2;

        Ok(ForwardPass { hidden, output })
    }

    /// Convenience wrapper returning only the live network's output.
    pub fn predict(&self, input: ArrayView1<f64>) -> Result<Array1<f64>> {
        Ok(self.forward(input, false)?.output)
    }

    /// One batch gradient step against per-sample target vectors.
    ///
    /// Runs a batched forward pass with the live parameters, backpropagates
    /// the output error through the linear output layer and the ReLU hidden
    /// layer, averages the gradients over the batch, clamps every component
    /// to `[-gradient_clip, +gradient_clip]`, and applies a single SGD step
    /// `param -= learning_rate * grad`. Returns the mean squared error of
    /// the pre-update predictions.
    pub fn train_batch(
        &mut self,
        states: ArrayView2<f64>,
        targets: ArrayView2<f64>,
        learning_rate: f64,
        gradient_clip: f64,
    ) -> Result<f64> {
        let batch_size = states.nrows();
        if batch_size == 0 {
            return Err(PalaestraError::EmptyBuffer(
                "cannot train on an empty batch".to_string(),
            ));
        }
        if states.ncols() != self.input_size
            || targets.ncols() != self.output_size
            || targets.nrows() != batch_size
        {
            return Err(PalaestraError::dimension_mismatch(
                format!("states {}x{}, targets {}x{}",
                    batch_size, self.input_size, batch_size, self.output_size),
                format!("states {}x{}, targets {}x{}",
                    states.nrows(), states.ncols(), targets.nrows(), targets.ncols()),
            ));
        }

        let p = &self.params;
        let pre_hidden = states.dot(&p.weights1) + &p.bias1;
        let hidden = pre_hidden.mapv(|v| v.max(0.0));
        let output = hidden.dot(&p.weights2) + &p.bias2;

        // Mean gradients over the batch; one in-place update, not
        // per-sample online steps.
        let errors = &output - &targets;
        let scale = 1.0 / batch_size as f64;
        let relu_mask = pre_hidden.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 });
        let hidden_errors = errors.dot(&p.weights2.t()) * &relu_mask;

        let mut grad_w2 = hidden.t().dot(&errors) * scale;
        let mut grad_b2 = errors.sum_axis(Axis(0)) * scale;
        let mut grad_w1 = states.t().dot(&hidden_errors) * scale;
        let mut grad_b1 = hidden_errors.sum_axis(Axis(0)) * scale;

        let clip = |g: f64| g.max(-gradient_clip).min(gradient_clip);
        grad_w1.mapv_inplace(clip);
        grad_b1.mapv_inplace(clip);
        grad_w2.mapv_inplace(clip);
        grad_b2.mapv_inplace(clip);

        let p = &mut self.params;
        p.weights1.zip_mut_with(&grad_w1, |w, &g| *w -= learning_rate * g);
        p.bias1.zip_mut_with(&grad_b1, |b, &g| *b -= learning_rate * g);
        p.weights2.zip_mut_with(&grad_w2, |w, &g| *w -= learning_rate * g);
        p.bias2.zip_mut_with(&grad_b2, |b, &g| *b -= learning_rate * g);

        let loss = errors.mapv(|e| e * e).sum() * scale / self.output_size as f64;
        Ok(loss)
    }

    /// Hard-copy the live parameters into the target snapshot.
    pub fn sync_target(&mut self) {
        self.target = self.params.clone();
    }
}
