//! Stacked LSTM with a linear readout

use super::LstmConfig;
use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One LSTM layer: input, forget, cell-candidate and output gates
#[derive(Debug, Clone)]
pub struct LstmCell {
    input_size: usize,
    hidden_size: usize,

    // input gate
    w_ii: Array2<f64>,
    w_hi: Array2<f64>,
    b_i: Array1<f64>,

    // forget gate
    w_if: Array2<f64>,
    w_hf: Array2<f64>,
    b_f: Array1<f64>,

    // cell candidate
    w_ig: Array2<f64>,
    w_hg: Array2<f64>,
    b_g: Array1<f64>,

    // output gate
    w_io: Array2<f64>,
    w_ho: Array2<f64>,
    b_o: Array1<f64>,
}

impl LstmCell {
    /// Create a cell with uniformly initialized weights.
    ///
    /// The forget-gate bias starts at 1.0 so early training does not forget
    /// everything immediately.
    pub fn new(input_size: usize, hidden_size: usize, rng: &mut StdRng) -> Self {
        let limit = (1.0 / hidden_size as f64).sqrt();
        let dist = Uniform::new(-limit, limit);

        Self {
            input_size,
            hidden_size,
            w_ii: Array2::random_using((hidden_size, input_size), dist, rng),
            w_hi: Array2::random_using((hidden_size, hidden_size), dist, rng),
            b_i: Array1::zeros(hidden_size),
            w_if: Array2::random_using((hidden_size, input_size), dist, rng),
            w_hf: Array2::random_using((hidden_size, hidden_size), dist, rng),
            b_f: Array1::from_elem(hidden_size, 1.0),
            w_ig: Array2::random_using((hidden_size, input_size), dist, rng),
            w_hg: Array2::random_using((hidden_size, hidden_size), dist, rng),
            b_g: Array1::zeros(hidden_size),
            w_io: Array2::random_using((hidden_size, input_size), dist, rng),
            w_ho: Array2::random_using((hidden_size, hidden_size), dist, rng),
            b_o: Array1::zeros(hidden_size),
        }
    }

    /// Number of input features the cell expects per step
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Width of the hidden state
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Advance the cell by one time step, returning (hidden, cell) state
    pub fn step(
        &self,
        x: &Array1<f64>,
        h_prev: &Array1<f64>,
        c_prev: &Array1<f64>,
    ) -> (Array1<f64>, Array1<f64>) {
        let i_gate = sigmoid(&(self.w_ii.dot(x) + self.w_hi.dot(h_prev) + &self.b_i));
        let f_gate = sigmoid(&(self.w_if.dot(x) + self.w_hf.dot(h_prev) + &self.b_f));
        let g = tanh(&(self.w_ig.dot(x) + self.w_hg.dot(h_prev) + &self.b_g));
        let o_gate = sigmoid(&(self.w_io.dot(x) + self.w_ho.dot(h_prev) + &self.b_o));

        let c_next = &f_gate * c_prev + &i_gate * &g;
        let h_next = &o_gate * &tanh(&c_next);

        (h_next, c_next)
    }

    /// Zeroed hidden and cell state
    pub fn init_state(&self) -> (Array1<f64>, Array1<f64>) {
        (
            Array1::zeros(self.hidden_size),
            Array1::zeros(self.hidden_size),
        )
    }
}

/// Linear output unit mapping the final hidden state to one value
#[derive(Debug, Clone)]
struct Readout {
    weights: Array2<f64>,
    bias: Array1<f64>,
}

impl Readout {
    fn new(hidden_size: usize, rng: &mut StdRng) -> Self {
        let limit = (1.0 / hidden_size as f64).sqrt();
        Self {
            weights: Array2::random_using((1, hidden_size), Uniform::new(-limit, limit), rng),
            bias: Array1::zeros(1),
        }
    }

    fn forward(&self, hidden: &Array1<f64>) -> f64 {
        self.weights.row(0).dot(hidden) + self.bias[0]
    }
}

/// Stacked LSTM network with a linear readout.
///
/// Training minimizes mean-squared error with mini-batch gradient descent
/// over the configured epochs and batch size. The readout is updated with
/// exact analytic gradients over the recurrent features; dropout masks are
/// applied between layers on the training forward passes only.
#[derive(Debug, Clone)]
pub struct LstmNetwork {
    config: LstmConfig,
    cells: Vec<LstmCell>,
    readout: Readout,
    rng: StdRng,
    /// Average loss per epoch from the last training run
    pub loss_history: Vec<f64>,
}

impl LstmNetwork {
    /// Build a network from a validated configuration
    pub fn new(config: LstmConfig) -> Result<Self> {
        if config.num_layers == 0 || config.hidden_size == 0 || config.input_size == 0 {
            return Err(ForecastError::InvalidInput(
                "Model needs at least one layer, one hidden unit and one input".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&config.dropout) {
            return Err(ForecastError::InvalidInput(format!(
                "Dropout {} is outside [0, 1)",
                config.dropout
            )));
        }
        if config.epochs == 0 || config.batch_size == 0 {
            return Err(ForecastError::InvalidInput(
                "Epochs and batch size must be positive".to_string(),
            ));
        }
        if !(config.learning_rate > 0.0 && config.learning_rate.is_finite()) {
            return Err(ForecastError::InvalidInput(format!(
                "Learning rate {} must be a positive number",
                config.learning_rate
            )));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut cells = Vec::with_capacity(config.num_layers);
        cells.push(LstmCell::new(config.input_size, config.hidden_size, &mut rng));
        for _ in 1..config.num_layers {
            cells.push(LstmCell::new(config.hidden_size, config.hidden_size, &mut rng));
        }

        let readout = Readout::new(config.hidden_size, &mut rng);

        Ok(Self {
            config,
            cells,
            readout,
            rng,
            loss_history: Vec::new(),
        })
    }

    /// Run one window through the stack and return the final hidden state
    fn hidden_features(&mut self, window: &[f64], training: bool) -> Array1<f64> {
        let cells = &self.cells;
        let rng = &mut self.rng;
        let keep = 1.0 - self.config.dropout;

        let mut states: Vec<(Array1<f64>, Array1<f64>)> =
            cells.iter().map(|cell| cell.init_state()).collect();

        for &value in window {
            let mut layer_input = Array1::from_elem(self.config.input_size, value);

            for (idx, cell) in cells.iter().enumerate() {
                let (h_prev, c_prev) = &states[idx];
                let (h, c) = cell.step(&layer_input, h_prev, c_prev);

                let mut output = h.clone();
                if training && keep < 1.0 {
                    // Inverted dropout: mask the output fed to the next
                    // layer, leave the recurrent state intact
                    output.mapv_inplace(|v| {
                        if rng.gen::<f64>() < keep {
                            v / keep
                        } else {
                            0.0
                        }
                    });
                }

                layer_input = output;
                states[idx] = (h, c);
            }
        }

        states[self.cells.len() - 1].0.clone()
    }

    /// Train on (window, label) pairs, returning the per-epoch loss curve
    pub fn train(&mut self, windows: &[Vec<f64>], labels: &[f64]) -> Result<&[f64]> {
        if windows.is_empty() {
            return Err(ForecastError::InsufficientData(
                "No training windows".to_string(),
            ));
        }
        if windows.len() != labels.len() {
            return Err(ForecastError::InvalidInput(format!(
                "{} windows but {} labels",
                windows.len(),
                labels.len()
            )));
        }

        let n_samples = windows.len();
        let batch_size = self.config.batch_size.min(n_samples);
        self.loss_history.clear();

        for epoch in 0..self.config.epochs {
            let mut epoch_loss = 0.0;
            let mut n_batches = 0usize;

            for batch_start in (0..n_samples).step_by(batch_size) {
                let batch_end = (batch_start + batch_size).min(n_samples);
                let m = (batch_end - batch_start) as f64;

                let features: Vec<Array1<f64>> = (batch_start..batch_end)
                    .map(|i| self.hidden_features(&windows[i], true))
                    .collect();

                let mut grad_w = Array1::<f64>::zeros(self.config.hidden_size);
                let mut grad_b = 0.0;
                let mut batch_loss = 0.0;

                for (hidden, &label) in features.iter().zip(&labels[batch_start..batch_end]) {
                    let residual = self.readout.forward(hidden) - label;
                    batch_loss += residual * residual;
                    grad_w.scaled_add(2.0 * residual / m, hidden);
                    grad_b += 2.0 * residual / m;
                }

                self.readout
                    .weights
                    .row_mut(0)
                    .scaled_add(-self.config.learning_rate, &grad_w);
                self.readout.bias[0] -= self.config.learning_rate * grad_b;

                epoch_loss += batch_loss / m;
                n_batches += 1;
            }

            let avg_loss = epoch_loss / n_batches as f64;
            self.loss_history.push(avg_loss);
            tracing::debug!(epoch = epoch + 1, loss = avg_loss, "epoch finished");
        }

        Ok(&self.loss_history)
    }

    /// Predict scaled values for a batch of windows
    pub fn predict(&mut self, windows: &[Vec<f64>]) -> Vec<f64> {
        windows
            .iter()
            .map(|window| self.predict_one(window))
            .collect()
    }

    /// Predict the scaled value for a single window
    pub fn predict_one(&mut self, window: &[f64]) -> f64 {
        let hidden = self.hidden_features(window, false);
        self.readout.forward(&hidden)
    }
}

fn sigmoid(x: &Array1<f64>) -> Array1<f64> {
    x.mapv(|v| 1.0 / (1.0 + (-v).exp()))
}

fn tanh(x: &Array1<f64>) -> Array1<f64> {
    x.mapv(|v| v.tanh())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> LstmConfig {
        LstmConfig {
            hidden_size: 8,
            num_layers: 2,
            epochs: 5,
            ..LstmConfig::default()
        }
        .with_seed(7)
    }

    #[test]
    fn cell_preserves_shapes() {
        let mut rng = StdRng::seed_from_u64(1);
        let cell = LstmCell::new(1, 10, &mut rng);
        let x = Array1::zeros(1);
        let (h, c) = cell.init_state();

        let (h_next, c_next) = cell.step(&x, &h, &c);
        assert_eq!(h_next.len(), 10);
        assert_eq!(c_next.len(), 10);
    }

    #[test]
    fn training_reduces_loss_on_constant_target() {
        let windows: Vec<Vec<f64>> = (0..20).map(|_| vec![0.5; 7]).collect();
        let labels = vec![0.5; 20];

        let mut network = LstmNetwork::new(small_config()).unwrap();
        let history = network.train(&windows, &labels).unwrap().to_vec();

        assert_eq!(history.len(), 5);
        assert!(history.last().unwrap() <= history.first().unwrap());
    }

    #[test]
    fn predictions_are_finite() {
        let windows: Vec<Vec<f64>> = (0..10)
            .map(|i| (0..7).map(|t| (i + t) as f64 / 20.0).collect())
            .collect();
        let labels: Vec<f64> = (0..10).map(|i| (i + 7) as f64 / 20.0).collect();

        let mut network = LstmNetwork::new(small_config()).unwrap();
        network.train(&windows, &labels).unwrap();

        for value in network.predict(&windows) {
            assert!(value.is_finite());
        }
    }

    #[test]
    fn rejects_zero_layers() {
        let config = LstmConfig {
            num_layers: 0,
            ..LstmConfig::default()
        };
        assert!(LstmNetwork::new(config).is_err());
    }

    #[test]
    fn seeded_networks_agree() {
        let config = small_config();
        let mut a = LstmNetwork::new(config.clone()).unwrap();
        let mut b = LstmNetwork::new(config).unwrap();

        let window = vec![0.3; 7];
        assert_eq!(a.predict_one(&window), b.predict_one(&window));
    }
}
