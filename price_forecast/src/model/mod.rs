//! Recurrent network used for next-step price prediction
//!
//! The architecture is fixed by configuration, not tuned per series: a
//! stack of LSTM layers with interleaved dropout feeding a single linear
//! output unit, trained on mean-squared error for a fixed number of epochs.

use serde::{Deserialize, Serialize};

mod lstm;

pub use lstm::{LstmCell, LstmNetwork};

/// Hyperparameters of the recurrent network.
///
/// The defaults reproduce the production configuration: 4 LSTM layers of
/// width 50 with 0.1 dropout, 25 epochs, batch size 32. They are
/// configuration defaults, not per-series tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LstmConfig {
    /// Number of input features per time step
    pub input_size: usize,
    /// Width of each recurrent layer
    pub hidden_size: usize,
    /// Number of stacked recurrent layers
    pub num_layers: usize,
    /// Dropout applied between layers during training
    pub dropout: f64,
    /// Fixed number of training epochs
    pub epochs: usize,
    /// Mini-batch size
    pub batch_size: usize,
    /// Gradient-descent step size for the readout
    pub learning_rate: f64,
    /// RNG seed for reproducible weight init and dropout masks
    pub seed: Option<u64>,
}

impl Default for LstmConfig {
    fn default() -> Self {
        Self {
            input_size: 1,
            hidden_size: 50,
            num_layers: 4,
            dropout: 0.1,
            epochs: 25,
            batch_size: 32,
            learning_rate: 0.05,
            seed: None,
        }
    }
}

impl LstmConfig {
    /// Override the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
