//! Training configuration files.
//!
//! ```json
//! {
//!   "units": [
//!     { "size": 2 },
//!     { "size": 4, "activation": "tanh" },
//!     { "size": 1, "activation": "sigmoid" }
//!   ],
//!   "learning_rate": 0.5,
//!   "epochs": 2000,
//!   "weights": { "path": "xor.weights", "format": "text" },
//!   "init": { "low": -1.0, "high": 1.0, "seed": 42 }
//! }
//! ```

use crate::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightsFormat {
    #[default]
    Text,
    Binary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightsConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub format: WeightsFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Layers, input first; validated like any other topology.
    pub units: Topology,

    pub learning_rate: f64,

    #[serde(default = "default_epochs")]
    pub epochs: usize,

    /// Where weights are loaded from and saved to. Without it every run
    /// starts from the initializer and nothing is written.
    #[serde(default)]
    pub weights: Option<WeightsConfig>,

    #[serde(default)]
    pub init: UniformInitializer,
}

fn default_epochs() -> usize {
    1
}

impl TrainingConfig {
    pub fn topology(&self) -> Topology {
        self.units.clone()
    }

    /// Loads the network described by this config, from its weights file when
    /// there is one.
    pub fn network(&self) -> Result<Network> {
        match &self.weights {
            Some(WeightsConfig { path, format: WeightsFormat::Text }) => {
                TextFilePersistence::new(path).load(self.topology(), &self.init)
            }
            Some(WeightsConfig { path, format: WeightsFormat::Binary }) => {
                BinaryPersistence::new(path).load(self.topology(), &self.init)
            }
            None => Network::new(self.topology(), None, &self.init),
        }
    }

    /// Persists `network` to the configured weights file, if any.
    pub fn save(&self, network: &Network) -> Result<bool> {
        match &self.weights {
            Some(WeightsConfig { path, format: WeightsFormat::Text }) => {
                TextFilePersistence::new(path).save(network)?;
                Ok(true)
            }
            Some(WeightsConfig { path, format: WeightsFormat::Binary }) => {
                BinaryPersistence::new(path).save(network)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Reads and validates a JSON training configuration.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TrainingConfig> {
    let contents = fs::read_to_string(path)?;
    let config: TrainingConfig = serde_json::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &TrainingConfig) -> Result<()> {
    if !(config.learning_rate.is_finite() && config.learning_rate > 0.0) {
        return Err(NNError::InvalidConfiguration(format!(
            "learning_rate must be positive (got {})",
            config.learning_rate
        )));
    }

    let init = &config.init;
    if !(init.low.is_finite() && init.high.is_finite() && init.low < init.high) {
        return Err(NNError::InvalidConfiguration(format!(
            "init bounds must satisfy low < high (got {} and {})",
            init.low, init.high
        )));
    }

    Ok(())
}
