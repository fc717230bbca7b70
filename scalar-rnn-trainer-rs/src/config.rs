//! Training configuration.
//!
//! The configuration system is designed to be:
//! - **Serializable** - Load/save configurations from TOML files
//! - **Validated** - Invalid configurations are rejected before training
//! - **Defaulted** - The defaults reproduce the reference hyperparameters
//!
//! # Defaults
//!
//! | Parameter | Default | Description |
//! |-----------|---------|-------------|
//! | `learning_rate` | 0.005 | Adam step size |
//! | `max_epochs` | 5000 | Epoch budget per run |
//! | `patience` | 100 | Non-improving epochs before early stop |
//! | `clip_value` | 5.0 | Hard per-gradient clamp bound |
//! | `dropout_rate` | 0.05 | Training-time hidden dropout probability |
//!
//! # Example
//!
//! ```rust
//! use scalar_rnn_trainer_rs::config::TrainerConfig;
//!
//! let config = TrainerConfig::builder()
//!     .learning_rate(0.01)
//!     .max_epochs(2000)
//!     .dropout_rate(0.0)
//!     .build();
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{TrainError, TrainResult};

/// Main configuration for a training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Adam learning rate. Must be > 0.
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    /// Maximum number of training epochs per run. Must be > 0.
    #[serde(default = "default_max_epochs")]
    pub max_epochs: usize,

    /// Number of consecutive non-improving epochs tolerated before the run
    /// halts early. Must be > 0.
    #[serde(default = "default_patience")]
    pub patience: usize,

    /// Hard clamp bound applied independently to each parameter gradient
    /// before the optimizer update. Must be > 0.
    #[serde(default = "default_clip_value")]
    pub clip_value: f64,

    /// Probability of zeroing the hidden activation at each timestep during
    /// training (inverted-dropout scaling keeps the expected magnitude
    /// constant). Must be in `[0, 1)`. Inference never applies dropout.
    #[serde(default = "default_dropout_rate")]
    pub dropout_rate: f64,

    /// Adam moment-estimation hyperparameters.
    #[serde(default)]
    pub adam: AdamConfig,
}

// Default value functions for serde
fn default_learning_rate() -> f64 {
    0.005
}
fn default_max_epochs() -> usize {
    5000
}
fn default_patience() -> usize {
    100
}
fn default_clip_value() -> f64 {
    5.0
}
fn default_dropout_rate() -> f64 {
    0.05
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            learning_rate: default_learning_rate(),
            max_epochs: default_max_epochs(),
            patience: default_patience(),
            clip_value: default_clip_value(),
            dropout_rate: default_dropout_rate(),
            adam: AdamConfig::default(),
        }
    }
}

impl TrainerConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> TrainerConfigBuilder {
        TrainerConfigBuilder::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> TrainResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| TrainError::Config {
            detail: format!("failed to read config file: {e}"),
        })?;

        toml::from_str(&content).map_err(|e| TrainError::Config {
            detail: format!("failed to parse config: {e}"),
        })
    }

    /// Saves configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::Config`] if serialization or writing fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> TrainResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| TrainError::Config {
            detail: format!("failed to serialize config: {e}"),
        })?;

        std::fs::write(path.as_ref(), content).map_err(|e| TrainError::Config {
            detail: format!("failed to write config file: {e}"),
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::Config`] describing the first invalid parameter.
    pub fn validate(&self) -> TrainResult<()> {
        if self.learning_rate <= 0.0 || !self.learning_rate.is_finite() {
            return Err(TrainError::Config {
                detail: "learning_rate must be finite and > 0".to_string(),
            });
        }
        if self.max_epochs == 0 {
            return Err(TrainError::Config {
                detail: "max_epochs must be > 0".to_string(),
            });
        }
        if self.patience == 0 {
            return Err(TrainError::Config {
                detail: "patience must be > 0".to_string(),
            });
        }
        if self.clip_value <= 0.0 || !self.clip_value.is_finite() {
            return Err(TrainError::Config {
                detail: "clip_value must be finite and > 0".to_string(),
            });
        }
        if !(0.0..1.0).contains(&self.dropout_rate) {
            return Err(TrainError::Config {
                detail: "dropout_rate must be in [0, 1)".to_string(),
            });
        }
        self.adam.validate()
    }
}

/// Builder for [`TrainerConfig`].
#[derive(Debug, Default)]
pub struct TrainerConfigBuilder {
    learning_rate: Option<f64>,
    max_epochs: Option<usize>,
    patience: Option<usize>,
    clip_value: Option<f64>,
    dropout_rate: Option<f64>,
    adam: Option<AdamConfig>,
}

impl TrainerConfigBuilder {
    /// Sets the learning rate.
    #[must_use]
    pub fn learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = Some(lr);
        self
    }

    /// Sets the epoch budget.
    #[must_use]
    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = Some(epochs);
        self
    }

    /// Sets the early-stopping patience.
    #[must_use]
    pub fn patience(mut self, patience: usize) -> Self {
        self.patience = Some(patience);
        self
    }

    /// Sets the gradient clamp bound.
    #[must_use]
    pub fn clip_value(mut self, clip: f64) -> Self {
        self.clip_value = Some(clip);
        self
    }

    /// Sets the training-time dropout rate.
    #[must_use]
    pub fn dropout_rate(mut self, rate: f64) -> Self {
        self.dropout_rate = Some(rate);
        self
    }

    /// Sets the Adam hyperparameters.
    #[must_use]
    pub fn adam(mut self, adam: AdamConfig) -> Self {
        self.adam = Some(adam);
        self
    }

    /// Builds the configuration with defaults for unset values.
    #[must_use]
    pub fn build(self) -> TrainerConfig {
        TrainerConfig {
            learning_rate: self.learning_rate.unwrap_or_else(default_learning_rate),
            max_epochs: self.max_epochs.unwrap_or_else(default_max_epochs),
            patience: self.patience.unwrap_or_else(default_patience),
            clip_value: self.clip_value.unwrap_or_else(default_clip_value),
            dropout_rate: self.dropout_rate.unwrap_or_else(default_dropout_rate),
            adam: self.adam.unwrap_or_default(),
        }
    }
}

/// Adam optimizer hyperparameters.
///
/// Shared by the five per-parameter optimizer instances; the moment buffers
/// and step counters themselves are never shared.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdamConfig {
    /// First-moment decay rate.
    #[serde(default = "default_beta1")]
    pub beta1: f64,

    /// Second-moment decay rate.
    #[serde(default = "default_beta2")]
    pub beta2: f64,

    /// Denominator guard added to the square root of the corrected second
    /// moment.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

fn default_beta1() -> f64 {
    0.9
}
fn default_beta2() -> f64 {
    0.999
}
fn default_epsilon() -> f64 {
    1e-8
}

impl Default for AdamConfig {
    fn default() -> Self {
        Self {
            beta1: default_beta1(),
            beta2: default_beta2(),
            epsilon: default_epsilon(),
        }
    }
}

impl AdamConfig {
    /// Validates the Adam hyperparameters.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::Config`] if a beta falls outside `(0, 1)` or
    /// epsilon is not positive.
    pub fn validate(&self) -> TrainResult<()> {
        for (name, beta) in [("beta1", self.beta1), ("beta2", self.beta2)] {
            if !(0.0..1.0).contains(&beta) || beta == 0.0 {
                return Err(TrainError::Config {
                    detail: format!("{name} must be in (0, 1)"),
                });
            }
        }
        if self.epsilon <= 0.0 {
            return Err(TrainError::Config {
                detail: "epsilon must be > 0".to_string(),
            });
        }
        Ok(())
    }
}
