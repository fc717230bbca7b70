//! # scalar-rnn-trainer-rs
//!
//! A minimal recurrent sequence predictor trained by gradient descent: a
//! single-unit recurrent cell with five scalar parameters, hand-derived
//! backpropagation through time (BPTT), per-parameter Adam optimizers, hard
//! gradient clipping, affine data standardization and patience-based early
//! stopping.
//!
//! ## Overview
//!
//! The cell's recurrent state is one scalar broadcast across time; the
//! "size" of the cell fixes the capacity of its per-timestep caches, not a
//! hidden vector. That makes the whole learning engine small enough to be
//! written out explicitly — the forward recurrence, the reverse-time
//! gradient accumulation and the optimizer updates are all plain `f64`
//! arithmetic with no autodiff framework behind them.
//!
//! ## Training pipeline
//!
//! ```text
//! raw sequence ──▶ standardize ──▶ forward ──▶ MSE loss ──▶ early stop?
//!                                    ▲                         │
//!                                    └──── Adam ◀── clip ◀── BPTT
//! ```
//!
//! After training, the same forward pass (with dropout disabled) serves as
//! the inference primitive, and predictions are mapped back to the original
//! scale with the retained normalization statistics.
//!
//! ## Quick Start
//!
//! ```rust
//! use scalar_rnn_trainer_rs::{
//!     config::TrainerConfig,
//!     normalize::{destandardize, standardize},
//!     trainer::Trainer,
//! };
//!
//! # fn main() -> Result<(), scalar_rnn_trainer_rs::error::TrainError> {
//! let mut input = vec![1.0, 2.0, 3.0, 4.0];
//! let mut target = vec![2.0, 3.0, 4.0, 5.0];
//! standardize(&mut input);
//! let target_stats = standardize(&mut target);
//!
//! let config = TrainerConfig::builder().max_epochs(200).build();
//! let mut trainer = Trainer::new(input.len(), config, 42)?;
//! let report = trainer.train(&input, &target)?;
//! assert!(report.final_loss.is_finite());
//!
//! let mut predicted = trainer.predict(&input)?.to_vec();
//! destandardize(&mut predicted, target_stats);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - Hyperparameters, validation and TOML serialization
//! - [`error`] - Error taxonomy with capacity/allocation/instability variants
//! - [`normalize`] - Affine standardization and its inverse
//! - [`cell`] - The single-unit recurrent cell and its timestep caches
//! - [`optimizer`] - Per-parameter Adam state
//! - [`trainer`] - BPTT gradients, clipping and the epoch loop
//! - [`early_stopping`] - Patience controller and trailing-window check

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]
// Allow precision loss casts - acceptable in ML numerical code
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::missing_errors_doc)]

pub mod cell;
pub mod config;
pub mod early_stopping;
pub mod error;
pub mod normalize;
pub mod optimizer;
pub mod trainer;

// Re-exports for convenient access
pub use cell::{CellParameters, RecurrentCell};
pub use config::{AdamConfig, TrainerConfig};
pub use early_stopping::EarlyStopping;
pub use error::{TrainError, TrainResult};
pub use normalize::{destandardize, standardize, NormStats};
pub use optimizer::Adam;
pub use trainer::{StopReason, TrainReport, Trainer};
