//! Error types for scalar recurrent training.
//!
//! Errors are designed to be actionable: each variant carries the context a
//! caller needs to decide between resizing, truncating, or aborting.
//!
//! # Error Categories
//!
//! - **Capacity errors**: a sequence exceeds the cell's fixed cache capacity.
//!   Recoverable — the caller can split the sequence or construct a larger cell.
//! - **Allocation errors**: cache memory could not be obtained at construction.
//!   Fatal for the construction attempt; no partially-built cell is returned.
//! - **Numerical errors**: a non-finite loss or gradient was observed. The
//!   trainer reports these instead of letting NaN propagate through the
//!   optimizer state.
//! - **Configuration errors**: invalid hyperparameters, rejected up front.

use thiserror::Error;

/// The main error type for training and inference.
#[derive(Debug, Error)]
pub enum TrainError {
    /// A sequence was longer than the cell's cache capacity.
    ///
    /// Timestep caches are allocated once at construction and never grown
    /// mid-run. The caller must construct a larger cell or split the input.
    #[error("sequence length {requested} exceeds cell capacity {capacity}")]
    CapacityExceeded {
        /// The offered sequence length.
        requested: usize,
        /// The capacity the caches were sized for.
        capacity: usize,
    },

    /// Timestep cache memory could not be allocated at construction.
    #[error("cache allocation failed: {detail}")]
    Allocation {
        /// Description of the allocation failure.
        detail: String,
    },

    /// Input and target sequences have different lengths.
    #[error("input length {input} does not match target length {target}")]
    LengthMismatch {
        /// Length of the input sequence.
        input: usize,
        /// Length of the target sequence.
        target: usize,
    },

    /// A non-finite loss or gradient was detected.
    ///
    /// Gradient clipping bounds magnitudes but does not validate inputs; a
    /// divergent loss upstream of clipping would otherwise flow as NaN into
    /// the optimizer moments and poison the run silently.
    #[error("numerical instability at epoch {epoch}: {detail}")]
    NumericalInstability {
        /// Epoch at which the non-finite value was observed.
        epoch: usize,
        /// Which quantity went non-finite.
        detail: String,
    },

    /// Invalid configuration value.
    #[error("configuration error: {detail}")]
    Config {
        /// Description of the configuration issue.
        detail: String,
    },
}

/// Result alias used throughout the crate.
pub type TrainResult<T> = Result<T, TrainError>;
