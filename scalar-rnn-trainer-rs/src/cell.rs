//! Single-unit recurrent cell with fixed-capacity timestep caches.
//!
//! The cell holds exactly five scalar parameters — input weight, recurrent
//! weight, output weight, and two biases — reused identically at every
//! timestep. The recurrent state is a single scalar broadcast across time;
//! capacity sizes the per-timestep caches, not a hidden vector.
//!
//! Forward passes overwrite the caches, which the trainer's backward pass
//! reads. Caches are allocated once at construction and never grown, so a
//! sequence longer than the capacity is rejected rather than truncated.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{TrainError, TrainResult};

/// Read-only snapshot of the five trainable scalars.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CellParameters {
    /// Input weight.
    pub w_in: f64,
    /// Recurrent weight.
    pub w_rec: f64,
    /// Output weight.
    pub w_out: f64,
    /// Pre-activation bias.
    pub b_in: f64,
    /// Output bias.
    pub b_out: f64,
}

/// Single-unit recurrent cell.
///
/// The recurrence at each timestep `t` is
///
/// ```text
/// preact[t] = w_in·x[t] + w_rec·h[t] + b_in
/// h[t+1]    = tanh(preact[t])            (dropout in training mode)
/// y[t]      = w_out·h[t+1] + b_out
/// ```
///
/// `h[0]` is reset to zero at the start of every forward call; the cell
/// carries no state across independent invocations.
#[derive(Debug, Clone)]
pub struct RecurrentCell {
    pub(crate) w_in: f64,
    pub(crate) w_rec: f64,
    pub(crate) w_out: f64,
    pub(crate) b_in: f64,
    pub(crate) b_out: f64,

    /// Hidden state cache; `h[0]` is the initial state, so length is
    /// `capacity + 1`.
    pub(crate) h: Vec<f64>,
    /// Pre-activation cache.
    pub(crate) preact: Vec<f64>,
    /// Input cache.
    pub(crate) x_cache: Vec<f64>,
    /// Prediction cache.
    pub(crate) y_pred: Vec<f64>,

    /// Timesteps covered by the most recent forward pass.
    pub(crate) len: usize,

    capacity: usize,
    dropout_rate: f64,
    rng: StdRng,
}

/// Allocates a zeroed cache buffer, surfacing allocation failure as an error
/// instead of aborting the process.
fn alloc_cache(n: usize) -> TrainResult<Vec<f64>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(n).map_err(|e| TrainError::Allocation {
        detail: e.to_string(),
    })?;
    buf.resize(n, 0.0);
    Ok(buf)
}

/// Draws one Xavier-uniform value: `U(−r, r)` with `r = sqrt(6/(fan_in+fan_out))`.
fn xavier(rng: &mut StdRng, fan_in: usize, fan_out: usize) -> f64 {
    let range = (6.0 / (fan_in + fan_out) as f64).sqrt();
    rng.random_range(-range..range)
}

impl RecurrentCell {
    /// Creates a cell sized for sequences of at most `capacity` timesteps.
    ///
    /// Weights are Xavier-initialized with fan shapes `(1, capacity)`,
    /// `(capacity, capacity)` and `(capacity, 1)`; both biases start at zero.
    /// The RNG is seeded explicitly so initialization and dropout are
    /// reproducible.
    ///
    /// # Errors
    ///
    /// - [`TrainError::Config`] if `capacity` is zero or `dropout_rate` is
    ///   outside `[0, 1)`.
    /// - [`TrainError::Allocation`] if the timestep caches cannot be
    ///   allocated.
    pub fn new(capacity: usize, dropout_rate: f64, seed: u64) -> TrainResult<Self> {
        if capacity == 0 {
            return Err(TrainError::Config {
                detail: "cell capacity must be > 0".to_string(),
            });
        }
        if !(0.0..1.0).contains(&dropout_rate) {
            return Err(TrainError::Config {
                detail: "dropout_rate must be in [0, 1)".to_string(),
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let w_in = xavier(&mut rng, 1, capacity);
        let w_rec = xavier(&mut rng, capacity, capacity);
        let w_out = xavier(&mut rng, capacity, 1);

        Ok(Self {
            w_in,
            w_rec,
            w_out,
            b_in: 0.0,
            b_out: 0.0,
            h: alloc_cache(capacity + 1)?,
            preact: alloc_cache(capacity)?,
            x_cache: alloc_cache(capacity)?,
            y_pred: alloc_cache(capacity)?,
            len: 0,
            capacity,
            dropout_rate,
            rng,
        })
    }

    /// Runs the recurrence over `input` and returns the predictions.
    ///
    /// With `training` set, each hidden activation is zeroed with probability
    /// `dropout_rate` and otherwise scaled by `1/(1 − dropout_rate)`
    /// (inverted dropout). Inference passes (`training == false`) never apply
    /// dropout and are deterministic for fixed parameters.
    ///
    /// Overwrites all caches for indices `[0, input.len())`.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::CapacityExceeded`] if the sequence is longer
    /// than the cell capacity; nothing is truncated silently.
    pub fn forward(&mut self, input: &[f64], training: bool) -> TrainResult<&[f64]> {
        if input.len() > self.capacity {
            return Err(TrainError::CapacityExceeded {
                requested: input.len(),
                capacity: self.capacity,
            });
        }

        self.h[0] = 0.0;

        for (t, &x) in input.iter().enumerate() {
            self.x_cache[t] = x;
            self.preact[t] = self.w_in * x + self.w_rec * self.h[t] + self.b_in;

            let mut hidden = self.preact[t].tanh();
            if training && self.dropout_rate > 0.0 {
                if self.rng.random::<f64>() < self.dropout_rate {
                    hidden = 0.0;
                } else {
                    hidden /= 1.0 - self.dropout_rate;
                }
            }
            self.h[t + 1] = hidden;

            self.y_pred[t] = self.w_out * hidden + self.b_out;
        }

        self.len = input.len();
        Ok(&self.y_pred[..self.len])
    }

    /// The five trained parameter values.
    #[must_use]
    pub fn parameters(&self) -> CellParameters {
        CellParameters {
            w_in: self.w_in,
            w_rec: self.w_rec,
            w_out: self.w_out,
            b_in: self.b_in,
            b_out: self.b_out,
        }
    }

    /// Predictions from the most recent forward pass.
    #[must_use]
    pub fn predictions(&self) -> &[f64] {
        &self.y_pred[..self.len]
    }

    /// Maximum sequence length the caches are sized for.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Training-time dropout probability.
    #[must_use]
    pub fn dropout_rate(&self) -> f64 {
        self.dropout_rate
    }
}
