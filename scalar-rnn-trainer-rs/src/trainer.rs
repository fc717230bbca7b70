//! Backpropagation through time and the epoch-level training loop.
//!
//! The trainer owns one [`RecurrentCell`] and five [`Adam`] instances, one
//! per scalar parameter. Each epoch runs a forward pass over the (already
//! standardized) input, scores mean squared error against the target,
//! consults the early-stopping controller and then applies one BPTT update.
//!
//! Gradients are accumulated in reverse time order — credit assigned at the
//! output at time `t` flows back through the recurrent weight to `t − 1` —
//! then each of the five gradients is independently hard-clamped before its
//! optimizer update. A non-finite loss or gradient aborts the run with
//! [`TrainError::NumericalInstability`] instead of poisoning the optimizer
//! moments.

use serde::{Deserialize, Serialize};

use crate::cell::RecurrentCell;
use crate::config::TrainerConfig;
use crate::early_stopping::EarlyStopping;
use crate::error::{TrainError, TrainResult};
use crate::optimizer::Adam;

/// Why a training run halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The loss failed to improve for `patience` consecutive epochs.
    PatienceExhausted,
    /// The configured epoch budget was reached.
    EpochLimit,
}

/// Summary of a completed training run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainReport {
    /// Number of epochs actually run.
    pub epochs: usize,
    /// Loss of the final epoch (on the standardized scale).
    pub final_loss: f64,
    /// Best epoch loss observed during the run.
    pub best_loss: f64,
    /// Why the run halted.
    pub stop_reason: StopReason,
}

/// Hard clamp of a single gradient to `[-limit, +limit]`.
fn clip(grad: f64, limit: f64) -> f64 {
    grad.clamp(-limit, limit)
}

/// BPTT trainer for a single-unit recurrent cell.
pub struct Trainer {
    cell: RecurrentCell,
    config: TrainerConfig,
    opt_w_in: Adam,
    opt_w_rec: Adam,
    opt_w_out: Adam,
    opt_b_in: Adam,
    opt_b_out: Adam,
    loss_history: Vec<f64>,
}

impl Trainer {
    /// Creates a trainer with a freshly initialized cell.
    ///
    /// `capacity` fixes the maximum sequence length for the lifetime of the
    /// trainer; `seed` makes initialization and dropout reproducible.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::Config`] for an invalid configuration and
    /// [`TrainError::Allocation`] if the cell caches cannot be allocated.
    pub fn new(capacity: usize, config: TrainerConfig, seed: u64) -> TrainResult<Self> {
        config.validate()?;
        let cell = RecurrentCell::new(capacity, config.dropout_rate, seed)?;
        let adam = config.adam;

        Ok(Self {
            cell,
            config,
            opt_w_in: Adam::new(adam),
            opt_w_rec: Adam::new(adam),
            opt_w_out: Adam::new(adam),
            opt_b_in: Adam::new(adam),
            opt_b_out: Adam::new(adam),
            loss_history: Vec::new(),
        })
    }

    /// Accumulates the five parameter gradients from the cached forward
    /// pass, iterating timesteps in reverse.
    ///
    /// Order: `[w_in, w_rec, w_out, b_in, b_out]`. The loss being
    /// differentiated is the summed squared error over the sequence. The
    /// tanh derivative is taken on the stored hidden value `h[t+1]`; with
    /// dropout enabled that value carries the dropout scaling, so the
    /// gradient is exact only when training-time dropout is disabled.
    fn accumulate_gradients(&self, target: &[f64]) -> [f64; 5] {
        let cell = &self.cell;
        let n = cell.len;

        let mut g_w_in = 0.0;
        let mut g_w_rec = 0.0;
        let mut g_w_out = 0.0;
        let mut g_b_in = 0.0;
        let mut g_b_out = 0.0;

        // Gradient flowing back from timestep t+1; zero at the last timestep.
        let mut dh_next = 0.0;

        for t in (0..n).rev() {
            let dl_dy = 2.0 * (cell.y_pred[t] - target[t]);

            g_w_out += dl_dy * cell.h[t + 1];
            g_b_out += dl_dy;

            let dh = dl_dy * cell.w_out + dh_next;
            let dh_raw = dh * (1.0 - cell.h[t + 1] * cell.h[t + 1]);

            g_b_in += dh_raw;
            g_w_rec += dh_raw * cell.h[t];
            g_w_in += dh_raw * cell.x_cache[t];

            dh_next = dh_raw * cell.w_rec;
        }

        [g_w_in, g_w_rec, g_w_out, g_b_in, g_b_out]
    }

    /// Runs one backward pass against `target` and updates all five
    /// parameters.
    ///
    /// Requires the caches populated by a forward pass over a sequence of
    /// the same length.
    ///
    /// # Errors
    ///
    /// - [`TrainError::LengthMismatch`] if `target` does not match the
    ///   length of the latest forward pass.
    /// - [`TrainError::NumericalInstability`] if any accumulated gradient is
    ///   non-finite. The error's `epoch` field is an index into
    ///   [`loss_history`](Self::loss_history): the most recent recorded
    ///   epoch, or 0 when no epoch has been recorded yet. Callers driving
    ///   the pass manually outside [`train`](Self::train) should read it as
    ///   that history index, not as a count of their own calls.
    pub fn backward(&mut self, target: &[f64]) -> TrainResult<()> {
        let epoch = self.loss_history.len().saturating_sub(1);
        self.backward_at(target, epoch)
    }

    fn backward_at(&mut self, target: &[f64], epoch: usize) -> TrainResult<()> {
        if target.len() != self.cell.len {
            return Err(TrainError::LengthMismatch {
                input: self.cell.len,
                target: target.len(),
            });
        }

        let grads = self.accumulate_gradients(target);
        let names = ["w_in", "w_rec", "w_out", "b_in", "b_out"];
        for (name, grad) in names.iter().zip(grads.iter()) {
            if !grad.is_finite() {
                return Err(TrainError::NumericalInstability {
                    epoch,
                    detail: format!("non-finite {name} gradient"),
                });
            }
        }

        let limit = self.config.clip_value;
        let lr = self.config.learning_rate;

        self.opt_w_in
            .update(&mut self.cell.w_in, clip(grads[0], limit), lr);
        self.opt_w_rec
            .update(&mut self.cell.w_rec, clip(grads[1], limit), lr);
        self.opt_w_out
            .update(&mut self.cell.w_out, clip(grads[2], limit), lr);
        self.opt_b_in
            .update(&mut self.cell.b_in, clip(grads[3], limit), lr);
        self.opt_b_out
            .update(&mut self.cell.b_out, clip(grads[4], limit), lr);

        Ok(())
    }

    /// Trains the cell on one input/target pair until the epoch budget or
    /// the patience threshold is reached.
    ///
    /// Both sequences are expected on the standardized scale; losses in the
    /// report and history are mean squared errors on that scale. A run
    /// halted by patience stops before applying the backward pass of the
    /// halting epoch.
    ///
    /// # Errors
    ///
    /// - [`TrainError::LengthMismatch`] if the sequences differ in length.
    /// - [`TrainError::CapacityExceeded`] if they exceed the cell capacity.
    /// - [`TrainError::NumericalInstability`] if the loss or a gradient goes
    ///   non-finite; the history up to the failing epoch is retained for
    ///   inspection.
    pub fn train(&mut self, input: &[f64], target: &[f64]) -> TrainResult<TrainReport> {
        if input.len() != target.len() {
            return Err(TrainError::LengthMismatch {
                input: input.len(),
                target: target.len(),
            });
        }
        if input.is_empty() {
            return Err(TrainError::Config {
                detail: "training sequences must be non-empty".to_string(),
            });
        }

        self.loss_history.clear();
        let mut stopper = EarlyStopping::new(self.config.patience);
        let mut stop_reason = StopReason::EpochLimit;

        for epoch in 0..self.config.max_epochs {
            let predictions = self.cell.forward(input, true)?;
            let mse = predictions
                .iter()
                .zip(target.iter())
                .map(|(&y, &t)| (y - t) * (y - t))
                .sum::<f64>()
                / target.len() as f64;

            if !mse.is_finite() {
                return Err(TrainError::NumericalInstability {
                    epoch,
                    detail: "non-finite epoch loss".to_string(),
                });
            }

            self.loss_history.push(mse);

            if stopper.observe(mse) {
                stop_reason = StopReason::PatienceExhausted;
                tracing::info!(epoch, loss = mse, "early stop: patience exhausted");
                break;
            }

            self.backward_at(target, epoch)?;

            if epoch % 500 == 0 {
                tracing::debug!(
                    epoch,
                    loss = mse,
                    best = stopper.best_loss(),
                    "training progress"
                );
            }
        }

        let report = TrainReport {
            epochs: self.loss_history.len(),
            final_loss: self.loss_history.last().copied().unwrap_or(f64::INFINITY),
            best_loss: stopper.best_loss(),
            stop_reason,
        };
        tracing::info!(
            epochs = report.epochs,
            best_loss = report.best_loss,
            reason = ?report.stop_reason,
            "training run finished"
        );
        Ok(report)
    }

    /// Runs the trained cell on `input` without dropout and returns the
    /// predictions.
    ///
    /// # Errors
    ///
    /// Returns [`TrainError::CapacityExceeded`] for over-long sequences.
    pub fn predict(&mut self, input: &[f64]) -> TrainResult<&[f64]> {
        self.cell.forward(input, false)
    }

    /// The underlying cell (read access to parameters and predictions).
    #[must_use]
    pub fn cell(&self) -> &RecurrentCell {
        &self.cell
    }

    /// Per-epoch losses of the most recent run.
    #[must_use]
    pub fn loss_history(&self) -> &[f64] {
        &self.loss_history
    }

    /// The configuration this trainer was built with.
    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }
}
