//! Early-stopping control for the training loop.
//!
//! The canonical mechanism is a patience counter: a strict improvement over
//! the best loss seen so far resets the counter, anything else increments
//! it, and reaching the patience threshold halts the run. An alternate
//! formulation — scanning the trailing window of the loss history for any
//! improvement — is kept as an independent pure function for callers that
//! want to cross-check, but nothing in the training loop invokes it.

/// Patience-counter early-stopping state machine.
///
/// With a plateau whose value is first attained at epoch `p`, the counter
/// reaches the threshold exactly `patience` epochs later, so the run halts
/// at epoch `p + patience`.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    best_loss: f64,
    patience_counter: usize,
    patience: usize,
}

impl EarlyStopping {
    /// Creates a controller that halts after `patience` consecutive
    /// non-improving epochs.
    #[must_use]
    pub fn new(patience: usize) -> Self {
        Self {
            best_loss: f64::INFINITY,
            patience_counter: 0,
            patience,
        }
    }

    /// Records one epoch's loss and reports whether the run should halt.
    ///
    /// A loss strictly below the best seen so far resets the counter;
    /// otherwise the counter increments, and reaching the patience threshold
    /// returns `true`.
    pub fn observe(&mut self, loss: f64) -> bool {
        if loss < self.best_loss {
            self.best_loss = loss;
            self.patience_counter = 0;
            false
        } else {
            self.patience_counter += 1;
            self.patience_counter >= self.patience
        }
    }

    /// Best loss observed so far (`+inf` before the first observation).
    #[must_use]
    pub fn best_loss(&self) -> f64 {
        self.best_loss
    }

    /// Consecutive non-improving epochs observed so far.
    #[must_use]
    pub fn patience_counter(&self) -> usize {
        self.patience_counter
    }
}

/// Alternate trailing-window check: did the loss strictly improve at least
/// once within the last `patience` epochs of `history`?
///
/// Improvement is measured against the loss recorded just before the window.
/// Histories shorter than `patience + 1` epochs always report improvement,
/// since no full window exists yet.
#[must_use]
pub fn improved_within_window(history: &[f64], patience: usize) -> bool {
    let epoch = history.len();
    if epoch < patience + 1 {
        return true;
    }

    let reference = history[epoch - patience - 1];
    history[epoch - patience..].iter().any(|&loss| loss < reference)
}
