//! Affine standardization and its inverse.
//!
//! Sequences are standardized to zero mean and unit variance before training
//! so the cell operates on a consistent scale, and predictions are mapped
//! back to the original scale for reporting. Statistics are population
//! statistics (divide by N, not N−1), and the divisor carries an epsilon
//! guard so constant sequences standardize to zeros instead of NaN.

use serde::{Deserialize, Serialize};

/// Guard added to the standard deviation before dividing, so zero-variance
/// sequences are handled internally rather than surfaced as errors.
pub const NORM_EPSILON: f64 = 1e-8;

/// Mean and standard deviation captured at standardization time.
///
/// The caller must retain these to invert any prediction back to the
/// original scale; passing stats from a different sequence produces
/// undefined (but finite) results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormStats {
    /// Population mean of the original sequence.
    pub mean: f64,
    /// Population standard deviation of the original sequence.
    pub std: f64,
}

/// Standardizes `data` in place and returns the statistics used.
///
/// Each element is mapped `v ↦ (v − mean) / (std + ε)`. An empty slice
/// yields zero statistics and is left untouched.
#[must_use = "the returned statistics are required to invert the transform"]
pub fn standardize(data: &mut [f64]) -> NormStats {
    if data.is_empty() {
        return NormStats { mean: 0.0, std: 0.0 };
    }

    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let variance = data.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let std = variance.sqrt();

    for v in data.iter_mut() {
        *v = (*v - mean) / (std + NORM_EPSILON);
    }

    NormStats { mean, std }
}

/// Applies the inverse map `v ↦ v·std + mean` in place.
pub fn destandardize(data: &mut [f64], stats: NormStats) {
    for v in data.iter_mut() {
        *v = *v * stats.std + stats.mean;
    }
}
