//! Per-parameter Adam optimizer state.
//!
//! Each trainable scalar owns its own [`Adam`] instance. Bias correction
//! uses the instance's own step count, so the counters must never be shared
//! across parameters — a shared counter would skew the correction for every
//! parameter but the one that actually stepped.

use crate::config::AdamConfig;

/// Adaptive moment estimation state for a single scalar parameter.
#[derive(Debug, Clone)]
pub struct Adam {
    config: AdamConfig,
    /// First moment (exponential moving average of the gradient).
    m: f64,
    /// Second moment (exponential moving average of the squared gradient).
    v: f64,
    /// Number of updates applied through this instance.
    t: u32,
}

impl Adam {
    /// Creates a fresh optimizer instance with zeroed moments.
    #[must_use]
    pub fn new(config: AdamConfig) -> Self {
        Self {
            config,
            m: 0.0,
            v: 0.0,
            t: 0,
        }
    }

    /// Applies one Adam update to `param` with the given gradient.
    ///
    /// The bias-corrected step is
    /// `param -= lr · m̂ / (sqrt(v̂) + ε)` with
    /// `m̂ = m / (1 − β1^t)` and `v̂ = v / (1 − β2^t)`.
    pub fn update(&mut self, param: &mut f64, grad: f64, lr: f64) {
        let c = self.config;

        self.t += 1;
        self.m = c.beta1 * self.m + (1.0 - c.beta1) * grad;
        self.v = c.beta2 * self.v + (1.0 - c.beta2) * grad * grad;

        let m_hat = self.m / (1.0 - c.beta1.powi(self.t as i32));
        let v_hat = self.v / (1.0 - c.beta2.powi(self.t as i32));

        *param -= lr * m_hat / (v_hat.sqrt() + c.epsilon);
    }

    /// Number of updates applied through this instance.
    #[must_use]
    pub fn step_count(&self) -> u32 {
        self.t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adam() -> Adam {
        Adam::new(AdamConfig::default())
    }

    #[test]
    fn test_first_step_bias_correction_cancels() {
        // On the first update m̂ = g and v̂ = g² exactly, so the step size
        // is lr · g / (|g| + ε) regardless of the beta choice.
        let g = 0.37;
        let lr = 0.005;

        let mut param_default = 1.0;
        adam().update(&mut param_default, g, lr);

        let mut param_other = 1.0;
        let mut other = Adam::new(AdamConfig {
            beta1: 0.5,
            beta2: 0.7,
            epsilon: 1e-8,
        });
        other.update(&mut param_other, g, lr);

        assert!(
            (param_default - param_other).abs() < 1e-12,
            "first step must be independent of beta1/beta2: {param_default} vs {param_other}"
        );

        let expected = 1.0 - lr * g / (g.abs() + 1e-8);
        assert!((param_default - expected).abs() < 1e-12);
    }

    #[test]
    fn test_step_counter_increments() {
        let mut opt = adam();
        let mut param = 0.0;
        assert_eq!(opt.step_count(), 0);

        for expected in 1..=5 {
            opt.update(&mut param, 1.0, 0.01);
            assert_eq!(opt.step_count(), expected);
        }
    }

    #[test]
    fn test_independent_instances_keep_independent_counters() {
        let mut a = adam();
        let mut b = adam();
        let mut pa = 0.0;
        let mut pb = 0.0;

        for _ in 0..3 {
            a.update(&mut pa, 1.0, 0.01);
        }
        b.update(&mut pb, 1.0, 0.01);

        assert_eq!(a.step_count(), 3);
        assert_eq!(b.step_count(), 1);
    }

    #[test]
    fn test_constant_gradient_pushes_param_down() {
        let mut opt = adam();
        let mut param = 1.0;

        for _ in 0..100 {
            opt.update(&mut param, 1.0, 0.01);
        }

        assert!(
            param < 1.0,
            "constant positive gradient should decrease the parameter: {param}"
        );
    }

    #[test]
    fn test_zero_gradient_leaves_param_unchanged() {
        let mut opt = adam();
        let mut param = 0.5;

        opt.update(&mut param, 0.0, 0.01);
        assert_eq!(param, 0.5);
    }
}
