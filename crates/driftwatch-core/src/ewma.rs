#![forbid(unsafe_code)]

//! Exponentially weighted moving mean and variance.
//!
//! # Update Rule
//!
//! ```text
//! first observation x_1:
//!     mean_1 = x_1
//!     var_1  = 0
//!
//! every later observation x_t:
//!     mean_t = α·x_t + (1 − α)·mean_{t−1}
//!     var_t  = α·(x_t − mean_t)² + (1 − α)·var_{t−1}
//! ```
//!
//! The variance term uses the freshly updated `mean_t`, not `mean_{t−1}`.
//! Swapping the two steps changes the numbers, so the order is fixed.
//!
//! # Invariants
//!
//! 1. **Cold start**: after the first update, mean equals that value and
//!    variance is exactly zero.
//! 2. **Non-negative variance**: a convex combination of non-negative terms.
//! 3. **O(1) state**: two scalars plus a counter.

use crate::config::validate_alpha;
use crate::error::ConfigResult;

/// EWMA drift tracker.
#[derive(Debug, Clone)]
pub struct DriftTracker {
    alpha: f64,
    mean: f64,
    variance: f64,
    updates: u64,
}

impl DriftTracker {
    /// Create a tracker with smoothing factor `alpha` in (0, 1].
    pub fn new(alpha: f64) -> ConfigResult<Self> {
        let alpha = validate_alpha(alpha)?;
        Ok(Self {
            alpha,
            mean: 0.0,
            variance: 0.0,
            updates: 0,
        })
    }

    /// Fold one observation into the running estimates.
    pub fn update(&mut self, value: f64) {
        if self.updates == 0 {
            self.mean = value;
            self.variance = 0.0;
        } else {
            let a = self.alpha;
            self.mean = a * value + (1.0 - a) * self.mean;
            let d = value - self.mean;
            self.variance = a * d * d + (1.0 - a) * self.variance;
        }
        self.updates += 1;
    }

    /// Current EWMA mean (`0.0` before the first update).
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Current EWMA variance (`0.0` before the first update).
    #[must_use]
    pub fn variance(&self) -> f64 {
        self.variance
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Whether the cold-start observation has been seen.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.updates > 0
    }

    /// Number of observations folded in so far.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.updates
    }
}
