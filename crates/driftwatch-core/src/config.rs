#![forbid(unsafe_code)]

//! Detector configuration.
//!
//! ```text
//! DetectorConfig {
//!     window_size: 30,   // N, samples retained by the rolling window
//!     alpha: 0.3,        // EWMA smoothing factor, (0, 1]
//!     z_threshold: 3.0,  // |z| strictly above this is anomalous
//! }
//! ```
//!
//! With population statistics a single sample can sit at most `sqrt(N - 1)`
//! standard deviations from the mean of a window that contains it, so
//! `z_threshold` must stay below that bound for anything to be flagged.

use std::num::NonZeroUsize;

use crate::error::{ConfigError, ConfigResult};

/// Default rolling window size.
pub const DEFAULT_WINDOW_SIZE: usize = 30;

/// Default EWMA smoothing factor.
pub const DEFAULT_ALPHA: f64 = 0.3;

/// Default z-score threshold.
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Configuration for [`AnomalyDetector`](crate::AnomalyDetector).
///
/// Supplied once at construction and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    /// Number of recent samples the rolling window retains.
    /// Default: 30
    pub window_size: usize,

    /// EWMA smoothing factor. Close to 1 tracks almost instantly,
    /// close to 0 is nearly static.
    /// Default: 0.3
    pub alpha: f64,

    /// Absolute z-score above which a sample is anomalous.
    /// Default: 3.0
    pub z_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            alpha: DEFAULT_ALPHA,
            z_threshold: DEFAULT_Z_THRESHOLD,
        }
    }
}

impl DetectorConfig {
    /// Create a configuration from explicit parameters.
    #[must_use]
    pub const fn new(window_size: usize, alpha: f64, z_threshold: f64) -> Self {
        Self {
            window_size,
            alpha,
            z_threshold,
        }
    }

    /// Set the rolling window size.
    #[must_use]
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the EWMA smoothing factor.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the z-score threshold.
    #[must_use]
    pub fn with_z_threshold(mut self, z_threshold: f64) -> Self {
        self.z_threshold = z_threshold;
        self
    }

    /// Check every parameter, reporting the first violation.
    pub fn validate(&self) -> ConfigResult<()> {
        self.window_capacity()?;
        validate_alpha(self.alpha)?;
        if !(self.z_threshold.is_finite() && self.z_threshold > 0.0) {
            return Err(ConfigError::InvalidZThreshold(self.z_threshold));
        }
        Ok(())
    }

    /// Window size as a non-zero capacity.
    pub fn window_capacity(&self) -> ConfigResult<NonZeroUsize> {
        NonZeroUsize::new(self.window_size).ok_or(ConfigError::InvalidWindowSize(self.window_size))
    }

    /// Largest |z| a single sample can reach against its own window.
    ///
    /// Equals `sqrt(window_size - 1)` under population statistics.
    #[must_use]
    pub fn max_attainable_z(&self) -> f64 {
        (self.window_size.saturating_sub(1) as f64).sqrt()
    }
}

/// Alpha must lie in (0, 1]; NaN fails both comparisons.
pub(crate) fn validate_alpha(alpha: f64) -> ConfigResult<f64> {
    if alpha > 0.0 && alpha <= 1.0 {
        Ok(alpha)
    } else {
        Err(ConfigError::InvalidAlpha(alpha))
    }
}
