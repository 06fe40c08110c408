#![forbid(unsafe_code)]

//! Streaming anomaly detector.
//!
//! Composes a [`RollingWindow`] (short-term local deviation) with a
//! [`DriftTracker`] (long-term adaptive baseline) and owns the ordering
//! between them.
//!
//! # Phases
//!
//! ```text
//! WarmingUp ──(window becomes full)──▶ Active
//! ```
//!
//! The transition is one-way. While warming up, a sample is appended to the
//! window, the drift tracker is left untouched and the sample is reported as
//! normal. The sample whose append fills the window is the first one
//! classified by the active rule.
//!
//! # Decision Rule (Active)
//!
//! ```text
//! 1. window.push(x)
//! 2. μ = window.mean(), σ = window.std_dev()
//! 3. z = (x − μ) / σ   if σ > 0
//!    z = 0             otherwise
//! 4. drift.update(x)
//! 5. anomaly = |z| > z_threshold
//! ```
//!
//! Only the window z-score gates the decision. The drift tracker is updated
//! on every active sample and its estimates are reported in
//! [`Classification`], but they do not move the threshold or the baseline.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | σ = 0 (flat window) | z = 0, never anomalous |
//! | NaN in window | σ is NaN, `σ > 0` fails, z = 0, reported normal |
//! | ±Inf sample | IEEE propagation, no special casing |
//! | Invalid config | rejected by [`AnomalyDetector::new`] |

use std::fmt;

use tracing::{debug, trace};

use crate::config::DetectorConfig;
use crate::error::ConfigResult;
use crate::ewma::DriftTracker;
use crate::window::RollingWindow;

/// Lifecycle phase of a detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectorPhase {
    /// Window not yet full; every sample is reported normal.
    #[default]
    WarmingUp,
    /// Window full; samples are scored.
    Active,
}

impl DetectorPhase {
    /// Stable string representation for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WarmingUp => "warming_up",
            Self::Active => "active",
        }
    }
}

impl fmt::Display for DetectorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of scoring one sample, with the statistics behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Zero-based arrival index of the sample.
    pub index: u64,
    /// The sample itself.
    pub value: f64,
    /// Phase in which the sample was handled.
    pub phase: DetectorPhase,
    /// Window mean after the append (active samples only).
    pub window_mean: Option<f64>,
    /// Window population std after the append (active samples only).
    pub window_std: Option<f64>,
    /// Z-score against the window; `0.0` while warming up or when σ = 0.
    pub z_score: f64,
    /// EWMA mean after this sample (active samples only).
    pub ewma_mean: Option<f64>,
    /// EWMA variance after this sample (active samples only).
    pub ewma_var: Option<f64>,
    /// Final decision.
    pub is_anomaly: bool,
}

impl Classification {
    /// One-line summary for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        match (self.window_mean, self.window_std) {
            (Some(mean), Some(std)) => format!(
                "idx={} val={:.3} mean={:.3} std={:.3} z={:.3} ewma={:.3}/{:.3} anomaly={}",
                self.index,
                self.value,
                mean,
                std,
                self.z_score,
                self.ewma_mean.unwrap_or(f64::NAN),
                self.ewma_var.unwrap_or(f64::NAN),
                self.is_anomaly
            ),
            _ => format!(
                "idx={} val={:.3} phase={} anomaly=false",
                self.index, self.value, self.phase
            ),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Aggregate counters for a detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorStats {
    /// Samples seen so far.
    pub observations: u64,
    /// Samples classified as anomalous.
    pub anomalies: u64,
    /// Current phase.
    pub phase: DetectorPhase,
}

impl DetectorStats {
    /// Fraction of observations flagged, `0.0` before any observation.
    #[must_use]
    pub fn anomaly_rate(&self) -> f64 {
        if self.observations == 0 {
            0.0
        } else {
            self.anomalies as f64 / self.observations as f64
        }
    }
}

/// Rolling z-score anomaly detector with EWMA drift tracking.
///
/// One instance per logical stream. Classification takes `&mut self`;
/// sharing a detector across threads needs external serialization.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    config: DetectorConfig,
    window: RollingWindow,
    drift: DriftTracker,
    phase: DetectorPhase,
    observations: u64,
    anomalies: u64,
}

impl AnomalyDetector {
    /// Build a detector, rejecting invalid configuration.
    pub fn new(config: DetectorConfig) -> ConfigResult<Self> {
        config.validate()?;
        let window = RollingWindow::new(config.window_capacity()?);
        let drift = DriftTracker::new(config.alpha)?;
        Ok(Self {
            config,
            window,
            drift,
            phase: DetectorPhase::WarmingUp,
            observations: 0,
            anomalies: 0,
        })
    }

    /// Build a detector with [`DetectorConfig::default`].
    pub fn with_defaults() -> ConfigResult<Self> {
        Self::new(DetectorConfig::default())
    }

    /// Score one sample and report whether it is anomalous.
    pub fn classify(&mut self, value: f64) -> bool {
        self.observe(value).is_anomaly
    }

    /// Score one sample and return the full classification.
    pub fn observe(&mut self, value: f64) -> Classification {
        let index = self.observations;
        self.observations += 1;

        self.window.push(value);

        if self.phase == DetectorPhase::WarmingUp {
            if !self.window.is_full() {
                trace!(index, value, "warming up");
                return Classification {
                    index,
                    value,
                    phase: DetectorPhase::WarmingUp,
                    window_mean: None,
                    window_std: None,
                    z_score: 0.0,
                    ewma_mean: None,
                    ewma_var: None,
                    is_anomaly: false,
                };
            }
            self.phase = DetectorPhase::Active;
            debug!(
                index,
                window_size = self.config.window_size,
                "detector warmed up"
            );
        }

        let mean = self.window.mean();
        let std = self.window.std_dev();
        let z_score = if std > 0.0 { (value - mean) / std } else { 0.0 };

        self.drift.update(value);

        let is_anomaly = z_score.abs() > self.config.z_threshold;
        if is_anomaly {
            self.anomalies += 1;
        }
        trace!(index, value, z = z_score, anomaly = is_anomaly, "classified");

        Classification {
            index,
            value,
            phase: DetectorPhase::Active,
            window_mean: Some(mean),
            window_std: Some(std),
            z_score,
            ewma_mean: Some(self.drift.mean()),
            ewma_var: Some(self.drift.variance()),
            is_anomaly,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> DetectorPhase {
        self.phase
    }

    /// Rolling window, for diagnostics.
    #[must_use]
    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    /// Drift tracker, for diagnostics.
    #[must_use]
    pub fn drift(&self) -> &DriftTracker {
        &self.drift
    }

    /// Current EWMA mean.
    #[must_use]
    pub fn ewma_mean(&self) -> f64 {
        self.drift.mean()
    }

    /// Current EWMA variance.
    #[must_use]
    pub fn ewma_var(&self) -> f64 {
        self.drift.variance()
    }

    #[must_use]
    pub fn stats(&self) -> DetectorStats {
        DetectorStats {
            observations: self.observations,
            anomalies: self.anomalies,
            phase: self.phase,
        }
    }
}
