#![forbid(unsafe_code)]

//! Synthetic seasonal stream with noise and injected anomalies.
//!
//! # Model
//!
//! ```text
//! x_t = cycle[t mod len(cycle)] + ε_t + a_t
//!
//! ε_t ~ Normal(0, noise_std)
//! a_t = U(anomaly_min, anomaly_max)   with probability anomaly_probability
//!     = 0                             otherwise
//! ```
//!
//! Defaults: a triangle wave
//! `0 2 4 6 8 10 8 6 4 2`, σ = 2 noise, and a 1% chance of a spike in
//! [20, 100).
//!
//! The generator is seeded, so the same [`SyntheticConfig`] always yields the
//! same sequence. The iterator never ends on its own; bound it with
//! `Iterator::take` or the driver's `limit`.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Seasonal pattern used when none is configured.
pub const DEFAULT_CYCLE: [f64; 10] = [0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 8.0, 6.0, 4.0, 2.0];

/// Configuration for [`SyntheticSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    /// Repeating seasonal component. Must not be empty.
    pub cycle: Vec<f64>,
    /// Standard deviation of Gaussian noise. Default: 2.0
    pub noise_std: f64,
    /// Chance that a sample carries an injected spike. Default: 0.01
    pub anomaly_probability: f64,
    /// Lower bound of spike magnitude (inclusive). Default: 20.0
    pub anomaly_min: f64,
    /// Upper bound of spike magnitude (exclusive). Default: 100.0
    pub anomaly_max: f64,
    /// RNG seed. Default: 0
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            cycle: DEFAULT_CYCLE.to_vec(),
            noise_std: 2.0,
            anomaly_probability: 0.01,
            anomaly_min: 20.0,
            anomaly_max: 100.0,
            seed: 0,
        }
    }
}

impl SyntheticConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_noise_std(mut self, noise_std: f64) -> Self {
        self.noise_std = noise_std;
        self
    }

    #[must_use]
    pub fn with_anomaly_probability(mut self, p: f64) -> Self {
        self.anomaly_probability = p;
        self
    }

    #[must_use]
    pub fn with_anomaly_range(mut self, min: f64, max: f64) -> Self {
        self.anomaly_min = min;
        self.anomaly_max = max;
        self
    }

    #[must_use]
    pub fn with_cycle(mut self, cycle: Vec<f64>) -> Self {
        self.cycle = cycle;
        self
    }

    /// Check every parameter, reporting the first violation.
    pub fn validate(&self) -> Result<(), SourceConfigError> {
        if self.cycle.is_empty() {
            return Err(SourceConfigError::EmptyCycle);
        }
        if !(self.noise_std.is_finite() && self.noise_std >= 0.0) {
            return Err(SourceConfigError::InvalidNoiseStd(self.noise_std));
        }
        if !(0.0..=1.0).contains(&self.anomaly_probability) {
            return Err(SourceConfigError::InvalidAnomalyProbability(
                self.anomaly_probability,
            ));
        }
        if !(self.anomaly_min.is_finite()
            && self.anomaly_max.is_finite()
            && self.anomaly_min < self.anomaly_max)
        {
            return Err(SourceConfigError::InvalidAnomalyRange {
                min: self.anomaly_min,
                max: self.anomaly_max,
            });
        }
        Ok(())
    }
}

/// Invalid synthetic source configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceConfigError {
    /// The seasonal cycle has no entries.
    EmptyCycle,
    /// Noise standard deviation is negative or not finite.
    InvalidNoiseStd(f64),
    /// Anomaly probability is outside [0, 1].
    InvalidAnomalyProbability(f64),
    /// Spike range is empty or not finite.
    InvalidAnomalyRange { min: f64, max: f64 },
}

impl fmt::Display for SourceConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCycle => write!(f, "cycle must contain at least one value"),
            Self::InvalidNoiseStd(s) => write!(f, "noise_std={s} (must be finite and >= 0)"),
            Self::InvalidAnomalyProbability(p) => {
                write!(f, "anomaly_probability={p} (must lie in [0, 1])")
            }
            Self::InvalidAnomalyRange { min, max } => {
                write!(f, "anomaly range [{min}, {max}) is empty or not finite")
            }
        }
    }
}

impl std::error::Error for SourceConfigError {}

/// Seasonal component at step `t`.
#[must_use]
pub fn seasonal_component(cycle: &[f64], t: u64) -> f64 {
    if cycle.is_empty() {
        return 0.0;
    }
    cycle[(t % cycle.len() as u64) as usize]
}

/// Endless seeded generator of seasonal samples.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    config: SyntheticConfig,
    rng: StdRng,
    noise: Normal<f64>,
    step: u64,
    injected: u64,
    last_injected: bool,
}

impl SyntheticSource {
    /// Build a source, rejecting invalid configuration.
    pub fn new(config: SyntheticConfig) -> Result<Self, SourceConfigError> {
        config.validate()?;
        let noise = Normal::new(0.0, config.noise_std)
            .map_err(|_| SourceConfigError::InvalidNoiseStd(config.noise_std))?;
        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            noise,
            step: 0,
            injected: 0,
            last_injected: false,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SyntheticConfig {
        &self.config
    }

    /// Samples produced so far.
    #[must_use]
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Spikes injected so far.
    #[must_use]
    pub fn injected(&self) -> u64 {
        self.injected
    }

    /// Whether the most recent sample carried a spike.
    #[must_use]
    pub fn last_was_injected(&self) -> bool {
        self.last_injected
    }

    fn generate(&mut self) -> f64 {
        let seasonal = seasonal_component(&self.config.cycle, self.step);
        let noise = self.noise.sample(&mut self.rng);
        self.last_injected = self.rng.gen_bool(self.config.anomaly_probability);
        let spike = if self.last_injected {
            self.injected += 1;
            self.rng
                .gen_range(self.config.anomaly_min..self.config.anomaly_max)
        } else {
            0.0
        };
        self.step += 1;
        seasonal + noise + spike
    }
}

impl Iterator for SyntheticSource {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.generate())
    }
}
