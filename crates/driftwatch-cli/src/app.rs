#![forbid(unsafe_code)]

//! Run setup and outcome reporting for the binary.
//!
//! # Exit Codes
//!
//! | Outcome | Code |
//! |---------|------|
//! | Run finished | 0 |
//! | Downstream closed stdout (`driftwatch \| head`) | 0 |
//! | Output failed | 1 |
//! | Invalid flags or configuration | 2 |

use std::fmt;
use std::io;
use std::time::{SystemTime, UNIX_EPOCH};

use driftwatch_core::{AnomalyDetector, ConfigError, DetectorConfig};
use driftwatch_stream::{
    DriveError, RunSummary, SourceConfigError, SyntheticConfig, SyntheticSource,
};

use crate::cli::Opts;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_OUTPUT_FAILED: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

/// Failure of a `driftwatch` run.
#[derive(Debug)]
pub enum RunError {
    Detector(ConfigError),
    Source(SourceConfigError),
    Drive(DriveError),
}

impl RunError {
    /// True when the reader of our stdout went away.
    #[must_use]
    pub fn is_closed_pipe(&self) -> bool {
        match self {
            Self::Drive(DriveError::Sink { source, .. } | DriveError::Finish(source)) => {
                source.kind() == io::ErrorKind::BrokenPipe
            }
            Self::Detector(_) | Self::Source(_) => false,
        }
    }

    #[must_use]
    pub fn exit_code(&self) -> u8 {
        if self.is_closed_pipe() {
            return EXIT_SUCCESS;
        }
        match self {
            Self::Detector(_) | Self::Source(_) => EXIT_USAGE,
            Self::Drive(_) => EXIT_OUTPUT_FAILED,
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detector(e) => write!(f, "invalid detector configuration: {e}"),
            Self::Source(e) => write!(f, "invalid source configuration: {e}"),
            Self::Drive(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Detector(e) => Some(e),
            Self::Source(e) => Some(e),
            Self::Drive(e) => Some(e),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Detector(e)
    }
}

impl From<SourceConfigError> for RunError {
    fn from(e: SourceConfigError) -> Self {
        Self::Source(e)
    }
}

impl From<DriveError> for RunError {
    fn from(e: DriveError) -> Self {
        Self::Drive(e)
    }
}

/// Seed for runs without `--seed`.
#[must_use]
pub fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[must_use]
pub fn detector_config(opts: &Opts) -> DetectorConfig {
    DetectorConfig::new(opts.window_size, opts.alpha, opts.z_threshold)
}

pub fn build_detector(opts: &Opts) -> Result<AnomalyDetector, RunError> {
    Ok(AnomalyDetector::new(detector_config(opts))?)
}

pub fn build_source(opts: &Opts, seed: u64) -> Result<SyntheticSource, RunError> {
    let config = SyntheticConfig::default()
        .with_seed(seed)
        .with_noise_std(opts.noise_std)
        .with_anomaly_probability(opts.anomaly_rate);
    Ok(SyntheticSource::new(config)?)
}

/// Closing line on stderr. A clock-derived seed is included so the run can
/// be repeated with `--seed`.
#[must_use]
pub fn summary_line(summary: &RunSummary, seed: u64, seed_was_given: bool) -> String {
    let mut line = format!(
        "driftwatch: {} samples, {} anomalies",
        summary.samples, summary.anomalies
    );
    if !seed_was_given {
        line.push_str(&format!(" (seed {seed})"));
    }
    line
}
