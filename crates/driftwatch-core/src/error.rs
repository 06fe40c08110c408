#![forbid(unsafe_code)]

//! Construction-time errors.
//!
//! The detector has exactly one failure class: invalid configuration. It is
//! raised when a detector (or one of its sub-models) is built and never
//! during streaming.

use std::fmt;

/// A configuration parameter outside its valid domain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// `window_size` must be at least 1.
    InvalidWindowSize(usize),
    /// `alpha` must lie in the half-open interval (0, 1].
    InvalidAlpha(f64),
    /// `z_threshold` must be finite and strictly positive.
    InvalidZThreshold(f64),
}

impl ConfigError {
    /// Name of the offending configuration field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidWindowSize(_) => "window_size",
            Self::InvalidAlpha(_) => "alpha",
            Self::InvalidZThreshold(_) => "z_threshold",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWindowSize(n) => {
                write!(f, "window_size={n} (must be a positive integer)")
            }
            Self::InvalidAlpha(a) => write!(f, "alpha={a} (must lie in (0, 1])"),
            Self::InvalidZThreshold(z) => {
                write!(f, "z_threshold={z} (must be finite and > 0)")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Result type for detector construction.
pub type ConfigResult<T> = Result<T, ConfigError>;
