#![forbid(unsafe_code)]

//! driftwatch core
//!
//! Bounded-memory classification of a numeric stream into normal and
//! anomalous samples.
//!
//! # Key Components
//!
//! - [`RollingWindow`] - Fixed-capacity FIFO of the last N samples
//! - [`DriftTracker`] - EWMA mean/variance that follows slow drift
//! - [`AnomalyDetector`] - Composes both; `classify(value) -> bool`
//! - [`DetectorConfig`] - Window size, smoothing factor, z-threshold
//!
//! # Example
//!
//! ```
//! use driftwatch_core::{AnomalyDetector, DetectorConfig};
//!
//! let mut detector = AnomalyDetector::new(DetectorConfig::new(5, 0.3, 1.5)).unwrap();
//! for _ in 0..4 {
//!     assert!(!detector.classify(10.0));
//! }
//! assert!(detector.classify(-30.0));
//! ```
//!
//! # Memory
//!
//! O(window_size) for the window, O(1) for the drift tracker, regardless of
//! how many samples are classified.

pub mod config;
pub mod detector;
pub mod error;
pub mod ewma;
pub mod window;

pub use config::DetectorConfig;
pub use detector::{AnomalyDetector, Classification, DetectorPhase, DetectorStats};
pub use error::{ConfigError, ConfigResult};
pub use ewma::DriftTracker;
pub use window::RollingWindow;
