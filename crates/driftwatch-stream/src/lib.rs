#![forbid(unsafe_code)]

//! driftwatch stream plumbing
//!
//! The collaborators around the detector: where samples come from, where
//! classified samples go, and the loop that connects them.
//!
//! - [`SampleSource`] - Pull-based producer; every `Iterator<Item = f64>` qualifies
//! - [`SyntheticSource`] - Seeded seasonal stream with noise and injected spikes
//! - [`Sink`] - Consumer of [`ClassifiedPoint`]s ([`MemorySink`], [`JsonlSink`])
//! - [`drive`] - Synchronous source → detector → sink loop
//!
//! # Example
//!
//! ```
//! use driftwatch_core::{AnomalyDetector, DetectorConfig};
//! use driftwatch_stream::{DriveOptions, MemorySink, SyntheticConfig, SyntheticSource, drive};
//!
//! let mut detector = AnomalyDetector::new(DetectorConfig::default()).unwrap();
//! let mut source = SyntheticSource::new(SyntheticConfig::default().with_seed(3)).unwrap();
//! let mut sink = MemorySink::new();
//!
//! let summary = drive(
//!     &mut detector,
//!     &mut source,
//!     &mut sink,
//!     &DriveOptions::default().with_limit(200),
//! )
//! .unwrap();
//! assert_eq!(summary.samples, 200);
//! ```

pub mod driver;
pub mod sink;
pub mod source;
pub mod synthetic;

pub use driver::{DriveError, DriveOptions, RunSummary, drive};
pub use sink::{ClassifiedPoint, JsonlSink, MemorySink, Sink};
pub use source::SampleSource;
pub use synthetic::{SourceConfigError, SyntheticConfig, SyntheticSource};
