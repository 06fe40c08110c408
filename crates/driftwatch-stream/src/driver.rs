#![forbid(unsafe_code)]

//! Pull-based driver loop: source → detector → sink.
//!
//! ```text
//! loop {
//!     value = source.next_sample()?        // None ends the run
//!     anomaly = detector.classify(value)
//!     sink.accept((index, value, anomaly))  // error ends the run
//! }
//! ```
//!
//! All state is owned by the caller and passed in explicitly. The loop is
//! synchronous; it stops when the source is exhausted, when `limit` samples
//! have been processed, or on the first sink error.

use std::fmt;
use std::io;
use std::thread;
use std::time::Duration;

use driftwatch_core::AnomalyDetector;
use tracing::{debug, info, info_span, warn};

use crate::sink::{ClassifiedPoint, Sink};
use crate::source::SampleSource;

/// Options for [`drive`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriveOptions {
    /// Stop after this many samples. `None` runs until the source ends.
    pub limit: Option<u64>,
    /// Pause between samples. Zero disables pacing.
    pub interval: Duration,
}

impl DriveOptions {
    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Totals for a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Samples pulled and classified.
    pub samples: u64,
    /// Samples classified as anomalous.
    pub anomalies: u64,
    /// True when the run ended because the source returned `None`.
    pub exhausted: bool,
}

/// Failure while driving a stream.
#[derive(Debug)]
pub enum DriveError {
    /// The sink rejected the sample at `index`.
    Sink { index: u64, source: io::Error },
    /// The sink failed to flush after the last sample.
    Finish(io::Error),
}

impl fmt::Display for DriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sink { index, source } => write!(f, "sink failed at sample {index}: {source}"),
            Self::Finish(e) => write!(f, "sink failed to finish: {e}"),
        }
    }
}

impl std::error::Error for DriveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sink { source, .. } => Some(source),
            Self::Finish(e) => Some(e),
        }
    }
}

/// Pull samples from `source`, classify them, and forward them to `sink`.
///
/// The detector keeps its state across calls, so a stream can be driven in
/// several bounded chunks. Indices reported to the sink continue from the
/// detector's observation count.
pub fn drive<S, K>(
    detector: &mut AnomalyDetector,
    source: &mut S,
    sink: &mut K,
    options: &DriveOptions,
) -> Result<RunSummary, DriveError>
where
    S: SampleSource + ?Sized,
    K: Sink + ?Sized,
{
    let _span = info_span!(
        "drive",
        window_size = detector.config().window_size,
        limit = ?options.limit
    )
    .entered();

    let mut summary = RunSummary::default();

    loop {
        if options.limit.is_some_and(|limit| summary.samples >= limit) {
            break;
        }
        let Some(value) = source.next_sample() else {
            summary.exhausted = true;
            break;
        };
        if summary.samples > 0 && !options.interval.is_zero() {
            thread::sleep(options.interval);
        }

        let classification = detector.observe(value);
        summary.samples += 1;
        if classification.is_anomaly {
            summary.anomalies += 1;
            debug!(evidence = %classification, "anomaly");
        }

        let point = ClassifiedPoint {
            index: classification.index,
            value,
            is_anomaly: classification.is_anomaly,
        };
        if let Err(source) = sink.accept(&point) {
            if source.kind() == io::ErrorKind::BrokenPipe {
                debug!(index = point.index, "downstream closed");
            } else {
                warn!(index = point.index, error = %source, "sink rejected sample");
            }
            return Err(DriveError::Sink {
                index: point.index,
                source,
            });
        }
    }

    sink.finish().map_err(DriveError::Finish)?;

    info!(
        samples = summary.samples,
        anomalies = summary.anomalies,
        exhausted = summary.exhausted,
        "stream finished"
    );
    Ok(summary)
}
