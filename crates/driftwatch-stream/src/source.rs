#![forbid(unsafe_code)]

//! Pull-based sample sources.
//!
//! A source hands out one value per call and reports exhaustion with `None`.
//! Any `Iterator<Item = f64>` is a source, so finite slices, channels drained
//! through an iterator adapter, and [`SyntheticSource`](crate::SyntheticSource)
//! all plug into the driver the same way.

/// Producer of numeric samples.
pub trait SampleSource {
    /// Next sample, or `None` once the source is exhausted.
    fn next_sample(&mut self) -> Option<f64>;
}

impl<I> SampleSource for I
where
    I: Iterator<Item = f64>,
{
    fn next_sample(&mut self) -> Option<f64> {
        self.next()
    }
}
