#![forbid(unsafe_code)]

//! Fixed-capacity FIFO window with on-demand population statistics.
//!
//! # Invariants
//!
//! 1. **Bounded**: `len() <= capacity()` after every call.
//! 2. **FIFO**: on overflow the oldest sample is evicted first.
//! 3. **Population statistics**: variance divides by `len()`, not `len() - 1`.
//! 4. **Flat windows are exact**: a window of identical values `c` has mean
//!    exactly `c` and standard deviation exactly `0.0`.
//!
//! Statistics are recomputed on each call rather than maintained
//! incrementally, so long streams cannot accumulate cancellation error in a
//! running sum of squares. Cost is O(N) per call.
//!
//! The mean carries a one-step correction:
//!
//! ```text
//! m₀ = Σx / n
//! m  = m₀ + Σ(x − m₀) / n
//! ```
//!
//! For identical values `x − m₀` is exact (the operands are within a factor
//! of two), so `m` lands back on `c` even when `n·c` is not representable.
//! Without it a flat window of `0.1` reports a tiny non-zero spread and
//! |z| ≈ 1 for the next `0.1`.

use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// Bounded buffer of the most recent N samples.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    samples: VecDeque<f64>,
    capacity: NonZeroUsize,
}

impl RollingWindow {
    /// Create an empty window holding at most `capacity` samples.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.get()),
            capacity,
        }
    }

    /// Append a sample, evicting and returning the oldest one at capacity.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let evicted = if self.samples.len() == self.capacity.get() {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(value);
        evicted
    }

    /// Arithmetic mean of the current contents, `0.0` when empty.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let n = self.samples.len() as f64;
        let rough = self.samples.iter().sum::<f64>() / n;
        let correction = self.samples.iter().map(|&x| x - rough).sum::<f64>() / n;
        rough + correction
    }

    /// Population variance of the current contents, `0.0` when empty.
    #[must_use]
    pub fn variance(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let sum_sq: f64 = self
            .samples
            .iter()
            .map(|&x| {
                let d = x - mean;
                d * d
            })
            .sum();
        sum_sq / self.samples.len() as f64
    }

    /// Population standard deviation, `0.0` when empty.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// True once the window holds `capacity()` samples.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity.get()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Iterate samples from oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}
