#![forbid(unsafe_code)]

//! Consumers of classified samples.
//!
//! The driver hands every sample to a [`Sink`] in arrival order, one call
//! per sample. Sinks report I/O failures; they never see the detector.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

/// One classified sample as emitted to sinks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPoint {
    /// Zero-based arrival index.
    pub index: u64,
    /// Sample value.
    pub value: f64,
    /// Detector decision.
    pub is_anomaly: bool,
}

/// Destination for classified samples.
pub trait Sink {
    /// Consume one sample.
    fn accept(&mut self, point: &ClassifiedPoint) -> io::Result<()>;

    /// Called once after the last sample. Flushes buffered output.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn accept(&mut self, point: &ClassifiedPoint) -> io::Result<()> {
        (**self).accept(point)
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn accept(&mut self, point: &ClassifiedPoint) -> io::Result<()> {
        (**self).accept(point)
    }

    fn finish(&mut self) -> io::Result<()> {
        (**self).finish()
    }
}

/// Collects every point in memory.
///
/// Grows with the stream; intended for tests and short bounded runs.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    points: Vec<ClassifiedPoint>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn points(&self) -> &[ClassifiedPoint] {
        &self.points
    }

    /// Points flagged as anomalous, in arrival order.
    pub fn anomalies(&self) -> impl Iterator<Item = &ClassifiedPoint> {
        self.points.iter().filter(|p| p.is_anomaly)
    }

    #[must_use]
    pub fn into_points(self) -> Vec<ClassifiedPoint> {
        self.points
    }
}

impl Sink for MemorySink {
    fn accept(&mut self, point: &ClassifiedPoint) -> io::Result<()> {
        self.points.push(*point);
        Ok(())
    }
}

/// Writes one JSON object per line.
///
/// ```text
/// {"index":0,"value":1.25,"is_anomaly":false}
/// ```
#[derive(Debug)]
pub struct JsonlSink<W: Write> {
    output: W,
    lines: u64,
}

impl<W: Write> JsonlSink<W> {
    pub fn new(output: W) -> Self {
        Self { output, lines: 0 }
    }

    /// Lines written so far.
    #[must_use]
    pub const fn lines(&self) -> u64 {
        self.lines
    }

    /// Flush and return the inner writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.output.flush()?;
        Ok(self.output)
    }
}

impl<W: Write> Sink for JsonlSink<W> {
    fn accept(&mut self, point: &ClassifiedPoint) -> io::Result<()> {
        serde_json::to_writer(&mut self.output, point)?;
        self.output.write_all(b"\n")?;
        self.lines += 1;
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(index: u64, value: f64, is_anomaly: bool) -> ClassifiedPoint {
        ClassifiedPoint {
            index,
            value,
            is_anomaly,
        }
    }

    #[test]
    fn memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        sink.accept(&point(0, 1.0, false)).unwrap();
        sink.accept(&point(1, 90.0, true)).unwrap();
        sink.accept(&point(2, 2.0, false)).unwrap();
        let idx: Vec<u64> = sink.points().iter().map(|p| p.index).collect();
        assert_eq!(idx, vec![0, 1, 2]);
        assert_eq!(sink.anomalies().count(), 1);
        assert_eq!(sink.into_points().len(), 3);
    }

    #[test]
    fn jsonl_sink_writes_one_object_per_line() {
        let mut sink = JsonlSink::new(Vec::new());
        sink.accept(&point(0, 1.5, false)).unwrap();
        sink.accept(&point(1, 80.25, true)).unwrap();
        sink.finish().unwrap();
        assert_eq!(sink.lines(), 2);

        let bytes = sink.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let parsed: Vec<ClassifiedPoint> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(parsed, vec![point(0, 1.5, false), point(1, 80.25, true)]);
        assert!(text.contains(r#""is_anomaly":true"#));
    }

    #[test]
    fn boxed_sink_forwards() {
        let mut boxed: Box<dyn Sink> = Box::new(MemorySink::new());
        boxed.accept(&point(3, 0.0, false)).unwrap();
        boxed.finish().unwrap();
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn jsonl_sink_surfaces_write_errors() {
        let mut sink = JsonlSink::new(BrokenWriter);
        let err = sink.accept(&point(0, 1.0, false)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(sink.lines(), 0);
    }
}
