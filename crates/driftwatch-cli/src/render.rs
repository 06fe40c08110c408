#![forbid(unsafe_code)]

//! Terminal sinks.
//!
//! [`TextSink`] prints one line per sample. [`ChartSink`] keeps the most
//! recent samples and redraws a single sparkline row in place, so the
//! terminal shows a live strip chart with anomalies in red.

use std::collections::VecDeque;
use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use driftwatch_stream::{ClassifiedPoint, Sink};

/// Unicode block characters for sparkline rendering (9 levels: empty + 8 bars).
const SPARK_CHARS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Stand-in for a red bar when color is off.
const PLAIN_ANOMALY: char = '!';

/// One line per sample; anomalies are marked and colored.
///
/// ```text
///       41      17.250
///       42      93.118  ANOMALY
/// ```
#[derive(Debug)]
pub struct TextSink<W: Write> {
    output: W,
    color: bool,
}

impl<W: Write> TextSink<W> {
    pub fn new(output: W, color: bool) -> Self {
        Self { output, color }
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write> Sink for TextSink<W> {
    fn accept(&mut self, point: &ClassifiedPoint) -> io::Result<()> {
        let line = format!("{:>8}  {:>10.3}", point.index, point.value);
        if !point.is_anomaly {
            return writeln!(self.output, "{line}");
        }
        if self.color {
            queue!(
                self.output,
                PrintStyledContent(line.red()),
                PrintStyledContent("  ANOMALY".red().bold()),
                Print('\n')
            )
        } else {
            writeln!(self.output, "{line}  ANOMALY")
        }
    }

    fn finish(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}

/// Single-row sparkline redrawn per sample, sized to the terminal.
///
/// ```text
/// ▃▄▅▆▅▄▃▂▁▂▃▄▅█▄▃     17.25  n=4211 anomalies=38
/// |<---- chart ---->|<----------- label ---------->|
/// ```
///
/// The label is laid out first and the chart takes the remaining columns,
/// so the row never exceeds `columns` as the counters grow. On a terminal
/// too narrow for both, the label is cut and one chart column is kept.
#[derive(Debug)]
pub struct ChartSink<W: Write> {
    output: W,
    history: VecDeque<ClassifiedPoint>,
    columns: usize,
    color: bool,
    samples: u64,
    anomalies: u64,
}

impl<W: Write> ChartSink<W> {
    /// `columns` is the terminal width; at least one is kept.
    pub fn new(output: W, columns: usize, color: bool) -> Self {
        let columns = columns.max(1);
        Self {
            output,
            history: VecDeque::with_capacity(columns),
            columns,
            color,
            samples: 0,
            anomalies: 0,
        }
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn into_inner(self) -> W {
        self.output
    }

    /// Render the visible part of the chart as plain characters.
    #[must_use]
    pub fn render_to_string(&self) -> String {
        let (_, chart_columns) = self.layout();
        let visible = self.visible(chart_columns);
        let (min, max) = bounds(visible.clone());
        visible
            .map(|p| {
                if p.is_anomaly && !self.color {
                    PLAIN_ANOMALY
                } else {
                    SPARK_CHARS[bar_index(p.value, min, max)]
                }
            })
            .collect()
    }

    /// Label text (possibly cut) and the chart columns left beside it.
    fn layout(&self) -> (String, usize) {
        let last = self.history.back().map_or(0.0, |p| p.value);
        let label = format!(
            " {:>10.2}  n={} anomalies={}",
            last, self.samples, self.anomalies
        );
        let label_columns = label.chars().count().min(self.columns - 1);
        let label: String = label.chars().take(label_columns).collect();
        (label, self.columns - label_columns)
    }

    fn visible(&self, chart_columns: usize) -> impl Iterator<Item = &ClassifiedPoint> + Clone {
        let skip = self.history.len().saturating_sub(chart_columns);
        self.history.range(skip..)
    }

    fn redraw(&mut self) -> io::Result<()> {
        let (label, chart_columns) = self.layout();
        let skip = self.history.len().saturating_sub(chart_columns);
        let (min, max) = bounds(self.history.range(skip..));
        queue!(self.output, Print('\r'), Clear(ClearType::CurrentLine))?;
        for p in self.history.range(skip..) {
            let ch = SPARK_CHARS[bar_index(p.value, min, max)];
            match (p.is_anomaly, self.color) {
                (true, true) => queue!(self.output, PrintStyledContent(ch.red()))?,
                (true, false) => queue!(self.output, Print(PLAIN_ANOMALY))?,
                (false, _) => queue!(self.output, Print(ch))?,
            }
        }
        queue!(self.output, Print(label))?;
        self.output.flush()
    }
}

impl<W: Write> Sink for ChartSink<W> {
    fn accept(&mut self, point: &ClassifiedPoint) -> io::Result<()> {
        if self.history.len() == self.columns {
            self.history.pop_front();
        }
        self.history.push_back(*point);
        self.samples += 1;
        if point.is_anomaly {
            self.anomalies += 1;
        }
        self.redraw()
    }

    fn finish(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        self.output.flush()
    }
}

/// Finite min and max of the shown values, `(0, 0)` when there are none.
fn bounds<'a>(points: impl Iterator<Item = &'a ClassifiedPoint>) -> (f64, f64) {
    let (min, max) = points
        .map(|p| p.value)
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max { (0.0, 0.0) } else { (min, max) }
}

/// Map a value to a bar index (0-8) within `[min, max]`.
fn bar_index(value: f64, min: f64, max: f64) -> usize {
    if !value.is_finite() {
        return 0;
    }
    let range = max - min;
    if range <= 0.0 {
        return 4;
    }
    let normalized = ((value - min) / range).clamp(0.0, 1.0);
    (normalized * 8.0).round() as usize
}
