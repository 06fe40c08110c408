#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually to keep the binary lean. Precedence, lowest first:
//! built-in defaults, `DRIFTWATCH_*` environment variables, command-line
//! flags. Parsing is a pure function of the argument list and an env lookup
//! so it can be tested without touching the process environment.

use std::fmt;
use std::str::FromStr;

use driftwatch_core::config::{DEFAULT_ALPHA, DEFAULT_WINDOW_SIZE, DEFAULT_Z_THRESHOLD};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
driftwatch - streaming anomaly detection over a synthetic seasonal signal

USAGE:
    driftwatch [OPTIONS]

DETECTOR:
    --window=N            Rolling window size (default: 30)
    --alpha=A             EWMA smoothing factor in (0, 1] (default: 0.3)
    --threshold=Z         Flag samples with |z| above Z (default: 3.0)

SOURCE:
    --count=N             Stop after N samples (default: run until interrupted)
    --seed=S              RNG seed (default: derived from the clock)
    --noise=SIGMA         Gaussian noise std (default: 2.0)
    --anomaly-rate=P      Chance of an injected spike per sample (default: 0.01)

OUTPUT:
    --format=FMT          'text' (default), 'jsonl' or 'chart'
    --interval-ms=N       Pause between samples (default: 100 for chart, else 0)
    --no-color            Disable colored output
    --verbose, -v         Log detector decisions to stderr
    --help, -h            Show this help message
    --version, -V         Show version

ENVIRONMENT VARIABLES:
    DRIFTWATCH_WINDOW         Override --window
    DRIFTWATCH_ALPHA          Override --alpha
    DRIFTWATCH_THRESHOLD      Override --threshold
    DRIFTWATCH_COUNT          Override --count
    DRIFTWATCH_SEED           Override --seed
    DRIFTWATCH_FORMAT         Override --format
    DRIFTWATCH_INTERVAL_MS    Override --interval-ms
    DRIFTWATCH_LOG            tracing filter directives (default: warn)
    NO_COLOR                  Disable colored output when set";

/// How classified samples are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line per sample, anomalies highlighted.
    #[default]
    Text,
    /// One JSON object per line.
    Jsonl,
    /// Live sparkline redrawn in place.
    Chart,
}

impl OutputFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Jsonl => "jsonl",
            Self::Chart => "chart",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "jsonl" | "json" => Ok(Self::Jsonl),
            "chart" => Ok(Self::Chart),
            _ => Err(()),
        }
    }
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    pub window_size: usize,
    pub alpha: f64,
    pub z_threshold: f64,
    /// Stop after this many samples; `None` runs until interrupted.
    pub count: Option<u64>,
    /// Fixed RNG seed; `None` derives one from the clock.
    pub seed: Option<u64>,
    pub noise_std: f64,
    pub anomaly_rate: f64,
    pub format: OutputFormat,
    /// Explicit pacing; `None` picks a per-format default.
    pub interval_ms: Option<u64>,
    pub color: bool,
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            alpha: DEFAULT_ALPHA,
            z_threshold: DEFAULT_Z_THRESHOLD,
            count: None,
            seed: None,
            noise_std: 2.0,
            anomaly_rate: 0.01,
            format: OutputFormat::Text,
            interval_ms: None,
            color: true,
            verbose: false,
        }
    }
}

/// What the binary should do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// Invalid command-line flag or environment value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    UnknownArgument(String),
    InvalidFlag { flag: &'static str, value: String },
    InvalidEnv { var: &'static str, value: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownArgument(arg) => write!(f, "Unknown argument: {arg}"),
            Self::InvalidFlag { flag, value } => write!(f, "Invalid {flag} value: {value}"),
            Self::InvalidEnv { var, value } => write!(f, "Invalid {var} value: {value}"),
        }
    }
}

impl std::error::Error for CliError {}

impl Opts {
    /// Pacing between samples, after applying the per-format default.
    #[must_use]
    pub fn effective_interval_ms(&self) -> u64 {
        self.interval_ms.unwrap_or(match self.format {
            OutputFormat::Chart => 100,
            OutputFormat::Text | OutputFormat::Jsonl => 0,
        })
    }

    /// Parse arguments (without the program name) and environment.
    pub fn parse_from<I, S, F>(args: I, env: F) -> Result<Command, CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();
        opts.apply_env(&env)?;

        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--no-color" => opts.color = false,
                "--verbose" | "-v" => opts.verbose = true,
                other => opts.apply_flag(other)?,
            }
        }

        Ok(Command::Run(opts))
    }

    fn apply_env<F>(&mut self, env: &F) -> Result<(), CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = env("DRIFTWATCH_WINDOW") {
            self.window_size = env_value("DRIFTWATCH_WINDOW", &v)?;
        }
        if let Some(v) = env("DRIFTWATCH_ALPHA") {
            self.alpha = env_value("DRIFTWATCH_ALPHA", &v)?;
        }
        if let Some(v) = env("DRIFTWATCH_THRESHOLD") {
            self.z_threshold = env_value("DRIFTWATCH_THRESHOLD", &v)?;
        }
        if let Some(v) = env("DRIFTWATCH_COUNT") {
            self.count = Some(env_value("DRIFTWATCH_COUNT", &v)?);
        }
        if let Some(v) = env("DRIFTWATCH_SEED") {
            self.seed = Some(env_value("DRIFTWATCH_SEED", &v)?);
        }
        if let Some(v) = env("DRIFTWATCH_FORMAT") {
            self.format = env_value("DRIFTWATCH_FORMAT", &v)?;
        }
        if let Some(v) = env("DRIFTWATCH_INTERVAL_MS") {
            self.interval_ms = Some(env_value("DRIFTWATCH_INTERVAL_MS", &v)?);
        }
        if env("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            self.color = false;
        }
        Ok(())
    }

    fn apply_flag(&mut self, arg: &str) -> Result<(), CliError> {
        let Some((name, value)) = arg.split_once('=') else {
            return Err(CliError::UnknownArgument(arg.to_string()));
        };
        match name {
            "--window" => self.window_size = flag_value("--window", value)?,
            "--alpha" => self.alpha = flag_value("--alpha", value)?,
            "--threshold" => self.z_threshold = flag_value("--threshold", value)?,
            "--count" => self.count = Some(flag_value("--count", value)?),
            "--seed" => self.seed = Some(flag_value("--seed", value)?),
            "--noise" => self.noise_std = flag_value("--noise", value)?,
            "--anomaly-rate" => self.anomaly_rate = flag_value("--anomaly-rate", value)?,
            "--format" => self.format = flag_value("--format", value)?,
            "--interval-ms" => self.interval_ms = Some(flag_value("--interval-ms", value)?),
            _ => return Err(CliError::UnknownArgument(arg.to_string())),
        }
        Ok(())
    }
}

fn flag_value<T: FromStr>(flag: &'static str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::InvalidFlag {
        flag,
        value: value.to_string(),
    })
}

fn env_value<T: FromStr>(var: &'static str, value: &str) -> Result<T, CliError> {
    value.trim().parse().map_err(|_| CliError::InvalidEnv {
        var,
        value: value.to_string(),
    })
}
