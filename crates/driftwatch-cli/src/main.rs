#![forbid(unsafe_code)]

//! driftwatch binary.
//!
//! Streams a seeded synthetic signal through the anomaly detector and writes
//! every classified sample to stdout. Diagnostics go to stderr through
//! `tracing`. Exit codes are listed in [`driftwatch_cli::app`].

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use driftwatch_cli::app::{
    self, EXIT_SUCCESS, EXIT_USAGE, RunError, build_detector, build_source, clock_seed,
    summary_line,
};
use driftwatch_cli::cli::{Command, HELP_TEXT, Opts, OutputFormat, VERSION};
use driftwatch_cli::render::{ChartSink, TextSink};
use driftwatch_stream::{DriveOptions, JsonlSink, RunSummary, Sink, drive};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const FALLBACK_TERMINAL_COLUMNS: u16 = 80;

fn main() -> ExitCode {
    let command = match Opts::parse_from(std::env::args().skip(1), |key| std::env::var(key).ok())
    {
        Ok(command) => command,
        Err(e) => {
            eprintln!("driftwatch: {e}");
            eprintln!("Run with --help for usage information.");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let opts = match command {
        Command::Help => {
            println!("{HELP_TEXT}");
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            println!("driftwatch {VERSION}");
            return ExitCode::SUCCESS;
        }
        Command::Run(opts) => opts,
    };

    init_tracing(opts.verbose);

    let seed = opts.seed.unwrap_or_else(clock_seed);
    match run(&opts, seed) {
        Ok(summary) => {
            eprintln!("{}", summary_line(&summary, seed, opts.seed.is_some()));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) if e.is_closed_pipe() => ExitCode::from(e.exit_code()),
        Err(e) => {
            eprintln!("driftwatch: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("DRIFTWATCH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(opts: &Opts, seed: u64) -> Result<RunSummary, RunError> {
    let detector_config = app::detector_config(opts);
    let mut detector = build_detector(opts)?;
    let mut source = build_source(opts, seed)?;

    info!(
        seed,
        window_size = detector_config.window_size,
        alpha = detector_config.alpha,
        z_threshold = detector_config.z_threshold,
        max_attainable_z = detector_config.max_attainable_z(),
        format = opts.format.as_str(),
        "starting"
    );
    if detector_config.max_attainable_z() <= detector_config.z_threshold {
        warn!(
            window_size = detector_config.window_size,
            z_threshold = detector_config.z_threshold,
            "threshold is unreachable for this window size; nothing will be flagged"
        );
    }

    let stdout = io::stdout().lock();
    let mut sink: Box<dyn Sink> = match opts.format {
        OutputFormat::Text => Box::new(TextSink::new(stdout, opts.color)),
        OutputFormat::Jsonl => Box::new(JsonlSink::new(stdout)),
        OutputFormat::Chart => {
            let columns = crossterm::terminal::size()
                .map(|(cols, _)| cols)
                .unwrap_or(FALLBACK_TERMINAL_COLUMNS);
            Box::new(ChartSink::new(stdout, usize::from(columns), opts.color))
        }
    };

    let mut options = DriveOptions::default()
        .with_interval(Duration::from_millis(opts.effective_interval_ms()));
    options.limit = opts.count;

    Ok(drive(&mut detector, &mut source, &mut sink, &options)?)
}
