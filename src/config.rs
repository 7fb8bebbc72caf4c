use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::constants::{DEFAULT_RUN_SECS, TICK_RATE_MS};
use crate::load::Pattern;
use crate::span::WindowSpan;

/// Drive a sliding-window event counter and report trailing-window counts.
#[derive(Debug, Parser)]
#[command(name = "rate_window", version)]
pub struct Args {
    /// How long to run, in seconds
    #[arg(long, env = "RATE_WINDOW_DURATION", default_value_t = DEFAULT_RUN_SECS)]
    pub duration: u64,

    /// Report interval, in milliseconds
    #[arg(
        long,
        env = "RATE_WINDOW_INTERVAL",
        default_value_t = TICK_RATE_MS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,

    /// Window to report besides 1, 10 and 60 seconds (1..=300)
    #[arg(long, env = "RATE_WINDOW_WINDOW", default_value = "300")]
    pub window: WindowSpan,

    /// Target events per second; 0 records as fast as possible
    #[arg(long, env = "RATE_WINDOW_RATE", default_value_t = 0)]
    pub rate: u64,

    /// How events are spread within each second
    #[arg(long, value_enum, default_value_t = Pattern::Steady)]
    pub pattern: Pattern,

    /// Show the full-screen dashboard instead of console lines
    #[arg(long)]
    pub dashboard: bool,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Settings for one harness run.
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Total run length.
    pub run_for: Duration,

    /// Time between reports or redraws.
    pub tick: Duration,

    /// Extra window reported next to the fixed ones.
    pub window: WindowSpan,

    /// Events per second; `None` means unthrottled.
    pub rate: Option<u64>,

    pub pattern: Pattern,
    pub dashboard: bool,
    pub log_file: Option<PathBuf>,
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        Self {
            run_for: Duration::from_secs(args.duration),
            tick: Duration::from_millis(args.interval),
            window: args.window,
            rate: (args.rate > 0).then_some(args.rate),
            pattern: args.pattern,
            dashboard: args.dashboard,
            log_file: args.log_file,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            run_for: Duration::from_secs(DEFAULT_RUN_SECS),
            tick: Duration::from_millis(TICK_RATE_MS),
            window: WindowSpan::FULL,
            rate: None,
            pattern: Pattern::Steady,
            dashboard: false,
            log_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<RunConfig, clap::Error> {
        Args::try_parse_from(std::iter::once("rate_window").chain(argv.iter().copied())).map(RunConfig::from)
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).expect("defaults parse");
        assert_eq!(config.run_for, Duration::from_secs(DEFAULT_RUN_SECS));
        assert_eq!(config.tick, Duration::from_millis(TICK_RATE_MS));
        assert_eq!(config.window, WindowSpan::FULL);
        assert_eq!(config.rate, None);
        assert_eq!(config.pattern, Pattern::Steady);
        assert!(!config.dashboard);
    }

    #[test]
    fn explicit_flags() {
        let config = parse(&[
            "--duration", "3", "--interval", "250", "--window", "42", "--rate", "1000", "--pattern", "bursty",
            "--dashboard",
        ])
        .expect("flags parse");
        assert_eq!(config.run_for, Duration::from_secs(3));
        assert_eq!(config.tick, Duration::from_millis(250));
        assert_eq!(config.window.secs(), 42);
        assert_eq!(config.rate, Some(1_000));
        assert_eq!(config.pattern, Pattern::Bursty);
        assert!(config.dashboard);
    }

    #[test]
    fn rejects_invalid_windows() {
        for window in ["0", "301", "1.5", "abc"] {
            assert!(parse(&["--window", window]).is_err(), "window {window}");
        }
    }

    #[test]
    fn rejects_zero_interval() {
        assert!(parse(&["--interval", "0"]).is_err());
    }
}
