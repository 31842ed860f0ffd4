// Logging setup for the `kinsong` binary, using `tracing-subscriber`.
//
// The library only emits `tracing` events; installing a subscriber is the
// binary's job. Levels:
// - warn: nothing usable in the record set
// - info: per-stage counts (records loaded, lifespans kept, bytes written)
// - debug: each skipped record with its reason, timeline totals
//
// When no explicit verbosity is given, `RUST_LOG` takes precedence over the
// default `warn` level.

use std::io;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Log output format, selectable with `--log-format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Multi-line human-readable output.
    Pretty,
    /// Single-line output.
    #[default]
    Compact,
    /// Newline-delimited JSON for machine parsing.
    Json,
}

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LevelFilter,
    /// Let `RUST_LOG` override `level` when set.
    pub use_env_filter: bool,
    pub format: LogFormat,
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: LevelFilter::WARN,
            use_env_filter: true,
            format: LogFormat::default(),
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// Map `-v`/`-q` counts onto a level: warn by default, each `-v` one
    /// step more verbose, each `-q` one step quieter, down to off.
    pub fn from_verbosity(verbose: u8, quiet: u8) -> Self {
        let steps = i16::from(verbose) - i16::from(quiet);
        let level = match steps {
            i16::MIN..=-2 => LevelFilter::OFF,
            -1 => LevelFilter::ERROR,
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        LogConfig {
            level,
            use_env_filter: verbose == 0 && quiet == 0,
            ..LogConfig::default()
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.level.to_string());
        if self.use_env_filter {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
        } else {
            fallback()
        }
    }
}

/// Install the global subscriber, writing to stderr. Fails if a subscriber
/// is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(config.with_ansi);

    match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}
