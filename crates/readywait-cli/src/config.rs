//! CLI configuration: verbosity, logging and wait options

use crate::commands::OptionsArgs;
use crate::error::{CliError, CliResult};
use readywait::WaitOptions;
use tracing_subscriber::EnvFilter;

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only
    Quiet,
    /// Warnings and errors
    #[default]
    Normal,
    /// Per-wait summaries
    Verbose,
    /// Every poll
    Debug,
}

impl Verbosity {
    /// Derive verbosity from `-q` and the `-v` count
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Default log filter for this level
    #[must_use]
    pub const fn filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "warn,readywait=debug,readywait_cli=debug",
            Self::Debug => "warn,readywait=trace,readywait_cli=trace",
        }
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub fn init_logging(verbosity: Verbosity) -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.filter())),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| CliError::config(format!("failed to initialise logging: {e}")))
}

/// Load wait options from the options file, if any, then apply the interval
/// override
pub fn resolve_options(args: &OptionsArgs, interval_ms: Option<u64>) -> CliResult<WaitOptions> {
    let mut options = match &args.config {
        Some(path) => WaitOptions::from_yaml_file(path)?,
        None => WaitOptions::default(),
    };
    if let Some(interval_ms) = interval_ms {
        options = options.with_poll_interval(interval_ms);
    }
    options.validate()?;
    Ok(options)
}
