//! readywait CLI library
//!
//! Command-line wrapper around [`readywait`]: watch an HTML file until a CSS
//! selector matches, then print the element.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
mod handlers;

pub use commands::{Cli, Commands, ConfigArgs, OptionsArgs, WaitArgs};
pub use config::{init_logging, resolve_options, Verbosity};
pub use error::{CliError, CliResult};
pub use handlers::{run_config, run_wait};
