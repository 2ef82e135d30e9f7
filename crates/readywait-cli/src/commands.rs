//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// readywait: wait for a CSS selector to match in an HTML file
#[derive(Parser, Debug)]
#[command(name = "readywait")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Wait until an element matching the selector appears
    ///
    /// Prints the element text (or one attribute) and exits 0 when found.
    /// Exits 1 on timeout and 2 on any error.
    Wait(WaitArgs),

    /// Show effective wait options as YAML
    Config(ConfigArgs),
}

/// Options file shared by subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct OptionsArgs {
    /// YAML file with poll_interval_ms / timeout_ms
    #[arg(short, long, env = "READYWAIT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Arguments for the wait command
#[derive(Args, Debug)]
pub struct WaitArgs {
    /// HTML document to watch
    #[arg(short, long)]
    pub file: PathBuf,

    /// CSS selector to wait for
    #[arg(short, long)]
    pub selector: String,

    /// Print this attribute instead of the element text
    #[arg(short, long)]
    pub attr: Option<String>,

    /// Timeout in milliseconds; zero or negative checks exactly once
    #[arg(short, long, allow_negative_numbers = true)]
    pub timeout: Option<i64>,

    /// Poll interval in milliseconds
    #[arg(short, long)]
    pub interval: Option<u64>,

    #[command(flatten)]
    pub options: OptionsArgs,
}

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub options: OptionsArgs,
}
