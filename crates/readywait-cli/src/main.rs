//! readywait: wait for an element to appear in an HTML file
//!
//! ## Usage
//!
//! ```bash
//! readywait wait --file page.html --selector '#shortlink-text' --attr value
//! readywait wait -f page.html -s '.titlebox .redditname a' --timeout 10000
//! readywait config --config options.yaml
//! ```
//!
//! Exit status: 0 found, 1 timed out, 2 error.

use clap::Parser;
use readywait_cli::{init_logging, run_config, run_wait, Cli, CliResult, Commands, Verbosity};
use std::process::ExitCode;

const EXIT_TIMED_OUT: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: Cli) -> CliResult<ExitCode> {
    init_logging(Verbosity::from_flags(cli.quiet, cli.verbose))?;

    match cli.command {
        Commands::Wait(args) => {
            // Single-threaded: all checks run on this thread between sleeps
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            match runtime.block_on(run_wait(&args))? {
                Some(output) => {
                    println!("{output}");
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!(
                        "Timed out waiting for {:?} in {}",
                        args.selector,
                        args.file.display()
                    );
                    Ok(ExitCode::from(EXIT_TIMED_OUT))
                }
            }
        }
        Commands::Config(args) => {
            print!("{}", run_config(&args)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
