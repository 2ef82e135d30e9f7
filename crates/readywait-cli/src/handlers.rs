//! Subcommand handlers

use crate::commands::{ConfigArgs, WaitArgs};
use crate::config::resolve_options;
use crate::error::{CliError, CliResult};
use readywait::{timeout_from_millis, ElementMatch, SelectorQuery, WaitOutcome, Waiter};
use tracing::info;

/// Wait for the selector and render the match.
///
/// `Ok(None)` means the wait timed out.
pub async fn run_wait(args: &WaitArgs) -> CliResult<Option<String>> {
    let options = resolve_options(&args.options, args.interval)?;
    let waiter = Waiter::with_options(options)?;
    let timeout = args
        .timeout
        .map_or_else(|| options.timeout(), timeout_from_millis);
    let query = SelectorQuery::new(&args.file, &args.selector)?;

    info!(
        file = %args.file.display(),
        selector = %args.selector,
        timeout_ms = timeout.as_millis() as u64,
        interval_ms = options.poll_interval_ms,
        "waiting for element"
    );
    match waiter
        .try_await_element_within(|| query.probe(), timeout)
        .await?
    {
        WaitOutcome::Found(element) => render(&element, args.attr.as_deref()).map(Some),
        WaitOutcome::TimedOut => Ok(None),
    }
}

fn render(element: &ElementMatch, attr: Option<&str>) -> CliResult<String> {
    match attr {
        None => Ok(element.trimmed_text().to_owned()),
        Some(name) => element
            .attr(name)
            .map(str::to_owned)
            .ok_or_else(|| CliError::MissingAttribute {
                tag: element.tag.clone(),
                attr: name.to_owned(),
            }),
    }
}

/// Effective wait options as YAML
pub fn run_config(args: &ConfigArgs) -> CliResult<String> {
    let options = resolve_options(&args.options, None)?;
    Ok(options.to_yaml()?)
}
