//! Element waiting
//!
//! Resolve a [`Query`] against a target that changes underneath us (a page
//! being rendered, a file being rewritten) by re-checking it on a fixed
//! interval until it succeeds or the timeout runs out.
//!
//! ## Timing
//!
//! - The query is always checked once before any time is measured.
//! - Elapsed time counts from that first check and is compared after each
//!   sleep, before the next check.
//! - With a 100ms interval and a 250ms timeout the query runs at 0, 100 and
//!   200ms; at 300ms the budget is spent and the wait resolves `TimedOut`.
//!
//! Dropping a pending wait drops its timer; nothing keeps polling afterwards.

use crate::options::WaitOptions;
use crate::result::WaitResult;
use std::convert::Infallible;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

// =============================================================================
// QUERY
// =============================================================================

/// A single lookup that either finds its target or reports nothing yet
pub trait Query<T> {
    /// Look for the target once
    fn probe(&mut self) -> Option<T>;
}

impl<T, F> Query<T> for F
where
    F: FnMut() -> Option<T>,
{
    fn probe(&mut self) -> Option<T> {
        self()
    }
}

// =============================================================================
// WAIT OUTCOME
// =============================================================================

/// Terminal result of a polling sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub enum WaitOutcome<T> {
    /// The query succeeded with this value
    Found(T),
    /// The timeout elapsed before the query succeeded
    TimedOut,
}

impl<T> WaitOutcome<T> {
    /// Check if the query succeeded
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Check if the wait ran out of time
    #[must_use]
    pub const fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }

    /// Take the found value, if any
    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::TimedOut => None,
        }
    }

    /// Map the found value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> WaitOutcome<U> {
        match self {
            Self::Found(value) => WaitOutcome::Found(f(value)),
            Self::TimedOut => WaitOutcome::TimedOut,
        }
    }
}

impl<T> From<WaitOutcome<T>> for Option<T> {
    fn from(outcome: WaitOutcome<T>) -> Self {
        outcome.found()
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Polls queries on a fixed interval
#[derive(Debug, Clone, Copy, Default)]
pub struct Waiter {
    pub(crate) options: WaitOptions,
}

impl Waiter {
    /// Create a waiter with the default 100ms interval and 5s timeout
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a waiter with custom options
    pub fn with_options(options: WaitOptions) -> WaitResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Options this waiter polls with
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Wait for `query` using the configured default timeout
    pub async fn await_element<T, Q>(&self, query: Q) -> WaitOutcome<T>
    where
        Q: Query<T>,
    {
        self.await_element_within(query, self.options.timeout())
            .await
    }

    /// Wait for `query`, giving up once `timeout` has elapsed.
    ///
    /// Returns without suspending when the first check succeeds.
    pub async fn await_element_within<T, Q>(&self, mut query: Q, timeout: Duration) -> WaitOutcome<T>
    where
        Q: Query<T>,
    {
        let result = self
            .try_await_element_within(|| Ok::<_, Infallible>(query.probe()), timeout)
            .await;
        match result {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }

    /// Wait for a fallible query using the configured default timeout
    pub async fn try_await_element<T, E, F>(&self, query: F) -> Result<WaitOutcome<T>, E>
    where
        F: FnMut() -> Result<Option<T>, E>,
    {
        self.try_await_element_within(query, self.options.timeout())
            .await
    }

    /// Wait for a fallible query.
    ///
    /// The first `Err` the query returns stops polling and is handed back
    /// unchanged.
    pub async fn try_await_element_within<T, E, F>(
        &self,
        mut query: F,
        timeout: Duration,
    ) -> Result<WaitOutcome<T>, E>
    where
        F: FnMut() -> Result<Option<T>, E>,
    {
        let started = Instant::now();
        if let Some(value) = query()? {
            trace!("query satisfied on first check");
            return Ok(WaitOutcome::Found(value));
        }
        poll_until(&mut query, started, self.options.poll_interval(), timeout).await
    }
}

/// Re-check `query` every `interval` after a first failed check made at
/// `started`, until it succeeds or `timeout` has elapsed since `started`.
pub(crate) async fn poll_until<T, E, F>(
    query: &mut F,
    started: Instant,
    interval: Duration,
    timeout: Duration,
) -> Result<WaitOutcome<T>, E>
where
    F: FnMut() -> Result<Option<T>, E>,
{
    let mut checks: u32 = 1;
    while started.elapsed() < timeout {
        tokio::time::sleep(interval).await;
        if started.elapsed() >= timeout {
            break;
        }
        checks += 1;
        if let Some(value) = query()? {
            debug!(checks, elapsed_ms = elapsed_ms(started), "query satisfied");
            return Ok(WaitOutcome::Found(value));
        }
        trace!(checks, "query not satisfied yet");
    }
    debug!(
        checks,
        elapsed_ms = elapsed_ms(started),
        timeout_ms = timeout.as_millis() as u64,
        "wait timed out"
    );
    Ok(WaitOutcome::TimedOut)
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

// =============================================================================
// CONVENIENCE FUNCTIONS
// =============================================================================

/// Wait for `query` with the default interval and the given timeout
pub async fn wait_for<T, Q>(query: Q, timeout_ms: u64) -> WaitOutcome<T>
where
    Q: Query<T>,
{
    Waiter::new()
        .await_element_within(query, Duration::from_millis(timeout_ms))
        .await
}

/// Sleep for a fixed duration (prefer waiting on a query)
pub async fn pause(duration_ms: u64) {
    tokio::time::sleep(Duration::from_millis(duration_ms)).await;
}
