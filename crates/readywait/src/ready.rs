//! Callback-driven waiting
//!
//! [`Waiter::on_ready`] checks its query once on the caller's stack. If that
//! misses, further checks run in a task spawned on the current tokio runtime
//! and the caller gets a [`ReadyHandle`] back straight away.
//! [`Waiter::on_ready_local`] does the same on a [`LocalSet`], for queries
//! that hold `!Send` state such as a parsed document.

use crate::result::{WaitError, WaitResult};
use crate::wait::{poll_until, Query, WaitOutcome, Waiter};
use std::convert::Infallible;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::{JoinHandle, LocalSet};
use tokio::time::Instant;
use tracing::{debug, trace};

/// How a callback-driven wait ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadyStatus {
    /// The callback ran with the found value
    Resolved,
    /// The timeout elapsed; the callback never ran
    TimedOut,
    /// [`ReadyHandle::cancel`] stopped the checks; the callback never ran
    Cancelled,
}

/// Handle to a callback-driven wait.
///
/// Dropping the handle does not stop pending checks; they run until the query
/// succeeds or the timeout elapses.
#[derive(Debug)]
#[must_use = "the handle reports whether the element was ready and is the only way to cancel"]
pub struct ReadyHandle {
    ready: bool,
    task: Option<JoinHandle<ReadyStatus>>,
}

impl ReadyHandle {
    const fn ready() -> Self {
        Self {
            ready: true,
            task: None,
        }
    }

    const fn pending(task: JoinHandle<ReadyStatus>) -> Self {
        Self {
            ready: false,
            task: Some(task),
        }
    }

    /// Whether the first, synchronous check succeeded.
    ///
    /// `false` says nothing about later checks; the callback may still run.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether background checks are still scheduled
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop any pending checks. The callback will not run afterwards.
    pub fn cancel(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Wait for the checks to finish.
    ///
    /// A panic raised by the query or the callback resumes here.
    pub async fn finished(self) -> ReadyStatus {
        let Some(task) = self.task else {
            return ReadyStatus::Resolved;
        };
        match task.await {
            Ok(status) => status,
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => ReadyStatus::Cancelled,
        }
    }
}

impl Waiter {
    /// Run `on_found` once `query` succeeds, using the default timeout
    pub fn on_ready<T, Q, F>(&self, query: Q, on_found: F) -> WaitResult<ReadyHandle>
    where
        T: Send + 'static,
        Q: Query<T> + Send + 'static,
        F: FnOnce(T) + Send + 'static,
    {
        self.on_ready_within(query, on_found, self.options.timeout())
    }

    /// Run `on_found` once `query` succeeds within `timeout`.
    ///
    /// If the first check succeeds, `on_found` runs before this returns and
    /// no task is spawned. Otherwise the remaining checks need a tokio
    /// runtime; without one this returns [`WaitError::NoRuntime`].
    ///
    /// Later checks follow the same boundary as [`Waiter::await_element_within`]:
    /// no check runs once `timeout` has elapsed, so with a 100ms interval and a
    /// 250ms timeout the last check is at 200ms.
    pub fn on_ready_within<T, Q, F>(
        &self,
        mut query: Q,
        on_found: F,
        timeout: Duration,
    ) -> WaitResult<ReadyHandle>
    where
        T: Send + 'static,
        Q: Query<T> + Send + 'static,
        F: FnOnce(T) + Send + 'static,
    {
        let started = Instant::now();
        if let Some(value) = query.probe() {
            trace!("query satisfied on first check");
            on_found(value);
            return Ok(ReadyHandle::ready());
        }

        let runtime = Handle::try_current().map_err(|_| WaitError::NoRuntime)?;
        let interval = self.options.poll_interval();
        let task = runtime.spawn(remaining_checks(query, on_found, started, interval, timeout));
        log_scheduled(interval, timeout);
        Ok(ReadyHandle::pending(task))
    }

    /// Like [`Waiter::on_ready_within`], but later checks run as a task on
    /// `local`, so neither the query nor the callback has to be `Send`.
    ///
    /// The checks only make progress while `local` is being driven.
    pub fn on_ready_local<T, Q, F>(
        &self,
        local: &LocalSet,
        mut query: Q,
        on_found: F,
        timeout: Duration,
    ) -> ReadyHandle
    where
        T: 'static,
        Q: Query<T> + 'static,
        F: FnOnce(T) + 'static,
    {
        let started = Instant::now();
        if let Some(value) = query.probe() {
            trace!("query satisfied on first check");
            on_found(value);
            return ReadyHandle::ready();
        }

        let interval = self.options.poll_interval();
        let task = local.spawn_local(remaining_checks(query, on_found, started, interval, timeout));
        log_scheduled(interval, timeout);
        ReadyHandle::pending(task)
    }
}

fn remaining_checks<T, Q, F>(
    mut query: Q,
    on_found: F,
    started: Instant,
    interval: Duration,
    timeout: Duration,
) -> impl Future<Output = ReadyStatus>
where
    Q: Query<T>,
    F: FnOnce(T),
{
    async move {
        let mut check = || Ok::<_, Infallible>(query.probe());
        match poll_until(&mut check, started, interval, timeout).await {
            Ok(WaitOutcome::Found(value)) => {
                on_found(value);
                ReadyStatus::Resolved
            }
            Ok(WaitOutcome::TimedOut) => ReadyStatus::TimedOut,
            Err(never) => match never {},
        }
    }
}

fn log_scheduled(interval: Duration, timeout: Duration) {
    debug!(
        interval_ms = interval.as_millis() as u64,
        timeout_ms = timeout.as_millis() as u64,
        "scheduled background checks"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::wait::pause;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Shared counters for a query that misses `misses` times
    #[derive(Clone, Default)]
    struct Probe {
        probes: Arc<AtomicUsize>,
        found: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Probe {
        fn query(&self, misses: usize) -> impl FnMut() -> Option<&'static str> + Send + 'static {
            let probes = Arc::clone(&self.probes);
            move || (probes.fetch_add(1, Ordering::SeqCst) >= misses).then_some("ok")
        }

        fn callback(&self) -> impl FnOnce(&'static str) + Send + 'static {
            let found = Arc::clone(&self.found);
            move |value| found.lock().unwrap().push(value)
        }

        fn probes(&self) -> usize {
            self.probes.load(Ordering::SeqCst)
        }

        fn calls(&self) -> Vec<&'static str> {
            self.found.lock().unwrap().clone()
        }
    }

    mod immediate_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_ready_invokes_callback_before_returning() {
            let probe = Probe::default();
            let handle = Waiter::new()
                .on_ready(probe.query(0), probe.callback())
                .unwrap();

            assert!(handle.is_ready());
            assert!(!handle.is_pending());
            assert_eq!(probe.calls(), vec!["ok"]);
            assert_eq!(handle.finished().await, ReadyStatus::Resolved);
            assert_eq!(probe.probes(), 1);
        }

        #[test]
        fn test_ready_without_runtime() {
            let probe = Probe::default();
            let handle = Waiter::new()
                .on_ready(probe.query(0), probe.callback())
                .unwrap();
            assert!(handle.is_ready());
            assert_eq!(probe.calls(), vec!["ok"]);
        }

        #[test]
        fn test_pending_without_runtime_is_error() {
            let probe = Probe::default();
            let err = Waiter::new()
                .on_ready(probe.query(1), probe.callback())
                .unwrap_err();
            assert!(matches!(err, WaitError::NoRuntime));
            assert_eq!(probe.probes(), 1);
            assert!(probe.calls().is_empty());
        }
    }

    mod background_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_late_success_reports_not_ready() {
            let probe = Probe::default();
            let handle = Waiter::new()
                .on_ready(probe.query(2), probe.callback())
                .unwrap();

            assert!(!handle.is_ready());
            assert!(probe.calls().is_empty());

            pause(150).await;
            assert!(probe.calls().is_empty());

            pause(100).await;
            assert_eq!(probe.calls(), vec!["ok"]);
            assert!(!handle.is_ready());
            assert_eq!(handle.finished().await, ReadyStatus::Resolved);
            assert_eq!(probe.probes(), 3);
        }

        #[tokio::test(start_paused = true)]
        async fn test_timeout_is_silent() {
            let probe = Probe::default();
            let handle = Waiter::new()
                .on_ready_within(probe.query(usize::MAX), probe.callback(), Duration::from_millis(250))
                .unwrap();

            assert_eq!(handle.finished().await, ReadyStatus::TimedOut);
            assert!(probe.calls().is_empty());
            assert_eq!(probe.probes(), 3);
        }

        #[tokio::test(start_paused = true)]
        async fn test_no_checks_after_success() {
            let probe = Probe::default();
            let handle = Waiter::new()
                .on_ready(probe.query(1), probe.callback())
                .unwrap();

            pause(1_000).await;
            assert!(!handle.is_pending());
            assert_eq!(probe.probes(), 2);
            assert_eq!(probe.calls().len(), 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_dropping_handle_keeps_checking() {
            let probe = Probe::default();
            drop(
                Waiter::new()
                    .on_ready(probe.query(3), probe.callback())
                    .unwrap(),
            );

            pause(500).await;
            assert_eq!(probe.calls(), vec!["ok"]);
        }
    }

    mod cancel_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_cancel_stops_checks() {
            let probe = Probe::default();
            let handle = Waiter::new()
                .on_ready(probe.query(5), probe.callback())
                .unwrap();

            pause(150).await;
            assert!(handle.is_pending());
            handle.cancel();

            pause(1_000).await;
            assert_eq!(probe.probes(), 2);
            assert!(probe.calls().is_empty());
            assert_eq!(handle.finished().await, ReadyStatus::Cancelled);
        }

        #[tokio::test(start_paused = true)]
        async fn test_cancel_after_resolution_is_noop() {
            let probe = Probe::default();
            let handle = Waiter::new()
                .on_ready(probe.query(1), probe.callback())
                .unwrap();

            pause(200).await;
            handle.cancel();
            assert_eq!(handle.finished().await, ReadyStatus::Resolved);
            assert_eq!(probe.calls().len(), 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_cancel_ready_handle_is_noop() {
            let probe = Probe::default();
            let handle = Waiter::new()
                .on_ready(probe.query(0), probe.callback())
                .unwrap();
            handle.cancel();
            assert_eq!(handle.finished().await, ReadyStatus::Resolved);
        }
    }

    mod local_tests {
        use super::*;
        use std::cell::RefCell;
        use std::rc::Rc;

        #[tokio::test(start_paused = true)]
        async fn test_non_send_query_on_local_set() {
            let local = LocalSet::new();
            let document: Rc<RefCell<Option<&'static str>>> = Rc::default();
            let seen: Rc<RefCell<Vec<&'static str>>> = Rc::default();

            let query_doc = Rc::clone(&document);
            let seen_by_callback = Rc::clone(&seen);
            let handle = Waiter::new().on_ready_local(
                &local,
                move || *query_doc.borrow(),
                move |value| seen_by_callback.borrow_mut().push(value),
                Duration::from_millis(1_000),
            );
            assert!(!handle.is_ready());

            let status = local
                .run_until(async {
                    pause(250).await;
                    *document.borrow_mut() = Some("rendered");
                    handle.finished().await
                })
                .await;

            assert_eq!(status, ReadyStatus::Resolved);
            assert_eq!(*seen.borrow(), vec!["rendered"]);
        }

        #[tokio::test(start_paused = true)]
        async fn test_local_ready_runs_callback_immediately() {
            let local = LocalSet::new();
            let seen = Rc::new(RefCell::new(Vec::new()));
            let seen_by_callback = Rc::clone(&seen);
            let handle = Waiter::new().on_ready_local(
                &local,
                || Some(Rc::new("ok")),
                move |value: Rc<&'static str>| seen_by_callback.borrow_mut().push(*value),
                Duration::from_millis(250),
            );

            assert!(handle.is_ready());
            assert_eq!(*seen.borrow(), vec!["ok"]);
        }

        #[tokio::test(start_paused = true)]
        async fn test_local_timeout_uses_same_boundary() {
            let local = LocalSet::new();
            let probe = Probe::default();
            let handle = Waiter::new().on_ready_local(
                &local,
                probe.query(usize::MAX),
                probe.callback(),
                Duration::from_millis(250),
            );

            let status = local.run_until(handle.finished()).await;
            assert_eq!(status, ReadyStatus::TimedOut);
            assert_eq!(probe.probes(), 3);
            assert!(probe.calls().is_empty());
        }
    }

    #[tokio::test(start_paused = true)]
    #[should_panic(expected = "selector blew up")]
    async fn test_query_panic_resurfaces_from_finished() {
        let probes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&probes);
        let handle = Waiter::new()
            .on_ready(
                move || -> Option<()> {
                    if counter.fetch_add(1, Ordering::SeqCst) == 1 {
                        panic!("selector blew up");
                    }
                    None
                },
                |()| {},
            )
            .unwrap();
        let _ = handle.finished().await;
    }
}
