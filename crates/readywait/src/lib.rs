//! readywait: wait for an element to show up
//!
//! A page rendered by someone else's code fills in over time. `readywait`
//! re-checks a lookup on a fixed interval until it succeeds or a timeout runs
//! out, either by suspending the caller ([`Waiter::await_element`]) or by
//! running a callback when the element appears ([`Waiter::on_ready`]).
//!
//! ```no_run
//! use readywait::{SelectorQuery, WaitOutcome, Waiter};
//!
//! # async fn demo() -> readywait::WaitResult<()> {
//! let query = SelectorQuery::new("page.html", "#shortlink-text")?;
//! match Waiter::new().try_await_element(|| query.probe()).await? {
//!     WaitOutcome::Found(input) => println!("{:?}", input.attr("value")),
//!     WaitOutcome::TimedOut => println!("not there yet"),
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod options;
mod ready;
mod result;
mod selector;
mod wait;

pub use options::{timeout_from_millis, WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
pub use ready::{ReadyHandle, ReadyStatus};
pub use result::{WaitError, WaitResult};
pub use selector::{ElementMatch, SelectorQuery};
pub use wait::{pause, wait_for, Query, WaitOutcome, Waiter};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
