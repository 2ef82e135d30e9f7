//! Wait options
//!
//! The poll interval is fixed per [`Waiter`](crate::Waiter); only the timeout
//! varies per call. Options can be built in code or loaded from YAML:
//!
//! ```yaml
//! poll_interval_ms: 100
//! timeout_ms: 5000
//! ```

use crate::result::{WaitError, WaitResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default timeout for wait operations (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Options shared by every wait issued through one [`Waiter`](crate::Waiter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaitOptions {
    /// Polling interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Timeout used when a call does not give its own, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

const fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

const fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Check the options can drive a polling loop
    pub fn validate(&self) -> WaitResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(WaitError::invalid_options(
                "poll_interval_ms must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Parse and validate options from a YAML document
    pub fn from_yaml_str(yaml: &str) -> WaitResult<Self> {
        let options: Self = serde_yaml_ng::from_str(yaml)?;
        options.validate()?;
        Ok(options)
    }

    /// Read, parse and validate options from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> WaitResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize the options as YAML
    pub fn to_yaml(&self) -> WaitResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

/// Convert a signed millisecond timeout into a `Duration`.
///
/// Negative values become zero, which the waiter treats as an immediate
/// timeout after a single check.
#[must_use]
pub fn timeout_from_millis(ms: i64) -> Duration {
    Duration::from_millis(u64::try_from(ms).unwrap_or(0))
}
