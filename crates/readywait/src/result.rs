//! Result and error types for readywait.
//!
//! Running out of time is not an error: it is reported as
//! [`WaitOutcome::TimedOut`](crate::WaitOutcome::TimedOut). The variants here
//! cover configuration mistakes and failures of the built-in query sources.

use thiserror::Error;

/// Result type for readywait operations
pub type WaitResult<T> = Result<T, WaitError>;

/// Errors that can occur while configuring or running a wait
#[derive(Debug, Error)]
pub enum WaitError {
    /// Wait options failed validation
    #[error("Invalid wait options: {message}")]
    InvalidOptions {
        /// Error message
        message: String,
    },

    /// CSS selector could not be parsed
    #[error("Invalid selector {selector:?}: {message}")]
    InvalidSelector {
        /// Selector as given
        selector: String,
        /// Parser message
        message: String,
    },

    /// Background checks were needed but no tokio runtime is running
    #[error("No tokio runtime available to schedule background checks")]
    NoRuntime,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl WaitError {
    /// Create an invalid options error
    #[must_use]
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }

    /// Create an invalid selector error
    #[must_use]
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }
}
