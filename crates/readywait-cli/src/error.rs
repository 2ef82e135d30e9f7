//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// The matched element lacks the requested attribute
    #[error("<{tag}> matched but has no attribute {attr:?}")]
    MissingAttribute {
        /// Tag of the matched element
        tag: String,
        /// Attribute that was asked for
        attr: String,
    },

    /// readywait library error
    #[error(transparent)]
    Wait(#[from] readywait::WaitError),

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
