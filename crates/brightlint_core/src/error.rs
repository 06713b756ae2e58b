//! Linter error types.

use thiserror::Error;

/// Errors that can occur during linting.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File error (unreadable, too large, not UTF-8).
    #[error("File error: {0}")]
    File(String),

    /// The source could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] brightlint_parser::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a file error.
    pub fn file(message: impl Into<String>) -> Self {
        Self::File(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
