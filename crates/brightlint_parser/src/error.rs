//! Parse error types.

use thiserror::Error;

/// Errors that can occur during parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source text is not valid JavaScript.
    #[error("Invalid source: {message}")]
    InvalidSource {
        message: String,
        /// Byte offset of the first syntax error, if known.
        offset: Option<usize>,
    },

    /// The grammar could not be loaded or the parser gave up.
    #[error("Internal parser error: {0}")]
    Internal(String),
}

impl ParseError {
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidSource {
            message: message.into(),
            offset: None,
        }
    }

    /// Creates an invalid source error pointing at `offset`.
    pub fn invalid_source_at(message: impl Into<String>, offset: usize) -> Self {
        Self::InvalidSource {
            message: message.into(),
            offset: Some(offset),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Byte offset of the error, for syntax errors.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::InvalidSource { offset, .. } => *offset,
            Self::Internal(_) => None,
        }
    }
}
