//! Error definitions
//!
//! This module provides the error type shared by every link in a chain.

use thiserror::Error;

/// Main error type for linkwise
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The link holds no subject and the operation needed one
    #[error("Empty subject: {0}")]
    EmptySubject(String),

    /// The operation does not apply to the subject it was given
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// An assertion did not hold
    #[error("Expectation failed: {0}")]
    ExpectationFailed(String),

    /// A failure raised by caller-supplied code
    #[error("Raised: {0}")]
    Raised(String),
}

impl Error {
    /// Create an empty subject error.
    #[must_use]
    pub fn empty_subject(message: impl Into<String>) -> Self {
        Self::EmptySubject(message.into())
    }

    /// Create an invalid operation error.
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    /// Create an expectation failed error.
    #[must_use]
    pub fn expectation_failed(message: impl Into<String>) -> Self {
        Self::ExpectationFailed(message.into())
    }

    /// Create an error on behalf of caller code.
    #[must_use]
    pub fn raised(message: impl Into<String>) -> Self {
        Self::Raised(message.into())
    }

    /// Check if this error comes from a missing subject
    #[must_use]
    pub fn is_empty_subject(&self) -> bool {
        matches!(self, Self::EmptySubject(_))
    }

    /// Check if this error comes from a misapplied operation
    #[must_use]
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation(_))
    }

    /// Check if this error is a failed assertion
    #[must_use]
    pub fn is_expectation_failed(&self) -> bool {
        matches!(self, Self::ExpectationFailed(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
