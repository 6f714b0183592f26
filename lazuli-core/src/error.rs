// lazuli-core - Error types for list and sequence operations
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Error types shared across the collection and sequence modules.
//!
//! Operations that force deferred work return [`Result`]: realizing a
//! lazy tail or pulling from an iterator source can fail, and the
//! failure travels to the caller that demanded the element. Errors
//! raised by hosted code pass through as [`Error::Thrown`] with their
//! payload intact.

use std::fmt;

use crate::value::Value;

/// Result type for list and sequence operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the collection and sequence operations.
#[derive(Debug, Clone)]
pub enum Error {
    /// An operation reached outside the bounds of a collection
    OutOfRange {
        context: &'static str,
        length: usize,
    },
    /// A value had the wrong type for an operation
    TypeError {
        expected: &'static str,
        got: &'static str,
        context: Option<String>,
    },
    /// A failure raised by hosted code, carried through unchanged
    Thrown(Value),
}

impl Error {
    /// Create an out-of-range error for the named operation.
    pub fn out_of_range(context: &'static str, length: usize) -> Self {
        Error::OutOfRange { context, length }
    }

    /// Create a type error without operation context.
    pub fn type_error(expected: &'static str, got: &'static str) -> Self {
        Error::TypeError {
            expected,
            got,
            context: None,
        }
    }

    /// Create a type error naming the operation that rejected the value.
    pub fn type_error_in(
        context: impl Into<String>,
        expected: &'static str,
        got: &'static str,
    ) -> Self {
        Error::TypeError {
            expected,
            got,
            context: Some(context.into()),
        }
    }

    /// Wrap a hosted value as a thrown error.
    pub fn thrown(value: Value) -> Self {
        Error::Thrown(value)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange { context, length } => {
                write!(
                    f,
                    "{}: out of range for collection of length {}",
                    context, length
                )
            }
            Error::TypeError {
                expected,
                got,
                context: Some(context),
            } => {
                write!(f, "{}: expected {}, got {}", context, expected, got)
            }
            Error::TypeError {
                expected,
                got,
                context: None,
            } => {
                write!(f, "Type error: expected {}, got {}", expected, got)
            }
            Error::Thrown(value) => write!(f, "Thrown: {}", value),
        }
    }
}

impl std::error::Error for Error {}
