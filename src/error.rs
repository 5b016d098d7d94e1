//! Crate-wide error type.
//!
//! The variants follow the failure taxonomy of the library:
//! - [`Error::Config`] — invalid constructor arguments, raised synchronously
//!   at construction and never deferred.
//! - [`Error::IndexOutOfRange`] — access to a field index a record does not
//!   have. Distinct from a field that exists but holds a null text.
//! - [`Error::IllegalState`] — a producer/consumer lifecycle method was
//!   called out of sequence. This is a programmer error, not a recoverable
//!   I/O condition.
//! - [`Error::Producer`] / [`Error::Consumer`] — failures wrapped when they
//!   cross the lazy record-stream boundary, preserving the original cause
//!   (and, for consumers, the offending record).
//! - [`Error::Io`] — propagated unwrapped from lifecycle methods.
//! - [`Error::CloseSuppressed`] — both halves of a combined resource failed
//!   to close; the first failure is primary, the second is attached.
//!
//! Nothing is retried automatically; every failure aborts the current
//! pipeline stage and propagates to the caller.

use crate::record::Record;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration passed to a constructor.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A field index outside `0..size` was accessed.
    #[error("field index {index} out of range for record of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// A lifecycle method was invoked in a state that does not permit it.
    #[error("illegal call to '{operation}' in state {state}")]
    IllegalState {
        operation: &'static str,
        state: &'static str,
    },

    /// A failure while producing records, wrapped for the lazy stream.
    #[error("producer failure: {message}")]
    Producer {
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// A record could not be serialized, or writing it failed.
    #[error("consumer failure: {message}")]
    Consumer {
        message: String,
        /// The record that could not be written, for diagnostics.
        record: Option<Box<Record>>,
        #[source]
        source: Option<Box<Error>>,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Closing both halves of a combined resource failed. The primary error
    /// is the first one raised; the second is retained instead of hidden.
    #[error("close failed: {primary} (suppressed: {suppressed})")]
    CloseSuppressed {
        primary: Box<Error>,
        suppressed: Box<Error>,
    },
}

impl Error {
    /// Wrap `self` as a producer failure with an explaining message.
    pub fn into_producer(self, message: impl Into<String>) -> Error {
        Error::Producer {
            message: message.into(),
            source: Some(Box::new(self)),
        }
    }

    /// Wrap `self` as a consumer failure retaining the offending record.
    pub fn into_consumer(self, message: impl Into<String>, record: &Record) -> Error {
        Error::Consumer {
            message: message.into(),
            record: Some(Box::new(record.clone())),
            source: Some(Box::new(self)),
        }
    }

    /// Combine a primary failure with one raised while cleaning up after it.
    pub fn with_suppressed(self, suppressed: Error) -> Error {
        Error::CloseSuppressed {
            primary: Box::new(self),
            suppressed: Box::new(suppressed),
        }
    }
}
