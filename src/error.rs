//! Value Layer Error Types

use std::io;
use thiserror::Error;

use crate::value::ValueKind;

/// Errors raised by value construction, casts, comparison and arithmetic
#[derive(Error, Debug)]
pub enum ValueError {
    /// A non-constructible or unknown kind was requested
    #[error("Unknown data type in {operation}: {kind}")]
    UnsupportedType {
        operation: &'static str,
        kind: String,
    },

    /// Declared precision or scale is outside the range the kind permits
    #[error("Invalid parameters for type {kind}: {detail}")]
    InvalidTypeParameter { kind: ValueKind, detail: String },

    /// A conversion failed irrecoverably
    #[error("Data conversion error in {operation} converting {source_kind} to {target_kind}: {detail}")]
    DataConversion {
        operation: &'static str,
        source_kind: ValueKind,
        target_kind: ValueKind,
        detail: String,
    },

    /// Modulus or remainder with a zero divisor
    #[error("Division by zero in {operation}: {dividend}")]
    DivisionByZero {
        operation: &'static str,
        dividend: String,
    },

    /// Temporal literal could not be parsed
    #[error("Cannot parse date-time constant in {operation}: \"{text}\"")]
    InvalidDatetimeFormat {
        operation: &'static str,
        text: String,
    },

    /// Named zone region could not be resolved
    #[error("Unknown time zone in {operation}: \"{zone}\"")]
    UnknownTimeZone {
        operation: &'static str,
        zone: String,
    },

    /// Reading or spooling a large object failed
    #[error("LOB I/O error in {operation}: {source}")]
    LobIo {
        operation: &'static str,
        #[source]
        source: io::Error,
    },
}

impl ValueError {
    pub(crate) fn conversion(
        operation: &'static str,
        source_kind: ValueKind,
        target_kind: ValueKind,
        detail: impl Into<String>,
    ) -> Self {
        ValueError::DataConversion {
            operation,
            source_kind,
            target_kind,
            detail: detail.into(),
        }
    }

    pub(crate) fn lob_io(operation: &'static str, source: io::Error) -> Self {
        ValueError::LobIo { operation, source }
    }

    pub(crate) fn datetime(operation: &'static str, text: &str) -> Self {
        ValueError::InvalidDatetimeFormat {
            operation,
            text: text.to_string(),
        }
    }
}

/// Result type for value layer operations
pub type ValueResult<T> = Result<T, ValueError>;
