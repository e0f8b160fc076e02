//! Error types for the signal-store crate.

use crate::types::{ItemId, UserId};
use thiserror::Error;

/// Errors that can occur while loading signals or building matrices.
#[derive(Error, Debug)]
pub enum SignalError {
    /// I/O error occurred while reading a signal file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Line in a signal file couldn't be parsed
    ///
    /// This variant stores context about where the error occurred
    #[error("Parse error at line {line} in {file}: {reason}")]
    Parse {
        file: String,
        line: usize,
        reason: String,
    },

    /// A field had an invalid value (e.g., a negative interaction weight)
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// A record referenced a user the registry has never seen.
    ///
    /// Unreachable when the registry was built from the union of all
    /// sources; surfacing it means the registry and the record sets got
    /// out of sync.
    #[error("Unknown user id {0}: not present in the identifier registry")]
    UnknownUser(UserId),

    /// A record referenced an item the registry has never seen.
    #[error("Unknown item id {0}: not present in the identifier registry")]
    UnknownItem(ItemId),

    /// Two matrices disagreed on dimensions during fusion.
    ///
    /// Indicates a registry/builder inconsistency, not a data problem.
    #[error("Matrix shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, SignalError>;
