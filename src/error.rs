//! Error types for Pipeflow.

use thiserror::Error;

/// Result type alias using Pipeflow's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Pipeflow operations.
///
/// Every read path returns either a byte vector (an empty vector is a
/// successful, empty read) or this error. Write paths do not error; a
/// rejected write is reported by its `bool` return value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A read or extract could not be satisfied.
    ///
    /// The message distinguishes the failing condition: the queue is in the
    /// error state ("buffer is not readable"), or fewer bytes are present
    /// than requested ("insufficient data to read" / "insufficient data to
    /// extract").
    #[error("{0}")]
    InsufficientData(String),
}
