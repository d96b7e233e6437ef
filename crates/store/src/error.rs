//! Store Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong
/// internally. Every kind here is fatal to an export run: the engine never
/// retries or masks a storage failure.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A prepare/bind/execute-level database failure.
    #[display("database error")]
    Database,
    #[display("database migration error")]
    Migration,
    /// A value did not fit the column it maps to.
    #[display("invalid record data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
    /// A shape payload exceeded the configured single-allocation bound.
    /// Only reachable on non-chunked transport paths.
    #[display("shape payload of {size} bytes exceeds the {limit} byte bound")]
    PayloadTooLarge { size: usize, limit: usize },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
