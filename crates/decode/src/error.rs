//! Decode Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A decode error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for decode operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// All of these mean "this page, file or image object could not be obtained
/// from the source". The export pipeline treats them as recoverable at page
/// granularity: log, skip the page, continue the run.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The document file could not be read.
    #[display("failed to read document")]
    Io,
    /// The document JSON could not be parsed.
    #[display("invalid document JSON")]
    Json,
    /// A page number outside the document was requested.
    #[display("page {_0} out of range")]
    PageOutOfRange(#[error(not(source))] usize),
    /// A bitmap's declared dimensions don't match its pixel data.
    #[display("malformed bitmap: {_0}")]
    MalformedBitmap(#[error(not(source))] String),
    /// A page's structure is internally inconsistent (e.g. an inherited
    /// shape count larger than the shape list).
    #[display("malformed page: {_0}")]
    MalformedPage(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
