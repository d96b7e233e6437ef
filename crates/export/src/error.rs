//! Export Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// An export error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Everything here is fatal to the run. Decode failures for individual
/// pages never become errors at this level; the pipeline logs and skips
/// those (see [`RunSummary::pages_skipped`](crate::RunSummary)).
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A storage-collaborator operation failed.
    #[display("storage failure")]
    Storage,
    /// A shape or blit references a local index with no translation entry:
    /// malformed or out-of-order source data.
    #[display("no translation for local shape index {_0}")]
    MissingTranslation(#[error(not(source))] u32),
    /// A local index was translated twice within one table lifetime.
    #[display("local shape index {_0} translated twice")]
    DuplicateTranslation(#[error(not(source))] u32),
    /// Links-only mode requires inherited dictionaries to already be
    /// persisted.
    #[display("inherited dictionary {_0:?} not present in storage")]
    MissingInheritedDictionary(#[error(not(source))] String),
    /// The requested page range selects no pages.
    #[display("page range selects no pages")]
    EmptyPageRange,
    /// Context wrapper naming the page a fatal error occurred on.
    #[display("failed while processing page {_0}")]
    Page(#[error(not(source))] usize),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // A storage hiccup is surfaced, not masked; the operator decides
        // whether to rerun.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::MissingTranslation(12).to_string(),
            "no translation for local shape index 12"
        );
        assert_eq!(
            ErrorKind::MissingInheritedDictionary("shared.djbz".to_string()).to_string(),
            "inherited dictionary \"shared.djbz\" not present in storage"
        );
        assert_eq!(ErrorKind::Page(3).to_string(), "failed while processing page 3");
    }

    #[test]
    fn error_kind_never_retryable() {
        assert!(!ErrorKind::Storage.is_retryable());
        assert!(!ErrorKind::DuplicateTranslation(0).is_retryable());
        assert!(!ErrorKind::EmptyPageRange.is_retryable());
    }
}
