use crate::error::Result;
use crate::models::Page;

/// The decode-collaborator boundary.
///
/// A `DocumentSource` hands decoded pages to the export pipeline. Page
/// retrieval is fallible per page: a source may fail to produce one page
/// (truncated container, broken image chunk) while others remain readable,
/// and the pipeline recovers from that by skipping the page.
///
/// Decoding is local CPU work, so this seam is synchronous; only the
/// storage side of the pipeline is async.
pub trait DocumentSource {
    /// Total number of pages in the document.
    fn page_count(&self) -> usize;

    /// Decode page `number` (0-based).
    fn page(&self, number: usize) -> Result<Page>;
}
