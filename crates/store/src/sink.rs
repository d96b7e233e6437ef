use crate::error::Result;
use crate::models::{BlitId, DictionaryId, DocumentId, NewBlit, NewShape, ShapeId};
use async_trait::async_trait;
use std::sync::Arc;

/// Shared handle to a sink implementation.
pub type SinkHandle = Arc<dyn ShapeSink + Send + Sync>;

/// Unified interface for shape persistence.
///
/// This is the boundary the export engine drives: document, dictionary,
/// shape, blit and page-link records, with surrogate identifiers assigned
/// by the sink. All operations are parameterized at the implementation
/// level; callers hand over values, never formatted command strings.
///
/// Implementations are expected to assign identifiers such that a record
/// stored earlier compares lower, which the engine relies on for the
/// parent-before-child ordering invariant.
// TODO: When `dyn async trait` stabilizes, migrate to native 2024 Edition async traits.
#[async_trait]
pub trait ShapeSink: Send + Sync {
    /// Resolve the document's surrogate id, creating the record on first
    /// sight. Keyed on the document name so repeat runs against the same
    /// store reuse the id.
    async fn lookup_or_create_document(&self, name: &str, address: &str) -> Result<DocumentId>;

    /// Find a shared (inherited) dictionary by name, across documents.
    async fn find_shared_dictionary(&self, name: &str) -> Result<Option<DictionaryId>>;

    /// Find a page-scoped dictionary by owning document, name and page
    /// number.
    async fn find_page_dictionary(
        &self,
        document: DocumentId,
        name: &str,
        page_number: i64,
    ) -> Result<Option<DictionaryId>>;

    /// Create a dictionary record. Shared dictionaries use
    /// [`SHARED_DICTIONARY_PAGE`](crate::models::SHARED_DICTIONARY_PAGE)
    /// as their page number.
    async fn create_dictionary(
        &self,
        document: DocumentId,
        name: &str,
        page_number: i64,
    ) -> Result<DictionaryId>;

    /// Fetch a dictionary's persisted shape ids keyed by original local
    /// index, in ascending index order.
    async fn dictionary_shapes(&self, dictionary: DictionaryId) -> Result<Vec<(u32, ShapeId)>>;

    /// Persist one shape, returning its assigned identifier. The bitmap
    /// payload is consumed through the chunked transport; the persisted
    /// blob must equal the in-order concatenation of the chunks.
    async fn store_shape(&self, shape: NewShape<'_>) -> Result<ShapeId>;

    /// Persist one blit, returning its assigned identifier.
    async fn store_blit(&self, blit: NewBlit) -> Result<BlitId>;

    /// Record (or update) the page-to-inherited-dictionary association.
    /// Written for every processed page; `dictionary` is `None` when the
    /// page declares no inheritance.
    async fn link_page(
        &self,
        document: DocumentId,
        page_number: i64,
        dictionary: Option<DictionaryId>,
    ) -> Result<()>;
}
