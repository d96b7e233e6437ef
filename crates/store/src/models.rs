//! Record types crossing the sink boundary.

use crate::payload::Payload;
use shapex_decode::models::BoundingBox;

/// Persisted surrogate identifier of a document.
pub type DocumentId = i64;
/// Persisted surrogate identifier of a dictionary.
pub type DictionaryId = i64;
/// Persisted surrogate identifier of a shape.
pub type ShapeId = i64;
/// Persisted surrogate identifier of a blit.
pub type BlitId = i64;

/// Sentinel page number marking a shared (inherited) dictionary.
pub const SHARED_DICTIONARY_PAGE: i64 = -1;

/// A shape record to be persisted.
///
/// `parent` is already translated to a persisted identifier; local-index
/// translation is the export engine's job, and the referenced parent row
/// must exist before this record is stored.
#[derive(Debug)]
pub struct NewShape<'a> {
    pub dictionary: DictionaryId,
    /// Local index within the owning dictionary, as decoded.
    pub original_id: u32,
    pub parent: Option<ShapeId>,
    pub width: usize,
    pub height: usize,
    /// `None` when the shape has no bitmap, or the bitmap is all blank.
    pub bbox: Option<BoundingBox>,
    /// `None` when the shape has no bitmap.
    pub payload: Option<&'a Payload>,
}

/// A blit record to be persisted. The shape reference is a persisted
/// identifier, never a local index.
#[derive(Clone, Copy, Debug)]
pub struct NewBlit {
    pub document: DocumentId,
    pub page_number: i64,
    pub shape: ShapeId,
    pub left: u16,
    pub bottom: u16,
}
