//! In-memory sink for testing.

use crate::error::{ErrorKind, Result};
use crate::models::{BlitId, DictionaryId, DocumentId, NewBlit, NewShape, ShapeId, SHARED_DICTIONARY_PAGE};
use crate::sink::ShapeSink;
use async_trait::async_trait;
use shapex_decode::models::BoundingBox;
use tokio::sync::RwLock;

/// A persisted document, as recorded by [`MemorySink`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DocumentRecord {
    pub id: DocumentId,
    pub name: String,
    pub address: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DictionaryRecord {
    pub id: DictionaryId,
    pub document: DocumentId,
    pub name: String,
    pub page_number: i64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShapeRecord {
    pub id: ShapeId,
    pub dictionary: DictionaryId,
    pub original_id: u32,
    pub parent: Option<ShapeId>,
    pub width: usize,
    pub height: usize,
    pub bbox: Option<BoundingBox>,
    pub bits: Option<Vec<u8>>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlitRecord {
    pub id: BlitId,
    pub document: DocumentId,
    pub page_number: i64,
    pub shape: ShapeId,
    pub left: u16,
    pub bottom: u16,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PageRecord {
    pub document: DocumentId,
    pub page_number: i64,
    pub dictionary: Option<DictionaryId>,
}

#[derive(Default)]
struct State {
    next_id: i64,
    documents: Vec<DocumentRecord>,
    dictionaries: Vec<DictionaryRecord>,
    shapes: Vec<ShapeRecord>,
    blits: Vec<BlitRecord>,
    pages: Vec<PageRecord>,
    shared_lookups: usize,
    shared_creates: usize,
}

impl State {
    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory sink for testing.
///
/// Records every call behind a [`RwLock`], so all trait methods operate on
/// `&self` without external synchronisation. Identifiers are assigned from
/// a single monotonic counter, matching the ordering guarantee real sinks
/// provide. Ideal for pipeline tests that need a [`ShapeSink`] without a
/// database, plus call counters for cache-interaction assertions.
#[derive(Default)]
pub struct MemorySink {
    state: RwLock<State>,
    fail_writes: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose mutating operations all fail with a database error,
    /// for exercising fatal-abort paths.
    pub fn failing() -> Self {
        Self { state: RwLock::default(), fail_writes: true }
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            exn::bail!(ErrorKind::Database);
        }
        Ok(())
    }

    pub async fn documents(&self) -> Vec<DocumentRecord> {
        self.state.read().await.documents.clone()
    }

    pub async fn dictionaries(&self) -> Vec<DictionaryRecord> {
        self.state.read().await.dictionaries.clone()
    }

    pub async fn shapes(&self) -> Vec<ShapeRecord> {
        self.state.read().await.shapes.clone()
    }

    pub async fn blits(&self) -> Vec<BlitRecord> {
        self.state.read().await.blits.clone()
    }

    pub async fn pages(&self) -> Vec<PageRecord> {
        self.state.read().await.pages.clone()
    }

    /// How many times a shared dictionary was looked up by name.
    pub async fn shared_lookups(&self) -> usize {
        self.state.read().await.shared_lookups
    }

    /// How many shared dictionary records were created.
    pub async fn shared_creates(&self) -> usize {
        self.state.read().await.shared_creates
    }
}

#[async_trait]
impl ShapeSink for MemorySink {
    async fn lookup_or_create_document(&self, name: &str, address: &str) -> Result<DocumentId> {
        self.check_writable()?;
        let mut state = self.state.write().await;
        if let Some(existing) = state.documents.iter().find(|d| d.name == name) {
            return Ok(existing.id);
        }
        let id = state.assign_id();
        state.documents.push(DocumentRecord {
            id,
            name: name.to_string(),
            address: address.to_string(),
        });
        Ok(id)
    }

    async fn find_shared_dictionary(&self, name: &str) -> Result<Option<DictionaryId>> {
        let mut state = self.state.write().await;
        state.shared_lookups += 1;
        Ok(state
            .dictionaries
            .iter()
            .find(|d| d.name == name && d.page_number == SHARED_DICTIONARY_PAGE)
            .map(|d| d.id))
    }

    async fn find_page_dictionary(
        &self,
        document: DocumentId,
        name: &str,
        page_number: i64,
    ) -> Result<Option<DictionaryId>> {
        let state = self.state.read().await;
        Ok(state
            .dictionaries
            .iter()
            .find(|d| d.document == document && d.name == name && d.page_number == page_number)
            .map(|d| d.id))
    }

    async fn create_dictionary(
        &self,
        document: DocumentId,
        name: &str,
        page_number: i64,
    ) -> Result<DictionaryId> {
        self.check_writable()?;
        let mut state = self.state.write().await;
        if page_number == SHARED_DICTIONARY_PAGE {
            state.shared_creates += 1;
        }
        let id = state.assign_id();
        state.dictionaries.push(DictionaryRecord {
            id,
            document,
            name: name.to_string(),
            page_number,
        });
        Ok(id)
    }

    async fn dictionary_shapes(&self, dictionary: DictionaryId) -> Result<Vec<(u32, ShapeId)>> {
        let state = self.state.read().await;
        let mut shapes: Vec<(u32, ShapeId)> = state
            .shapes
            .iter()
            .filter(|s| s.dictionary == dictionary)
            .map(|s| (s.original_id, s.id))
            .collect();
        shapes.sort_by_key(|(original, _)| *original);
        Ok(shapes)
    }

    async fn store_shape(&self, shape: NewShape<'_>) -> Result<ShapeId> {
        self.check_writable()?;
        // Consume the chunked transport exactly like a real sink would.
        let bits = shape.payload.map(|payload| {
            let mut bytes = Vec::with_capacity(payload.len());
            for chunk in payload.chunks() {
                bytes.extend_from_slice(chunk);
            }
            bytes
        });
        let mut state = self.state.write().await;
        let id = state.assign_id();
        state.shapes.push(ShapeRecord {
            id,
            dictionary: shape.dictionary,
            original_id: shape.original_id,
            parent: shape.parent,
            width: shape.width,
            height: shape.height,
            bbox: shape.bbox,
            bits,
        });
        Ok(id)
    }

    async fn store_blit(&self, blit: NewBlit) -> Result<BlitId> {
        self.check_writable()?;
        let mut state = self.state.write().await;
        let id = state.assign_id();
        state.blits.push(BlitRecord {
            id,
            document: blit.document,
            page_number: blit.page_number,
            shape: blit.shape,
            left: blit.left,
            bottom: blit.bottom,
        });
        Ok(id)
    }

    async fn link_page(
        &self,
        document: DocumentId,
        page_number: i64,
        dictionary: Option<DictionaryId>,
    ) -> Result<()> {
        self.check_writable()?;
        let mut state = self.state.write().await;
        if let Some(existing) = state
            .pages
            .iter_mut()
            .find(|p| p.document == document && p.page_number == page_number)
        {
            existing.dictionary = dictionary;
            return Ok(());
        }
        state.pages.push(PageRecord { document, page_number, dictionary });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_and_counts() {
        let sink = MemorySink::new();
        let doc = sink.lookup_or_create_document("book.djvu", "/data/book.djvu").await.unwrap();
        assert!(sink.find_shared_dictionary("shared.djbz").await.unwrap().is_none());
        let dict = sink.create_dictionary(doc, "shared.djbz", SHARED_DICTIONARY_PAGE).await.unwrap();
        assert_eq!(sink.find_shared_dictionary("shared.djbz").await.unwrap(), Some(dict));
        assert_eq!(sink.shared_lookups().await, 2);
        assert_eq!(sink.shared_creates().await, 1);
    }

    #[tokio::test]
    async fn test_failing_sink_rejects_writes() {
        let sink = MemorySink::failing();
        assert!(sink.lookup_or_create_document("book.djvu", "x").await.is_err());
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let sink = MemorySink::new();
        let doc = sink.lookup_or_create_document("book.djvu", "x").await.unwrap();
        let dict = sink.create_dictionary(doc, "p0001.djvu", 0).await.unwrap();
        let shape = sink
            .store_shape(NewShape {
                dictionary: dict,
                original_id: 0,
                parent: None,
                width: 1,
                height: 1,
                bbox: None,
                payload: None,
            })
            .await
            .unwrap();
        assert!(doc < dict && dict < shape);
    }
}
