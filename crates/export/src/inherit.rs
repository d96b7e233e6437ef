//! Single-slot cache for the current inherited dictionary.

use crate::error::{ErrorKind, Result};
use crate::persist::persist_shape;
use crate::table::ShapeTable;
use exn::ResultExt;
use shapex_decode::models::Page;
use shapex_store::models::{DictionaryId, DocumentId, SHARED_DICTIONARY_PAGE};
use shapex_store::ShapeSink;

/// Outcome of resolving a page's inherited dictionary.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResolvedInheritance {
    /// Persisted identifier of the inherited dictionary.
    pub dictionary: DictionaryId,
    /// Number of shapes the page inherits (the prefix of its shape list).
    pub shape_count: usize,
    /// Whether this resolution created the dictionary record (first sight
    /// of this dictionary in the store).
    pub created: bool,
}

/// Decides whether a page's inherited dictionary is already resident,
/// already persisted, or new, and owns the one translation table for the
/// currently resident shared dictionary.
///
/// The cache holds exactly the most recently used dictionary. Source pages
/// sharing an inherited dictionary are expected to be contiguous, so a
/// single slot captures the common case with O(1) memory; non-contiguous
/// reuse degrades to a miss and a full re-fetch, which is acceptable. On a
/// miss the table is replaced wholesale, never merged.
#[derive(Debug, Default)]
pub struct InheritedDictionaryCache {
    current_name: Option<String>,
    current_dictionary: Option<DictionaryId>,
    table: ShapeTable,
}

impl InheritedDictionaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translation table of the currently resident inherited dictionary.
    /// Empty when no dictionary is current (or in links-only mode, where
    /// shape-level translation is never needed).
    pub fn table(&self) -> &ShapeTable {
        &self.table
    }

    /// Resolve the inherited dictionary for `page`, consulting or
    /// populating the cached translation table.
    ///
    /// Returns `None` without any storage interaction when the page
    /// declares no inheritance. In links-only mode, a dictionary that is
    /// not already persisted is a fatal
    /// [`MissingInheritedDictionary`](ErrorKind::MissingInheritedDictionary)
    /// error, and no shape fetch is performed for dictionaries that do
    /// exist.
    pub async fn resolve(
        &mut self,
        sink: &dyn ShapeSink,
        document: DocumentId,
        page: &Page,
        links_only: bool,
    ) -> Result<Option<ResolvedInheritance>> {
        let Some(inherited) = &page.inherited else {
            return Ok(None);
        };

        if self.current_name.as_deref() == Some(inherited.name.as_str())
            && let Some(dictionary) = self.current_dictionary
        {
            return Ok(Some(ResolvedInheritance {
                dictionary,
                shape_count: inherited.shape_count,
                created: false,
            }));
        }

        // Retire the stale dictionary before any storage I/O, so a failed
        // resolution can't leave a mismatched table behind.
        self.current_name = None;
        self.current_dictionary = None;
        self.table.clear();

        let existing = sink
            .find_shared_dictionary(&inherited.name)
            .await
            .or_raise(|| ErrorKind::Storage)?;
        let (dictionary, created) = match existing {
            Some(dictionary) => {
                if !links_only {
                    let shapes = sink
                        .dictionary_shapes(dictionary)
                        .await
                        .or_raise(|| ErrorKind::Storage)?;
                    for (original, persisted) in shapes {
                        self.table.insert(original, persisted)?;
                    }
                }
                (dictionary, false)
            },
            None if links_only => {
                exn::bail!(ErrorKind::MissingInheritedDictionary(inherited.name.clone()));
            },
            None => {
                tracing::info!(
                    dictionary = %inherited.name,
                    shapes = inherited.shape_count,
                    "persisting new inherited dictionary"
                );
                let dictionary = sink
                    .create_dictionary(document, &inherited.name, SHARED_DICTIONARY_PAGE)
                    .await
                    .or_raise(|| ErrorKind::Storage)?;
                // Inherited shapes may only parent on earlier siblings in
                // the same dictionary, so an ascending scan persists every
                // parent before its children.
                for (index, shape) in page.shapes[..inherited.shape_count].iter().enumerate() {
                    let parent = if shape.parent < 0 {
                        None
                    } else {
                        Some(self.table.lookup(shape.parent as u32)?)
                    };
                    let index = index as u32;
                    let persisted = persist_shape(sink, dictionary, index, shape, parent).await?;
                    self.table.insert(index, persisted)?;
                }
                (dictionary, true)
            },
        };

        self.current_name = Some(inherited.name.clone());
        self.current_dictionary = Some(dictionary);
        Ok(Some(ResolvedInheritance { dictionary, shape_count: inherited.shape_count, created }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shapex_decode::models::{Bitmap, InheritedRef, Shape};
    use shapex_store::MemorySink;

    fn inherited_page(number: u32, dict: &str, shapes: Vec<Shape>) -> Page {
        let shape_count = shapes.len();
        Page {
            number,
            name: format!("p{number:04}.djvu"),
            inherited: Some(InheritedRef { name: dict.to_string(), shape_count }),
            shapes,
            blits: Vec::new(),
        }
    }

    fn glyph() -> Shape {
        Shape::root(Some(Bitmap::from_rows(&["#".to_string()]).unwrap()))
    }

    #[tokio::test]
    async fn test_no_inheritance_means_no_storage_io() {
        let sink = MemorySink::new();
        let mut cache = InheritedDictionaryCache::new();
        let page = Page {
            number: 0,
            name: "p0000.djvu".to_string(),
            inherited: None,
            shapes: Vec::new(),
            blits: Vec::new(),
        };
        let resolved = cache.resolve(&sink, 1, &page, false).await.unwrap();
        assert_eq!(resolved, None);
        assert_eq!(sink.shared_lookups().await, 0);
    }

    #[tokio::test]
    async fn test_new_dictionary_is_created_and_cached() {
        let sink = MemorySink::new();
        let doc = sink.lookup_or_create_document("book.djvu", "x").await.unwrap();
        let mut cache = InheritedDictionaryCache::new();

        let page = inherited_page(0, "shared.djbz", vec![glyph(), Shape::child_of(0, None)]);
        let first = cache.resolve(&sink, doc, &page, false).await.unwrap().unwrap();
        assert!(first.created);
        assert_eq!(first.shape_count, 2);
        assert_eq!(cache.table().len(), 2);
        // Child's parent was translated to the sibling's persisted id.
        let shapes = sink.shapes().await;
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[1].parent, Some(shapes[0].id));

        // Same dictionary on the next page: no further storage interaction.
        let lookups_before = sink.shared_lookups().await;
        let page2 = inherited_page(1, "shared.djbz", vec![glyph(), Shape::child_of(0, None)]);
        let second = cache.resolve(&sink, doc, &page2, false).await.unwrap().unwrap();
        assert!(!second.created);
        assert_eq!(second.dictionary, first.dictionary);
        assert_eq!(sink.shared_lookups().await, lookups_before);
        assert_eq!(sink.shared_creates().await, 1);
    }

    #[tokio::test]
    async fn test_existing_dictionary_is_fetched_not_recreated() {
        let sink = MemorySink::new();
        let doc = sink.lookup_or_create_document("book.djvu", "x").await.unwrap();
        // First run persisted the dictionary.
        let mut first_run = InheritedDictionaryCache::new();
        let page = inherited_page(0, "shared.djbz", vec![glyph(), glyph()]);
        let created = first_run.resolve(&sink, doc, &page, false).await.unwrap().unwrap();

        // A fresh cache (second run) finds it and rebuilds the table from
        // storage instead of creating shapes again.
        let mut cache = InheritedDictionaryCache::new();
        let resolved = cache.resolve(&sink, doc, &page, false).await.unwrap().unwrap();
        assert!(!resolved.created);
        assert_eq!(resolved.dictionary, created.dictionary);
        assert_eq!(cache.table().len(), 2);
        assert_eq!(sink.shapes().await.len(), 2);
        assert_eq!(sink.shared_creates().await, 1);
    }

    #[tokio::test]
    async fn test_single_slot_evicts_on_alternation() {
        let sink = MemorySink::new();
        let doc = sink.lookup_or_create_document("book.djvu", "x").await.unwrap();
        let mut cache = InheritedDictionaryCache::new();
        let page_a = |n| inherited_page(n, "a.djbz", vec![glyph()]);
        let page_b = |n| inherited_page(n, "b.djbz", vec![glyph()]);

        cache.resolve(&sink, doc, &page_a(0), false).await.unwrap();
        cache.resolve(&sink, doc, &page_b(1), false).await.unwrap();
        // A again: the slot only remembers B, so this is a miss.
        cache.resolve(&sink, doc, &page_a(2), false).await.unwrap();
        assert!(sink.shared_lookups().await >= 3);
        // But never re-created: the store already had A.
        assert_eq!(sink.shared_creates().await, 2);
    }

    #[tokio::test]
    async fn test_links_only_skips_shape_fetch() {
        let sink = MemorySink::new();
        let doc = sink.lookup_or_create_document("book.djvu", "x").await.unwrap();
        let page = inherited_page(0, "shared.djbz", vec![glyph()]);
        let mut seed = InheritedDictionaryCache::new();
        seed.resolve(&sink, doc, &page, false).await.unwrap();

        let mut cache = InheritedDictionaryCache::new();
        let resolved = cache.resolve(&sink, doc, &page, true).await.unwrap().unwrap();
        assert!(!resolved.created);
        assert!(cache.table().is_empty());
    }

    #[tokio::test]
    async fn test_links_only_fails_fast_on_unknown_dictionary() {
        let sink = MemorySink::new();
        let doc = sink.lookup_or_create_document("book.djvu", "x").await.unwrap();
        let mut cache = InheritedDictionaryCache::new();
        let page = inherited_page(0, "never-seen.djbz", vec![glyph()]);
        assert!(cache.resolve(&sink, doc, &page, true).await.is_err());
        assert_eq!(sink.shapes().await.len(), 0);
    }
}
