//! Page-by-page export orchestration.

use crate::error::{ErrorKind, Result};
use crate::inherit::InheritedDictionaryCache;
use crate::persist::persist_shape;
use crate::table::ShapeTable;
use exn::ResultExt;
use shapex_decode::DocumentSource;
use shapex_decode::models::Page;
use shapex_store::ShapeSink;
use shapex_store::models::{DocumentId, NewBlit};
use std::ops::Range;
use tracing::instrument;

/// Per-run settings, resolved once before the first page.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    /// Display name of the document; documents are keyed on this across
    /// runs.
    pub document_name: String,
    /// Source address or path, stored verbatim.
    pub document_address: String,
    /// Record page-to-inherited-dictionary links without re-persisting
    /// shapes or blits. Every inherited dictionary must already exist in
    /// storage.
    pub links_only: bool,
    /// 1-based inclusive first page, as given on the command line.
    pub from: Option<usize>,
    /// 1-based inclusive last page.
    pub to: Option<usize>,
}

impl ExportOptions {
    pub fn new(document_name: impl Into<String>, document_address: impl Into<String>) -> Self {
        Self {
            document_name: document_name.into(),
            document_address: document_address.into(),
            links_only: false,
            from: None,
            to: None,
        }
    }
}

/// What one export run did.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RunSummary {
    pub pages_processed: usize,
    /// Pages the decode collaborator failed to produce; logged and
    /// skipped, never fatal.
    pub pages_skipped: usize,
    pub shapes_stored: usize,
    pub blits_stored: usize,
    pub dictionaries_created: usize,
}

/// Convert the CLI's 1-based inclusive bounds to a 0-based half-open
/// range, clamped to the document.
fn resolve_range(page_count: usize, from: Option<usize>, to: Option<usize>) -> Result<Range<usize>> {
    let start = from.map_or(0, |from| from.saturating_sub(1));
    let limit = match to {
        Some(to) if (1..page_count).contains(&to) => to,
        _ => page_count,
    };
    if limit <= start {
        exn::bail!(ErrorKind::EmptyPageRange);
    }
    Ok(start..limit)
}

/// Export one document through the sink, page by page.
///
/// Pages are processed strictly in ascending order against a single
/// storage session. A page the source cannot decode is logged and skipped;
/// any storage or integrity failure is fatal and aborts the run with the
/// failing page number attached. Records already written for earlier pages
/// are not rolled back; no transaction spans the run.
#[instrument(skip_all, fields(document = %options.document_name))]
pub async fn export_document(
    sink: &dyn ShapeSink,
    source: &dyn DocumentSource,
    options: &ExportOptions,
) -> Result<RunSummary> {
    let document = sink
        .lookup_or_create_document(&options.document_name, &options.document_address)
        .await
        .or_raise(|| ErrorKind::Storage)?;
    let range = resolve_range(source.page_count(), options.from, options.to)?;

    let mut cache = InheritedDictionaryCache::new();
    let mut summary = RunSummary::default();
    for number in range {
        let page = match source.page(number).and_then(|page| page.validate().map(|()| page)) {
            Ok(page) => page,
            Err(error) => {
                tracing::warn!(page = number, error = ?error, "page could not be decoded, skipping");
                summary.pages_skipped += 1;
                continue;
            },
        };
        process_page(sink, document, &mut cache, &page, options.links_only, &mut summary)
            .await
            .or_raise(|| ErrorKind::Page(number))?;
        summary.pages_processed += 1;
    }
    tracing::info!(
        pages = summary.pages_processed,
        skipped = summary.pages_skipped,
        shapes = summary.shapes_stored,
        blits = summary.blits_stored,
        "export run finished"
    );
    Ok(summary)
}

/// One page: `ResolveInheritance -> PersistPageShapes -> PersistBlits`.
///
/// The page-local translation table lives exactly as long as this call;
/// only the inherited-dictionary cache carries state to the next page.
async fn process_page(
    sink: &dyn ShapeSink,
    document: DocumentId,
    cache: &mut InheritedDictionaryCache,
    page: &Page,
    links_only: bool,
    summary: &mut RunSummary,
) -> Result<()> {
    let inherited = cache.resolve(sink, document, page, links_only).await?;
    if let Some(resolved) = inherited
        && resolved.created
    {
        summary.dictionaries_created += 1;
        summary.shapes_stored += resolved.shape_count;
    }
    let page_number = i64::from(page.number);
    sink.link_page(document, page_number, inherited.map(|resolved| resolved.dictionary))
        .await
        .or_raise(|| ErrorKind::Storage)?;
    if links_only {
        return Ok(());
    }

    let inherited_count = page.inherited_shape_count();
    tracing::info!(
        page = page.number,
        shapes = page.shapes.len(),
        inherited = inherited_count,
        blits = page.blits.len(),
        "processing page"
    );

    let dictionary = match sink
        .find_page_dictionary(document, &page.name, page_number)
        .await
        .or_raise(|| ErrorKind::Storage)?
    {
        Some(existing) => existing,
        None => {
            summary.dictionaries_created += 1;
            sink.create_dictionary(document, &page.name, page_number)
                .await
                .or_raise(|| ErrorKind::Storage)?
        },
    };

    // Page-local shapes, ascending: the source lists parents before
    // children within a dictionary, so every parent is already translated
    // (in one table or the other) by the time a child needs it.
    let mut local = ShapeTable::new();
    for (index, shape) in page.shapes.iter().enumerate().skip(inherited_count) {
        let index = index as u32;
        let parent = if shape.parent < 0 {
            None
        } else {
            let parent_index = shape.parent as u32;
            Some(if (parent_index as usize) < inherited_count {
                cache.table().lookup(parent_index)?
            } else {
                local.lookup(parent_index)?
            })
        };
        let persisted = persist_shape(sink, dictionary, index, shape, parent).await?;
        local.insert(index, persisted)?;
        summary.shapes_stored += 1;
    }

    // Blits are leaves; validity is gated on successful translation.
    for blit in &page.blits {
        let shape = if (blit.shapeno as usize) < inherited_count {
            cache.table().lookup(blit.shapeno)?
        } else {
            local.lookup(blit.shapeno)?
        };
        sink.store_blit(NewBlit {
            document,
            page_number,
            shape,
            left: blit.left,
            bottom: blit.bottom,
        })
        .await
        .or_raise(|| ErrorKind::Storage)?;
        summary.blits_stored += 1;
    }
    Ok(())
}
