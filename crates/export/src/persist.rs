//! Shared shape persistence helper.

use crate::bbox;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use shapex_decode::models::Shape;
use shapex_store::models::{DictionaryId, NewShape, ShapeId};
use shapex_store::payload::Payload;
use shapex_store::ShapeSink;

/// Measure and persist one shape under an already-resolved parent id.
///
/// The bitmap, when present, is serialized to PBM and handed to the sink
/// through the chunked transport; its bounding box is computed here. A
/// shape without a bitmap is stored with zero dimensions and NULL box and
/// payload columns, never touching the scanner.
pub(crate) async fn persist_shape(
    sink: &dyn ShapeSink,
    dictionary: DictionaryId,
    original_id: u32,
    shape: &Shape,
    parent: Option<ShapeId>,
) -> Result<ShapeId> {
    let payload = shape.bitmap.as_ref().map(|bitmap| Payload::new(bitmap.to_pbm()));
    let (width, height, bbox) = match &shape.bitmap {
        Some(bitmap) => (bitmap.width(), bitmap.height(), bbox::scan(bitmap)),
        None => (0, 0, None),
    };
    sink.store_shape(NewShape {
        dictionary,
        original_id,
        parent,
        width,
        height,
        bbox,
        payload: payload.as_ref(),
    })
    .await
    .or_raise(|| ErrorKind::Storage)
}
