//! Bounding box computation over glyph bitmaps.

use shapex_decode::models::{Bitmap, BoundingBox};

/// Compute the tightest box enclosing all ink pixels of a bitmap.
///
/// Scan order follows the reference implementation exactly: `right` walks
/// columns from the highest down, `top` walks rows from the highest down,
/// then `left` walks columns up to `right` and `bottom` walks rows up to
/// `top`. Rows count from the bottom of the glyph, so the returned box
/// satisfies `left <= right` and `bottom <= top`.
///
/// Returns `None` for an all-blank bitmap (including zero-area bitmaps),
/// which has no meaningful box to report. Callers must not invoke this for
/// shapes without a bitmap at all; absence of pixels is a different state
/// from blankness and is represented by NULL box columns in storage.
pub fn scan(bitmap: &Bitmap) -> Option<BoundingBox> {
    let w = bitmap.width();
    let h = bitmap.height();
    if w == 0 || h == 0 {
        return None;
    }
    let column_has_ink = |col: usize| (0..h).any(|row| bitmap.get(row, col) != 0);
    let row_has_ink = |row: usize| (0..w).any(|col| bitmap.get(row, col) != 0);

    // The right scan doubles as the blankness check: no inked column means
    // no inked pixel anywhere.
    let right = (0..w).rev().find(|&col| column_has_ink(col))?;
    let top = (0..h).rev().find(|&row| row_has_ink(row))?;
    // Ink exists, so these scans always terminate on an inked line.
    let left = (0..=right).find(|&col| column_has_ink(col)).unwrap_or(right);
    let bottom = (0..=top).find(|&row| row_has_ink(row)).unwrap_or(top);
    Some(BoundingBox { top, left, right, bottom })
}
