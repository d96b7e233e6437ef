//! Binary glyph bitmaps.
//!
//! A [`Bitmap`] stores one byte per pixel (nonzero = ink) in bottom-up row
//! order, matching the coordinate space blits are expressed in: row 0 is the
//! bottom of the glyph, and a blit's `bottom` offset places row 0 of the
//! shape on the page.

use crate::error::{ErrorKind, Result};

/// The tightest rectangle enclosing all ink pixels of a bitmap.
///
/// Row and column indices, 0-based, inclusive. Rows count from the bottom,
/// so `bottom <= top` and `left <= right` always hold.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BoundingBox {
    pub top: usize,
    pub left: usize,
    pub right: usize,
    pub bottom: usize,
}

/// A rectangular binary bitmap with an explicit row stride.
///
/// The stride may exceed the width (decoders commonly pad rows to word
/// boundaries); pixels in the padding columns are ignored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl Bitmap {
    /// Construct a bitmap from raw bottom-up pixel rows.
    ///
    /// Fails if `stride < width` or if `data` is not exactly
    /// `stride * height` bytes.
    pub fn new(width: usize, height: usize, stride: usize, data: Vec<u8>) -> Result<Self> {
        if stride < width {
            exn::bail!(ErrorKind::MalformedBitmap(format!(
                "stride {stride} smaller than width {width}"
            )));
        }
        if data.len() != stride * height {
            exn::bail!(ErrorKind::MalformedBitmap(format!(
                "expected {} bytes for {width}x{height} (stride {stride}), got {}",
                stride * height,
                data.len()
            )));
        }
        Ok(Self { width, height, stride, data })
    }

    /// Build a bitmap from top-to-bottom text rows, one character per pixel.
    ///
    /// Space and `.` are blank; any other character is ink. Rows shorter
    /// than the widest row are padded with blank pixels on the right.
    pub fn from_rows(rows: &[String]) -> Result<Self> {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut data = vec![0u8; width * height];
        for (i, row) in rows.iter().enumerate() {
            // Text rows read top-to-bottom; storage is bottom-up.
            let r = height - 1 - i;
            for (c, ch) in row.chars().enumerate() {
                if ch != ' ' && ch != '.' {
                    data[r * width + c] = 1;
                }
            }
        }
        Self::new(width, height, width, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Pixel value at (row, column), row 0 at the bottom. Nonzero = ink.
    ///
    /// # Panics
    /// Panics if `row >= height` or `col >= width`.
    pub fn get(&self, row: usize, col: usize) -> u8 {
        assert!(row < self.height && col < self.width, "pixel ({row}, {col}) out of bounds");
        self.data[row * self.stride + col]
    }

    /// Serialize to binary PBM (P4).
    ///
    /// This is a measurement-preserving serialization of the pixel data,
    /// not a re-encoding: the raster is emitted top-to-bottom with ink as
    /// PBM black (bit set), rows padded to whole bytes as P4 requires.
    pub fn to_pbm(&self) -> Vec<u8> {
        let mut out = format!("P4\n{} {}\n", self.width, self.height).into_bytes();
        let row_bytes = self.width.div_ceil(8);
        for row in (0..self.height).rev() {
            let mut packed = vec![0u8; row_bytes];
            for col in 0..self.width {
                if self.get(row, col) != 0 {
                    packed[col / 8] |= 0x80 >> (col % 8);
                }
            }
            out.extend_from_slice(&packed);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(4, 2, 3, 6)] // stride smaller than width
    #[case(4, 2, 4, 7)] // data too short
    #[case(4, 2, 4, 9)] // data too long
    fn test_rejects_malformed(
        #[case] width: usize,
        #[case] height: usize,
        #[case] stride: usize,
        #[case] len: usize,
    ) {
        assert!(Bitmap::new(width, height, stride, vec![0; len]).is_err());
    }

    #[test]
    fn test_from_rows_flips_vertically() {
        let bitmap = Bitmap::from_rows(&["#.".to_string(), ".#".to_string()]).unwrap();
        // The '#' in the first (top) text row lands in the top storage row.
        assert_eq!(bitmap.get(1, 0), 1);
        assert_eq!(bitmap.get(1, 1), 0);
        assert_eq!(bitmap.get(0, 0), 0);
        assert_eq!(bitmap.get(0, 1), 1);
    }

    #[test]
    fn test_from_rows_pads_short_rows() {
        let bitmap = Bitmap::from_rows(&["###".to_string(), "#".to_string()]).unwrap();
        assert_eq!(bitmap.width(), 3);
        assert_eq!(bitmap.get(0, 1), 0);
        assert_eq!(bitmap.get(0, 2), 0);
    }

    #[test]
    fn test_pbm_header_and_packing() {
        // 9 pixels wide forces two bytes per packed row.
        let rows: Vec<String> = vec!["#########".to_string(), "#........".to_string()];
        let bitmap = Bitmap::from_rows(&rows).unwrap();
        let pbm = bitmap.to_pbm();
        assert!(pbm.starts_with(b"P4\n9 2\n"));
        let raster = &pbm[b"P4\n9 2\n".len()..];
        assert_eq!(raster, &[0xFF, 0x80, 0x80, 0x00]);
    }
}
