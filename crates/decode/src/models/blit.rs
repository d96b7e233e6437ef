/// A placement of a shape on a page.
///
/// Blits are leaf records: "the shape at local index `shapeno` appears with
/// its bottom-left corner at (`left`, `bottom`) on this page". Offsets are
/// unsigned 16-bit, matching the source format's wire width.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Blit {
    /// Local shape index, counted across the page's full shape list
    /// (inherited shapes first, then page-local shapes).
    pub shapeno: u32,
    pub left: u16,
    pub bottom: u16,
}
