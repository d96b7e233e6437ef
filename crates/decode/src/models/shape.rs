use crate::models::Bitmap;

/// One glyph shape inside a dictionary.
///
/// Shapes are addressed by their position in the owning dictionary's shape
/// list (the "local index"). The parent, when non-negative, is the local
/// index of another shape in the same list; decoders emit parents before
/// children, so a parent's index is always smaller than its child's.
#[derive(Clone, Debug)]
pub struct Shape {
    /// Local index of the parent shape, or negative for a root shape.
    pub parent: i32,
    /// Pixel data. A shape may legitimately carry no bitmap at all (library
    /// entries that are never blitted directly); such shapes have no
    /// bounding box either.
    pub bitmap: Option<Bitmap>,
}

impl Shape {
    /// A root shape with the given bitmap.
    pub fn root(bitmap: Option<Bitmap>) -> Self {
        Self { parent: -1, bitmap }
    }

    /// A child refining the shape at local index `parent`.
    pub fn child_of(parent: u32, bitmap: Option<Bitmap>) -> Self {
        Self { parent: parent as i32, bitmap }
    }
}
