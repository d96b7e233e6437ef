use crate::error::{ErrorKind, Result};
use crate::models::{Blit, Shape};

/// Reference from a page to a shared shape dictionary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InheritedRef {
    /// Name of the shared dictionary (the included file's name in the
    /// source container). This is the identity the inherited-dictionary
    /// cache and the store key on.
    pub name: String,
    /// How many entries at the front of the page's shape list come from
    /// the inherited dictionary.
    pub shape_count: usize,
}

/// One decoded page of a document.
///
/// The shape list is ordered: indices `0..inherited_shape_count()` are the
/// inherited dictionary's shapes, the rest are owned by this page. Blit
/// shape numbers index into this combined list.
#[derive(Clone, Debug)]
pub struct Page {
    /// 0-based page number within the document.
    pub number: u32,
    /// The page's own dictionary name (the page file's name).
    pub name: String,
    pub inherited: Option<InheritedRef>,
    pub shapes: Vec<Shape>,
    pub blits: Vec<Blit>,
}

impl Page {
    /// Number of shapes inherited from a shared dictionary (0 when the
    /// page declares no inheritance).
    pub fn inherited_shape_count(&self) -> usize {
        self.inherited.as_ref().map_or(0, |inh| inh.shape_count)
    }

    /// Check internal consistency: the inherited prefix must fit inside
    /// the shape list.
    pub fn validate(&self) -> Result<()> {
        let inherited = self.inherited_shape_count();
        if inherited > self.shapes.len() {
            exn::bail!(ErrorKind::MalformedPage(format!(
                "page {}: inherited shape count {inherited} exceeds shape list length {}",
                self.number,
                self.shapes.len()
            )));
        }
        Ok(())
    }
}
