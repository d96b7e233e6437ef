//! Local-index to persisted-id translation tables.

use crate::error::{ErrorKind, Result};
use shapex_store::models::ShapeId;
use std::collections::HashMap;

/// Ephemeral mapping from a dictionary's local shape index to the store's
/// persisted shape identifier.
///
/// One table exists per currently-resident dictionary context: the
/// inherited-dictionary cache owns one for the current shared dictionary,
/// and the pipeline creates (and discards) one per page for page-local
/// shapes. Each local index is translated at most once per table lifetime,
/// and looking up an index that was never translated is a data-integrity
/// error, never a silent default.
#[derive(Debug, Default)]
pub struct ShapeTable {
    map: HashMap<u32, ShapeId>,
}

impl ShapeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the persisted identifier for a local index.
    ///
    /// Fails with [`ErrorKind::DuplicateTranslation`] if the index is
    /// already present.
    pub fn insert(&mut self, local_index: u32, persisted: ShapeId) -> Result<()> {
        if self.map.insert(local_index, persisted).is_some() {
            exn::bail!(ErrorKind::DuplicateTranslation(local_index));
        }
        Ok(())
    }

    /// Translate a local index to its persisted identifier.
    ///
    /// Fails with [`ErrorKind::MissingTranslation`] for an index that was
    /// never inserted: a shape or blit referencing outside the
    /// dictionary's declared range.
    pub fn lookup(&self, local_index: u32) -> Result<ShapeId> {
        match self.map.get(&local_index) {
            Some(&persisted) => Ok(persisted),
            None => exn::bail!(ErrorKind::MissingTranslation(local_index)),
        }
    }

    /// Reset to empty, for reuse with a different dictionary.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
