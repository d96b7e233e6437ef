//! Shape dictionary export engine.
//!
//! Normalizes a hierarchical, page-oriented shape dictionary document into
//! the flat relational form the store persists. The hard problem is
//! identity translation: shapes are addressed by small per-dictionary local
//! indices in the source, while the store assigns global surrogate
//! identifiers, so every parent reference and every blit reference has to be
//! rewritten from a local index to the right persisted id, across page
//! boundaries and across the inherited-dictionary cache.
//!
//! Pages are processed strictly in ascending order, one at a time, against
//! a single storage session. There is no concurrency and no retry: a
//! storage or integrity failure aborts the run.

pub mod bbox;
pub mod error;
mod inherit;
mod persist;
mod pipeline;
mod table;

pub use crate::inherit::{InheritedDictionaryCache, ResolvedInheritance};
pub use crate::pipeline::{export_document, ExportOptions, RunSummary};
pub use crate::table::ShapeTable;
