//! SQLite persistence for exported shape dictionaries.
//!
//! The store is the system of record for one or more export runs: documents,
//! dictionaries (page-scoped or shared), shapes with their serialized
//! bitmaps, blits, and page-to-dictionary links.
//!
//! # Architecture
//! The [`ShapeSink`] trait is the persistence boundary the export engine
//! drives; [`SqliteSink`] is the sqlx-backed implementation over the
//! migrated schema. Shape bitmap payloads cross the boundary through the
//! fixed-size chunking in [`payload`], so peak memory at the transport
//! layer is bounded independent of image size.

mod db;
pub mod error;
#[cfg(feature = "mock")]
mod mock;
pub mod models;
pub mod payload;
mod repo;
mod sink;

pub use crate::db::Database;
#[cfg(feature = "mock")]
pub use crate::mock::{BlitRecord, DictionaryRecord, DocumentRecord, MemorySink, PageRecord, ShapeRecord};
pub use crate::repo::SqliteSink;
pub use crate::sink::{ShapeSink, SinkHandle};
