//! Decoded document model and the decode-collaborator boundary.
//!
//! This crate owns the in-memory representation of a page-oriented document:
//! pages, glyph shapes (optionally arranged in a parent/child hierarchy),
//! blits (shape placements), and binary bitmaps. It deliberately knows
//! nothing about persistence.
//!
//! Decoding of the proprietary binary container is out of scope; the
//! [`DocumentSource`] trait is the seam where a real decoder would plug in.
//! [`JsonSource`] is the shipped implementation, reading a whole document
//! from a JSON description.

pub mod error;
mod json;
pub mod models;
mod source;

pub use crate::json::JsonSource;
pub use crate::source::DocumentSource;
