//! JSON-backed document source.
//!
//! Stands in for the proprietary container decoder: the whole document is
//! described in one JSON file. Bitmaps are written as top-to-bottom rows of
//! characters (space and `.` blank, anything else ink), which keeps test
//! and demo documents human-readable.

use crate::error::{ErrorKind, Result};
use crate::models::{Bitmap, Blit, InheritedRef, Page, Shape};
use crate::source::DocumentSource;
use exn::{OptionExt, ResultExt};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct JsonDocument {
    pages: Vec<JsonPage>,
}

#[derive(Debug, Deserialize)]
struct JsonPage {
    name: String,
    #[serde(default)]
    inherited: Option<JsonInherited>,
    #[serde(default)]
    shapes: Vec<JsonShape>,
    #[serde(default)]
    blits: Vec<JsonBlit>,
}

#[derive(Debug, Deserialize)]
struct JsonInherited {
    name: String,
    shape_count: usize,
}

#[derive(Debug, Deserialize)]
struct JsonShape {
    #[serde(default = "root_parent")]
    parent: i32,
    #[serde(default)]
    bitmap: Option<Vec<String>>,
}

fn root_parent() -> i32 {
    -1
}

#[derive(Debug, Deserialize)]
struct JsonBlit {
    shape: u32,
    left: u16,
    bottom: u16,
}

/// A [`DocumentSource`] reading a whole document from a JSON description.
///
/// The JSON is parsed eagerly on open; individual pages are converted to
/// the decoded model lazily in [`page`](DocumentSource::page), so a page
/// with a malformed bitmap fails on its own without taking down the rest
/// of the document.
pub struct JsonSource {
    pages: Vec<JsonPage>,
}

impl JsonSource {
    /// Open a JSON document file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).or_raise(|| ErrorKind::Io)?;
        let source = Self::from_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), pages = source.page_count(), "opened document");
        Ok(source)
    }

    /// Parse a JSON document from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Result<Self> {
        let document: JsonDocument = serde_json::from_str(text).or_raise(|| ErrorKind::Json)?;
        Ok(Self { pages: document.pages })
    }

    fn convert(&self, number: usize, raw: &JsonPage) -> Result<Page> {
        let shapes = raw
            .shapes
            .iter()
            .map(|shape| {
                let bitmap = shape.bitmap.as_deref().map(Bitmap::from_rows).transpose()?;
                Ok(Shape { parent: shape.parent, bitmap })
            })
            .collect::<Result<Vec<_>>>()?;
        let blits = raw
            .blits
            .iter()
            .map(|blit| Blit { shapeno: blit.shape, left: blit.left, bottom: blit.bottom })
            .collect();
        let page = Page {
            number: u32::try_from(number).or_raise(|| ErrorKind::PageOutOfRange(number))?,
            name: raw.name.clone(),
            inherited: raw
                .inherited
                .as_ref()
                .map(|inh| InheritedRef { name: inh.name.clone(), shape_count: inh.shape_count }),
            shapes,
            blits,
        };
        page.validate()?;
        Ok(page)
    }
}

impl DocumentSource for JsonSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, number: usize) -> Result<Page> {
        let raw = self.pages.get(number).ok_or_raise(|| ErrorKind::PageOutOfRange(number))?;
        self.convert(number, raw)
    }
}
