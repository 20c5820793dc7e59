//! Entry shapes held by the registry.

use std::{fmt, path::PathBuf};

use folio_core::{CollectionKind, ContentType, EntryData, Frontmatter};
use serde::{Deserialize, Serialize};

use crate::render::{RenderedEntry, Renderer};

/// Pointer to an entry: a slug for content collections, an id for data ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryRef {
    pub collection: String,
    pub key: String,
}

impl EntryRef {
    pub fn new(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.collection, self.key)
    }
}

/// A Markdown or MDX page.
#[derive(Debug, Clone)]
pub struct ContentEntry {
    /// Path-like key with extension, e.g. `guides/intro.md`.
    pub id: String,
    /// The id without its extension, e.g. `guides/intro`.
    pub slug: String,
    /// Raw source after the frontmatter block.
    pub body: String,
    pub collection: String,
    /// Frontmatter.
    pub data: EntryData,
    pub content_type: ContentType,
    pub source_path: PathBuf,
}

impl ContentEntry {
    /// Well-known frontmatter fields.
    pub fn frontmatter(&self) -> folio_core::Result<Frontmatter> {
        Frontmatter::from_data(&self.data)
    }

    pub fn to_ref(&self) -> EntryRef {
        EntryRef::new(&self.collection, &self.slug)
    }

    /// Render the body to HTML with headings and plugin frontmatter.
    pub fn render(&self, renderer: &Renderer) -> RenderedEntry {
        renderer.render(self)
    }
}

/// A structured JSON, YAML or TOML record.
#[derive(Debug, Clone)]
pub struct DataEntry {
    /// Path without extension, e.g. `en` or `fr/common`.
    pub id: String,
    pub collection: String,
    pub data: EntryData,
    pub source_path: PathBuf,
}

impl DataEntry {
    pub fn to_ref(&self) -> EntryRef {
        EntryRef::new(&self.collection, &self.id)
    }
}

/// An entry of either collection kind.
#[derive(Debug, Clone)]
pub enum Entry {
    Content(ContentEntry),
    Data(DataEntry),
}

impl Entry {
    pub fn id(&self) -> &str {
        match self {
            Self::Content(e) => &e.id,
            Self::Data(e) => &e.id,
        }
    }

    /// Lookup key: slug for content entries, id for data entries.
    pub fn key(&self) -> &str {
        match self {
            Self::Content(e) => &e.slug,
            Self::Data(e) => &e.id,
        }
    }

    pub fn collection(&self) -> &str {
        match self {
            Self::Content(e) => &e.collection,
            Self::Data(e) => &e.collection,
        }
    }

    pub fn data(&self) -> &EntryData {
        match self {
            Self::Content(e) => &e.data,
            Self::Data(e) => &e.data,
        }
    }

    pub fn kind(&self) -> CollectionKind {
        match self {
            Self::Content(_) => CollectionKind::Content,
            Self::Data(_) => CollectionKind::Data,
        }
    }

    pub fn source_path(&self) -> &PathBuf {
        match self {
            Self::Content(e) => &e.source_path,
            Self::Data(e) => &e.source_path,
        }
    }

    pub fn to_ref(&self) -> EntryRef {
        EntryRef::new(self.collection(), self.key())
    }

    pub fn as_content(&self) -> Option<&ContentEntry> {
        match self {
            Self::Content(e) => Some(e),
            Self::Data(_) => None,
        }
    }

    pub fn as_data(&self) -> Option<&DataEntry> {
        match self {
            Self::Data(e) => Some(e),
            Self::Content(_) => None,
        }
    }
}
