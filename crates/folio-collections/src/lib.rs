//! folio Collections Library
//!
//! Loads content and data collections from disk into an immutable registry
//! and exposes the typed accessors over it.
//!
//! # Modules
//!
//! - [`loader`] - Content directory walking and parallel parsing
//! - [`registry`] - Collections, accessors, validation and manifests
//! - [`entry`] - Content and data entry shapes, references
//! - [`render`] - HTML rendering and render plugins
//! - [`codegen`] - Generated registry module with typed entry keys

pub mod codegen;
pub mod entry;
pub mod error;
pub mod loader;
pub mod registry;
pub mod render;

pub use codegen::{CodeGenerator, write_if_changed};
pub use entry::{ContentEntry, DataEntry, Entry, EntryRef};
pub use error::{CollectionError, Result};
pub use loader::ContentLoader;
pub use registry::{
    Collection, ContentRegistry, EntryIssue, Manifest, ManifestDiff, ManifestEntry,
};
pub use render::{ReadingTime, RenderContext, RenderPlugin, RenderedEntry, Renderer, Summary};
