//! folio Core Library
//!
//! Configuration, errors, entry paths, frontmatter, schemas and the static
//! registry types that generated registry modules build on.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;
pub mod schema;
pub mod snapshot;

pub use config::{CollectionConfig, Config};
pub use content::{CollectionKind, ContentPath, ContentType, DataFormat, DataPath, EntryData};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;
pub use schema::{FieldKind, FieldRule, ReferenceResolver, Schema, SchemaViolation, reference};
pub use snapshot::{KnownEntry, StaticCollection, StaticEntry, get_known};
