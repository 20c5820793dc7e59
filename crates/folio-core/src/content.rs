//! Entry paths, slug derivation and entry data.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_yaml::{Mapping, Value};

use crate::error::{CoreError, Result};

/// What a collection holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// Rendered Markdown/MDX pages with frontmatter.
    #[default]
    Content,
    /// Structured JSON/YAML/TOML records.
    Data,
}

impl CollectionKind {
    /// Lowercase name used in configuration and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Data => "data",
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type of content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Markdown content (.md, .markdown files).
    Markdown,
    /// MDX content (.mdx files).
    Mdx,
}

impl ContentType {
    /// Determine content type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Some(Self::Markdown),
            "mdx" => Some(Self::Mdx),
            _ => None,
        }
    }

    /// Get the canonical file extension for this content type.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Mdx => "mdx",
        }
    }
}

/// Format of a data entry source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    Json,
    Yaml,
    Toml,
}

impl DataFormat {
    /// Determine data format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Join the normal components of a relative path with `/`.
///
/// Returns `None` for paths with non UTF-8 components or no file name.
pub fn normalize_id(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Strip the final file extension from a `/`-separated id.
///
/// `guides/intro.mdx` becomes `guides/intro`; directory segments are kept as is.
pub fn derive_slug(id: &str) -> String {
    let (dir, file) = match id.rfind('/') {
        Some(pos) => (&id[..=pos], &id[pos + 1..]),
        None => ("", id),
    };

    let stem = match file.rfind('.') {
        Some(pos) if pos > 0 => &file[..pos],
        _ => file,
    };

    format!("{dir}{stem}")
}

/// Location of a content entry inside its collection directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPath {
    /// Path relative to the collection directory.
    pub path: PathBuf,

    /// Entry id: the relative path with `/` separators, extension included.
    pub id: String,

    /// URL slug: the id without its extension.
    pub slug: String,

    /// Content type based on extension.
    pub content_type: ContentType,
}

impl ContentPath {
    /// Parse a path relative to the collection directory.
    ///
    /// - `welcome.md` → id: `welcome.md`, slug: `welcome`
    /// - `guides/intro.mdx` → id: `guides/intro.mdx`, slug: `guides/intro`
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        let content_type = ContentType::from_extension(extension)?;
        let id = normalize_id(path)?;
        let slug = derive_slug(&id);

        Some(Self {
            path: path.to_path_buf(),
            id,
            slug,
            content_type,
        })
    }
}

/// Location of a data entry inside its collection directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPath {
    /// Path relative to the collection directory.
    pub path: PathBuf,

    /// Entry id: the relative path without its extension.
    pub id: String,

    /// Source format based on extension.
    pub format: DataFormat,
}

impl DataPath {
    /// Parse a path relative to the collection directory.
    ///
    /// `fr/common.yaml` → id: `fr/common`
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        let format = DataFormat::from_extension(extension)?;
        let id = derive_slug(&normalize_id(path)?);

        Some(Self {
            path: path.to_path_buf(),
            id,
            format,
        })
    }
}

/// Frontmatter or data record of an entry, kept in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryData(Mapping);

impl EntryData {
    /// Wrap an existing mapping.
    pub fn new(map: Mapping) -> Self {
        Self(map)
    }

    /// Build entry data from a parsed value; `null` is an empty record.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Mapping(map) => Some(Self(map)),
            Value::Null => Some(Self::default()),
            _ => None,
        }
    }

    /// Parse entry data from a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self(serde_json::from_str(json)?))
    }

    /// Serialize as a compact JSON object.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value of a field, if it is a string.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Boolean value of a field, if it is a boolean.
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert or replace a field.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(Value::String(key.into()), value);
    }

    /// Field names that are strings, in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().filter_map(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.0
    }

    /// Deserialize the record into a typed shape.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_yaml::from_value(Value::Mapping(self.0.clone()))
            .map_err(|e| CoreError::EntryData(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(
            ContentType::from_extension("md"),
            Some(ContentType::Markdown)
        );
        assert_eq!(
            ContentType::from_extension("MD"),
            Some(ContentType::Markdown)
        );
        assert_eq!(ContentType::from_extension("mdx"), Some(ContentType::Mdx));
        assert_eq!(ContentType::from_extension("txt"), None);
    }

    #[test]
    fn test_data_format_from_extension() {
        assert_eq!(DataFormat::from_extension("json"), Some(DataFormat::Json));
        assert_eq!(DataFormat::from_extension("yml"), Some(DataFormat::Yaml));
        assert_eq!(DataFormat::from_extension("toml"), Some(DataFormat::Toml));
        assert_eq!(DataFormat::from_extension("md"), None);
    }

    #[test]
    fn test_derive_slug() {
        assert_eq!(derive_slug("welcome.md"), "welcome");
        assert_eq!(derive_slug("guides/intro.mdx"), "guides/intro");
        assert_eq!(derive_slug("reference/v1.2/api.md"), "reference/v1.2/api");
        assert_eq!(derive_slug("notes.draft.md"), "notes.draft");
        assert_eq!(derive_slug("README"), "README");
    }

    #[test]
    fn test_content_path_simple() {
        let cp = ContentPath::from_path(Path::new("welcome.md")).expect("parse path");

        assert_eq!(cp.id, "welcome.md");
        assert_eq!(cp.slug, "welcome");
        assert_eq!(cp.content_type, ContentType::Markdown);
    }

    #[test]
    fn test_content_path_nested() {
        let cp = ContentPath::from_path(Path::new("guides/getting-started/install.mdx"))
            .expect("parse path");

        assert_eq!(cp.id, "guides/getting-started/install.mdx");
        assert_eq!(cp.slug, "guides/getting-started/install");
        assert_eq!(cp.content_type, ContentType::Mdx);
    }

    #[test]
    fn test_content_path_rejects_other_files() {
        assert!(ContentPath::from_path(Path::new("logo.png")).is_none());
        assert!(ContentPath::from_path(Path::new("Makefile")).is_none());
    }

    #[test]
    fn test_content_path_rejects_parent_components() {
        assert!(ContentPath::from_path(Path::new("../outside.md")).is_none());
    }

    #[test]
    fn test_data_path() {
        let dp = DataPath::from_path(Path::new("fr/common.yaml")).expect("parse path");
        assert_eq!(dp.id, "fr/common");
        assert_eq!(dp.format, DataFormat::Yaml);
    }

    #[test]
    fn test_entry_data_accessors() {
        let value: Value = serde_yaml::from_str("title: Welcome\ndraft: true\norder: 3").unwrap();
        let data = EntryData::from_value(value).unwrap();

        assert_eq!(data.str("title"), Some("Welcome"));
        assert_eq!(data.bool("draft"), Some(true));
        assert_eq!(data.str("order"), None);
        assert_eq!(data.keys().collect::<Vec<_>>(), vec!["title", "draft", "order"]);
    }

    #[test]
    fn test_entry_data_null_is_empty() {
        let data = EntryData::from_value(Value::Null).unwrap();
        assert!(data.is_empty());
        assert!(EntryData::from_value(Value::String("x".into())).is_none());
    }

    #[test]
    fn test_entry_data_json() {
        let data = EntryData::from_json(r#"{"title":"Hi","tags":["a","b"]}"#).unwrap();
        assert_eq!(data.str("title"), Some("Hi"));
        assert_eq!(data.to_json().unwrap(), r#"{"title":"Hi","tags":["a","b"]}"#);
    }
}
