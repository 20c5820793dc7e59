//! Project configuration management.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    content::CollectionKind,
    error::{CoreError, Result},
    schema::{FieldKind, FieldRule, Schema},
};

/// Main configuration structure for folio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Content directory settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// Registry code generation settings.
    #[serde(default)]
    pub codegen: CodegenConfig,

    /// Markdown rendering settings.
    #[serde(default)]
    pub markdown: MarkdownConfig,

    /// Collections keyed by name.
    #[serde(default = "default_collections")]
    pub collections: BTreeMap<String, CollectionConfig>,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    root: PathBuf,
}

/// Content directory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Directory holding one sub-directory per collection.
    #[serde(default = "default_content_dir")]
    pub dir: PathBuf,
}

/// Registry code generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Path of the generated Rust module.
    #[serde(default = "default_codegen_output")]
    pub output: PathBuf,

    /// Path the generated module uses to import `folio-core`.
    #[serde(default = "default_crate_path")]
    pub crate_path: String,
}

/// Markdown rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Syntax highlighting theme name.
    #[serde(default = "default_syntax_theme")]
    pub syntax_theme: String,

    /// Reading speed used for `minutes_read`.
    #[serde(default = "default_words_per_minute")]
    pub words_per_minute: u32,

    /// Maximum characters of a generated summary.
    #[serde(default = "default_summary_length")]
    pub summary_length: usize,
}

/// Settings of a single collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Content or data.
    #[serde(default)]
    pub kind: CollectionKind,

    /// Field rules for entry data.
    #[serde(default)]
    pub schema: Schema,
}

impl CollectionConfig {
    pub fn content(schema: Schema) -> Self {
        Self {
            kind: CollectionKind::Content,
            schema,
        }
    }

    pub fn data(schema: Schema) -> Self {
        Self {
            kind: CollectionKind::Data,
            schema,
        }
    }
}

// Default value functions
fn default_content_dir() -> PathBuf {
    PathBuf::from("src/content")
}

fn default_codegen_output() -> PathBuf {
    PathBuf::from("src/content_registry.rs")
}

fn default_crate_path() -> String {
    "folio_core".to_string()
}

fn default_syntax_theme() -> String {
    "base16-ocean.dark".to_string()
}

fn default_words_per_minute() -> u32 {
    200
}

fn default_summary_length() -> usize {
    160
}

/// `docs` pages with a title, plus an `i18n` data collection.
fn default_collections() -> BTreeMap<String, CollectionConfig> {
    let docs = Schema::new()
        .field("title", FieldRule::required(FieldKind::String))
        .field("description", FieldRule::optional(FieldKind::String));

    BTreeMap::from([
        ("docs".to_string(), CollectionConfig::content(docs)),
        ("i18n".to_string(), CollectionConfig::data(Schema::new())),
    ])
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
        }
    }
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            output: default_codegen_output(),
            crate_path: default_crate_path(),
        }
    }
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            syntax_theme: default_syntax_theme(),
            words_per_minute: default_words_per_minute(),
            summary_length: default_summary_length(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content: ContentConfig::default(),
            codegen: CodegenConfig::default(),
            markdown: MarkdownConfig::default(),
            collections: default_collections(),
            root: PathBuf::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.root = root_of(path);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, layering `FOLIO__*` env vars.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?;

        let mut config: Config = settings.try_deserialize()?;
        config.root = root_of(path);
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.content.dir.as_os_str().is_empty() {
            return Err(CoreError::config("content.dir cannot be empty"));
        }

        if self.codegen.crate_path.trim().is_empty() {
            return Err(CoreError::config("codegen.crate_path cannot be empty"));
        }

        for (name, collection) in &self.collections {
            if !is_valid_collection_name(name) {
                return Err(CoreError::config(format!(
                    "invalid collection name `{name}`: use lowercase letters, digits, `-` and `_`"
                )));
            }

            for (field, target) in collection.schema.reference_fields() {
                if !self.collections.contains_key(target) {
                    return Err(CoreError::config(format!(
                        "collections.{name}.schema.{field} references unknown collection `{target}`"
                    )));
                }
            }
        }

        if self.markdown.words_per_minute == 0 {
            tracing::warn!(
                "markdown.words_per_minute is 0, reading time will use 1 word per minute"
            );
        }

        Ok(())
    }

    /// Configuration of a named collection.
    pub fn collection(&self, name: &str) -> Option<&CollectionConfig> {
        self.collections.get(name)
    }

    /// Content directory resolved against the configuration file location.
    pub fn content_dir(&self) -> PathBuf {
        self.root.join(&self.content.dir)
    }

    /// Generated module path resolved against the configuration file location.
    pub fn codegen_output(&self) -> PathBuf {
        self.root.join(&self.codegen.output)
    }

    /// Use `root` for resolving relative paths.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }
}

fn root_of(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// `[a-z][a-z0-9_-]*`
pub fn is_valid_collection_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}
