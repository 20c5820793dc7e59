//! Content directory loading.
//!
//! Walks the content directory, one sub-directory per collection, and parses
//! every entry into a [`ContentRegistry`].

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use folio_core::{
    CollectionConfig, CollectionKind, Config, ContentPath, DataPath,
    config::is_valid_collection_name,
};
use folio_parser::{ParsedFile, ParserRegistry};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::{
    entry::{ContentEntry, DataEntry, Entry},
    error::{CollectionError, Result},
    registry::{Collection, ContentRegistry},
};

/// Loads collections from disk.
#[derive(Debug)]
pub struct ContentLoader {
    config: Config,
    parser: ParserRegistry,
    content_dir: PathBuf,
}

impl ContentLoader {
    /// Create a loader for the configured content directory.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let content_dir = config.content_dir();
        Self {
            parser: ParserRegistry::with_theme(&config.markdown.syntax_theme),
            config,
            content_dir,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Load every collection and validate entries against their schemas.
    pub fn load(&self) -> Result<ContentRegistry> {
        let registry = self.load_unchecked()?;

        let issues = registry.validate();
        if !issues.is_empty() {
            return Err(CollectionError::Invalid { issues });
        }

        Ok(registry)
    }

    /// Load every collection without schema validation.
    pub fn load_unchecked(&self) -> Result<ContentRegistry> {
        info!(dir = %self.content_dir.display(), "loading collections");

        let mut registry = ContentRegistry::new();
        for (name, source) in self.discover()? {
            let collection = self.load_collection(&name, source)?;
            debug!(collection = %name, entries = collection.len(), "collection loaded");
            registry = registry.with_collection(collection);
        }

        info!(
            collections = registry.collections().count(),
            entries = registry.len(),
            "collections loaded"
        );

        Ok(registry)
    }

    /// Pair each configured or discovered collection with its directory.
    fn discover(&self) -> Result<BTreeMap<String, CollectionSource>> {
        let mut sources: BTreeMap<String, CollectionSource> = self
            .config
            .collections
            .iter()
            .map(|(name, config)| {
                let source = CollectionSource {
                    config: Some(config.clone()),
                    dir: None,
                };
                (name.clone(), source)
            })
            .collect();

        if !self.content_dir.is_dir() {
            warn!(dir = %self.content_dir.display(), "content directory not found");
            return Ok(sources);
        }

        for entry in fs::read_dir(&self.content_dir)? {
            let path = entry?.path();
            if !path.is_dir() || is_ignored(&path) {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            match sources.get_mut(name) {
                Some(source) => source.dir = Some(path),
                None if !is_valid_collection_name(name) => {
                    warn!(
                        collection = name,
                        "directory name is not a valid collection name, skipping it"
                    );
                }
                None => {
                    warn!(
                        collection = name,
                        "directory has no collection configuration, treating it as content"
                    );
                    sources.insert(
                        name.to_string(),
                        CollectionSource {
                            config: None,
                            dir: Some(path),
                        },
                    );
                }
            }
        }

        Ok(sources)
    }

    fn load_collection(&self, name: &str, source: CollectionSource) -> Result<Collection> {
        let collection = match source.config {
            Some(config) => Collection::new(name, config.kind, config.schema),
            None => Collection::unconfigured(name),
        };

        let Some(dir) = source.dir else {
            debug!(collection = name, "collection has no directory");
            return Ok(collection);
        };

        let kind = collection.kind();
        let files = find_entry_files(&dir, kind)?;
        debug!(collection = name, count = files.len(), "found entry files");

        let entries = files
            .par_iter()
            .map(|path| self.parse_file(name, kind, &dir, path))
            .collect::<Result<Vec<_>>>()?;

        collection.with_entries(entries)
    }

    /// Parse a single entry file.
    fn parse_file(
        &self,
        collection: &str,
        kind: CollectionKind,
        dir: &Path,
        path: &Path,
    ) -> Result<Entry> {
        debug!(path = %path.display(), "parsing entry");

        let invalid_path = || CollectionError::Parse {
            path: path.to_path_buf(),
            message: "entry path is not valid UTF-8".to_string(),
        };
        let relative = path.strip_prefix(dir).unwrap_or(path);
        let content = fs::read_to_string(path)?;

        let parsed = self
            .parser
            .parse(kind, &content, path)
            .map_err(|e| CollectionError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let entry = match parsed {
            ParsedFile::Content {
                content_type,
                source,
            } => {
                let location = ContentPath::from_path(relative).ok_or_else(invalid_path)?;
                Entry::Content(ContentEntry {
                    id: location.id,
                    slug: location.slug,
                    body: source.body,
                    collection: collection.to_string(),
                    data: source.data,
                    content_type,
                    source_path: path.to_path_buf(),
                })
            }
            ParsedFile::Data(data) => {
                let location = DataPath::from_path(relative).ok_or_else(invalid_path)?;
                Entry::Data(DataEntry {
                    id: location.id,
                    collection: collection.to_string(),
                    data,
                    source_path: path.to_path_buf(),
                })
            }
        };

        Ok(entry)
    }
}

#[derive(Debug)]
struct CollectionSource {
    config: Option<CollectionConfig>,
    dir: Option<PathBuf>,
}

/// Files under `dir` that a collection of `kind` can hold.
fn find_entry_files(dir: &Path, kind: CollectionKind) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored_entry(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let accepted = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ParserRegistry::accepts(kind, ext));

        if accepted {
            files.push(path);
        } else {
            debug!(path = %path.display(), "skipping file of unsupported type");
        }
    }

    Ok(files)
}

fn is_ignored_entry(entry: &DirEntry) -> bool {
    is_ignored(entry.path())
}

/// Hidden and `_`-prefixed files and directories are not entries.
fn is_ignored(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.') || n.starts_with('_'))
}
