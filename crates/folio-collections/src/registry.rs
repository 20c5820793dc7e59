//! The entry registry and its typed accessors.
//!
//! A [`ContentRegistry`] is an immutable snapshot: collection name → entry
//! key → entry. Missing entries are reported as `Ok(None)`; only unknown
//! collections and kind mismatches are errors.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    path::PathBuf,
};

use folio_core::{CollectionKind, ReferenceResolver, Schema, SchemaViolation};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::{
    entry::{ContentEntry, DataEntry, Entry, EntryRef},
    error::{CollectionError, Result},
};

/// A named group of entries sharing a kind and schema.
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    kind: CollectionKind,
    schema: Schema,
    configured: bool,
    entries: Vec<Entry>,
}

impl Collection {
    /// Create an empty collection.
    pub fn new(name: impl Into<String>, kind: CollectionKind, schema: Schema) -> Self {
        Self {
            name: name.into(),
            kind,
            schema,
            configured: true,
            entries: Vec::new(),
        }
    }

    /// Create a collection discovered on disk without configuration.
    pub fn unconfigured(name: impl Into<String>) -> Self {
        Self {
            configured: false,
            ..Self::new(name, CollectionKind::Content, Schema::new())
        }
    }

    /// Add entries, ordering by id and rejecting slug collisions.
    pub fn with_entries(mut self, entries: Vec<Entry>) -> Result<Self> {
        self.entries = entries;
        self.entries.sort_by(|a, b| a.id().cmp(b.id()));

        let mut seen: HashMap<&str, &str> = HashMap::new();
        for entry in &self.entries {
            if let Some(first) = seen.insert(entry.key(), entry.id()) {
                return Err(CollectionError::DuplicateSlug {
                    collection: self.name.clone(),
                    slug: entry.key().to_string(),
                    first: first.to_string(),
                    second: entry.id().to_string(),
                });
            }
        }

        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Whether the collection was declared in configuration.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Entries ordered by id.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry by slug (content) or id (data).
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key() == key)
    }

    /// Entry by its path-like id.
    pub fn get_by_id(&self, id: &str) -> Option<&Entry> {
        self.entries
            .binary_search_by(|e| e.id().cmp(id))
            .ok()
            .map(|i| &self.entries[i])
    }

    fn expect_kind(&self, expected: CollectionKind) -> Result<()> {
        if self.kind == expected {
            Ok(())
        } else {
            Err(CollectionError::WrongKind {
                collection: self.name.clone(),
                expected,
                actual: self.kind,
            })
        }
    }
}

/// Schema violations of one entry.
#[derive(Debug, Clone)]
pub struct EntryIssue {
    pub collection: String,
    pub id: String,
    pub path: PathBuf,
    pub violations: Vec<SchemaViolation>,
}

impl fmt::Display for EntryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let details = self
            .violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{}: {details}", self.path.display())
    }
}

/// Immutable mapping of collection name to entries.
#[derive(Debug, Clone, Default)]
pub struct ContentRegistry {
    collections: BTreeMap<String, Collection>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collection, replacing one with the same name.
    pub fn with_collection(mut self, collection: Collection) -> Self {
        self.collections
            .insert(collection.name.clone(), collection);
        self
    }

    /// Collections ordered by name.
    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values()
    }

    pub fn collection(&self, name: &str) -> Result<&Collection> {
        self.collections
            .get(name)
            .ok_or_else(|| CollectionError::UnknownCollection(name.to_string()))
    }

    /// Total number of entries across collections.
    pub fn len(&self) -> usize {
        self.collections.values().map(Collection::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries of a collection, ordered by id.
    pub fn get_collection(&self, name: &str) -> Result<Vec<&Entry>> {
        Ok(self.collection(name)?.entries.iter().collect())
    }

    /// Entries of a collection accepted by `filter`.
    pub fn filter_collection<F>(&self, name: &str, filter: F) -> Result<Vec<&Entry>>
    where
        F: Fn(&Entry) -> bool,
    {
        Ok(self
            .collection(name)?
            .entries
            .iter()
            .filter(|e| filter(e))
            .collect())
    }

    /// Entry by slug (content collections) or id (data collections).
    pub fn get_entry(&self, collection: &str, key: &str) -> Result<Option<&Entry>> {
        Ok(self.collection(collection)?.get(key))
    }

    pub fn get_entry_by_ref(&self, reference: &EntryRef) -> Result<Option<&Entry>> {
        self.get_entry(&reference.collection, &reference.key)
    }

    /// Resolve references that all point into one collection, keeping order.
    pub fn get_entries(&self, references: &[EntryRef]) -> Result<Vec<Option<&Entry>>> {
        let Some(first) = references.first() else {
            return Ok(Vec::new());
        };

        if let Some(other) = references
            .iter()
            .find(|r| r.collection != first.collection)
        {
            return Err(CollectionError::MixedReferences {
                expected: first.collection.clone(),
                found: other.collection.clone(),
            });
        }

        let collection = self.collection(&first.collection)?;
        Ok(references.iter().map(|r| collection.get(&r.key)).collect())
    }

    /// Content entry by slug. Errors on data collections.
    pub fn get_entry_by_slug(&self, collection: &str, slug: &str) -> Result<Option<&ContentEntry>> {
        let collection = self.collection(collection)?;
        collection.expect_kind(CollectionKind::Content)?;
        Ok(collection.get(slug).and_then(Entry::as_content))
    }

    /// Data entry by id. Errors on content collections.
    pub fn get_data_entry_by_id(&self, collection: &str, id: &str) -> Result<Option<&DataEntry>> {
        let collection = self.collection(collection)?;
        collection.expect_kind(CollectionKind::Data)?;
        Ok(collection.get(id).and_then(Entry::as_data))
    }

    /// References held by `field` of `entry`, as declared by its schema.
    pub fn references_of(&self, entry: &Entry, field: &str) -> Result<Vec<EntryRef>> {
        let collection = self.collection(entry.collection())?;
        let target = collection
            .schema
            .get(field)
            .and_then(|rule| rule.kind.referenced_collection())
            .ok_or_else(|| CollectionError::NotAReference {
                collection: collection.name.clone(),
                field: field.to_string(),
            })?;

        let keys: Vec<&str> = match entry.data().get(field) {
            Some(Value::String(key)) => vec![key.as_str()],
            Some(Value::Sequence(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };

        Ok(keys.into_iter().map(|k| EntryRef::new(target, k)).collect())
    }

    /// Check every entry against its collection schema.
    pub fn validate(&self) -> Vec<EntryIssue> {
        let mut issues = Vec::new();

        for collection in self.collections.values() {
            if collection.schema.is_empty() {
                continue;
            }

            for entry in &collection.entries {
                let violations = collection.schema.validate(entry.data(), self);
                if !violations.is_empty() {
                    issues.push(EntryIssue {
                        collection: collection.name.clone(),
                        id: entry.id().to_string(),
                        path: entry.source_path().clone(),
                        violations,
                    });
                }
            }
        }

        issues
    }

    /// Keys of every entry, for comparing snapshots.
    pub fn manifest(&self) -> Manifest {
        let collections = self
            .collections
            .values()
            .map(|c| {
                let entries = c
                    .entries
                    .iter()
                    .map(|e| (e.id().to_string(), e.key().to_string()))
                    .collect();
                (c.name.clone(), entries)
            })
            .collect();

        Manifest { collections }
    }
}

impl ReferenceResolver for ContentRegistry {
    fn resolves(&self, collection: &str, key: &str) -> bool {
        self.collections
            .get(collection)
            .is_some_and(|c| c.get(key).is_some())
    }
}

/// Collection → id → key listing of a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    collections: BTreeMap<String, BTreeMap<String, String>>,
}

/// One manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub collection: String,
    pub id: String,
    pub key: String,
}

/// Entries added and removed between two manifests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDiff {
    pub added: Vec<ManifestEntry>,
    pub removed: Vec<ManifestEntry>,
}

impl ManifestDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl Manifest {
    /// Number of entries listed.
    pub fn len(&self) -> usize {
        self.collections.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Id → key pairs of one collection.
    pub fn collection(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.collections.get(name)
    }

    /// What changed going from `self` to `newer`.
    pub fn diff(&self, newer: &Manifest) -> ManifestDiff {
        ManifestDiff {
            added: missing_from(newer, self),
            removed: missing_from(self, newer),
        }
    }

    fn iter(&self) -> impl Iterator<Item = ManifestEntry> + '_ {
        self.collections.iter().flat_map(|(collection, entries)| {
            entries.iter().map(move |(id, key)| ManifestEntry {
                collection: collection.clone(),
                id: id.clone(),
                key: key.clone(),
            })
        })
    }

    fn contains(&self, collection: &str, id: &str) -> bool {
        self.collections
            .get(collection)
            .is_some_and(|entries| entries.contains_key(id))
    }
}

/// Entries of `source` that `other` lacks.
fn missing_from(source: &Manifest, other: &Manifest) -> Vec<ManifestEntry> {
    source
        .iter()
        .filter(|e| !other.contains(&e.collection, &e.id))
        .collect()
}
