//! Static registry types referenced by generated registry modules.
//!
//! A generated module declares one [`StaticCollection`] per collection and
//! one enum per collection whose variants are the entries known when the
//! module was generated. Looking up a variant through [`KnownEntry`] cannot
//! fail; looking up an arbitrary string through [`StaticCollection::get`]
//! returns an `Option`.

use crate::{
    content::{CollectionKind, EntryData},
    error::Result,
};

/// One entry baked into a generated registry.
#[derive(Debug)]
pub struct StaticEntry {
    /// Path-like key, e.g. `guides/intro.md` (content) or `en` (data).
    pub id: &'static str,
    /// Slug for content entries; `None` for data entries.
    pub slug: Option<&'static str>,
    /// Raw body for content entries; `None` for data entries.
    pub body: Option<&'static str>,
    pub collection: &'static str,
    /// Validated frontmatter or data record as a JSON object.
    pub data_json: &'static str,
}

impl StaticEntry {
    /// Lookup key: the slug for content entries, the id for data entries.
    pub fn key(&self) -> &'static str {
        self.slug.unwrap_or(self.id)
    }

    /// Decode the embedded entry data.
    pub fn data(&self) -> Result<EntryData> {
        EntryData::from_json(self.data_json)
    }
}

/// A collection baked into a generated registry.
#[derive(Debug)]
pub struct StaticCollection {
    pub name: &'static str,
    pub kind: CollectionKind,
    /// Entries ordered by id.
    pub entries: &'static [StaticEntry],
}

impl StaticCollection {
    /// Find an entry by slug (content) or id (data).
    pub fn get(&self, key: &str) -> Option<&'static StaticEntry> {
        let entries: &'static [StaticEntry] = self.entries;
        entries.iter().find(|e| e.key() == key)
    }

    /// Find an entry by its path-like id.
    pub fn get_by_id(&self, id: &str) -> Option<&'static StaticEntry> {
        let entries: &'static [StaticEntry] = self.entries;
        entries.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static StaticEntry> {
        let entries: &'static [StaticEntry] = self.entries;
        entries.iter()
    }

    /// Entries accepted by `predicate`, in id order.
    pub fn filter<F>(&self, predicate: F) -> Vec<&'static StaticEntry>
    where
        F: Fn(&StaticEntry) -> bool,
    {
        self.iter().filter(|e| predicate(e)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// An entry key that was known when the registry was generated.
pub trait KnownEntry: Copy + 'static {
    /// Name of the collection the key belongs to.
    const COLLECTION: &'static str;

    /// Slug or id of the entry.
    fn key(self) -> &'static str;

    /// The entry itself; always present.
    fn entry(self) -> &'static StaticEntry;
}

/// Resolve a known key. Never absent.
pub fn get_known<K: KnownEntry>(key: K) -> &'static StaticEntry {
    key.entry()
}
