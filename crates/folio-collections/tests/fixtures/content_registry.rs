// @generated by folio from the content directory. Do not edit.

use folio_core::content::CollectionKind;
use folio_core::snapshot::{KnownEntry, StaticCollection, StaticEntry};

/// Collection names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CollectionName {
    Docs,
    I18n,
}

impl CollectionName {
    pub const ALL: &'static [CollectionName] = &[CollectionName::Docs, CollectionName::I18n];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Docs => "docs",
            Self::I18n => "i18n",
        }
    }

    pub fn collection(self) -> &'static StaticCollection {
        match self {
            Self::Docs => &DOCS_COLLECTION,
            Self::I18n => &I18N_COLLECTION,
        }
    }
}

/// Every collection, ordered by name.
pub static COLLECTIONS: &[&StaticCollection] = &[&DOCS_COLLECTION, &I18N_COLLECTION];

pub static DOCS_COLLECTION: StaticCollection = StaticCollection {
    name: "docs",
    kind: CollectionKind::Content,
    entries: &[
        StaticEntry {
            id: "guides/intro.md",
            slug: Some("guides/intro"),
            body: Some("Hello.\n"),
            collection: "docs",
            data_json: "{\"title\":\"Intro\"}",
        },
        StaticEntry {
            id: "welcome.md",
            slug: Some("welcome"),
            body: Some("# Welcome\n"),
            collection: "docs",
            data_json: "{\"title\":\"Welcome\"}",
        },
    ],
};

/// Entries of `docs` known when this module was generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocsSlug {
    /// `guides/intro`
    GuidesIntro,
    /// `welcome`
    Welcome,
}

impl DocsSlug {
    pub const ALL: &'static [DocsSlug] = &[DocsSlug::GuidesIntro, DocsSlug::Welcome];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::GuidesIntro => "guides/intro",
            Self::Welcome => "welcome",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "guides/intro" => Some(Self::GuidesIntro),
            "welcome" => Some(Self::Welcome),
            _ => None,
        }
    }
}

impl KnownEntry for DocsSlug {
    const COLLECTION: &'static str = "docs";

    fn key(self) -> &'static str {
        self.as_str()
    }

    fn entry(self) -> &'static StaticEntry {
        match self {
            Self::GuidesIntro => &DOCS_COLLECTION.entries[0],
            Self::Welcome => &DOCS_COLLECTION.entries[1],
        }
    }
}

pub static I18N_COLLECTION: StaticCollection = StaticCollection {
    name: "i18n",
    kind: CollectionKind::Data,
    entries: &[],
};

/// Entries of `i18n` known when this module was generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum I18nId {
}

impl I18nId {
    pub const ALL: &'static [I18nId] = &[];

    pub fn as_str(self) -> &'static str {
        match self {}
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            _ => None,
        }
    }
}

impl KnownEntry for I18nId {
    const COLLECTION: &'static str = "i18n";

    fn key(self) -> &'static str {
        self.as_str()
    }

    fn entry(self) -> &'static StaticEntry {
        match self {}
    }
}
