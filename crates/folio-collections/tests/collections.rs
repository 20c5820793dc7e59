//! Integration tests over on-disk content trees.

use std::{
    fs,
    path::{Path, PathBuf},
};

use folio_collections::{
    CodeGenerator, CollectionError, ContentLoader, ContentRegistry, Entry, EntryRef, Renderer,
};
use folio_core::{CollectionConfig, Config, FieldKind, FieldRule, Schema, reference};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A docs site with a handful of pages and two translation dictionaries.
fn docs_site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let content = dir.path().join("src/content");

    write(
        &content,
        "docs/welcome.md",
        "---\ntitle: Welcome\ndescription: Start here\n---\n\n# Welcome\n\nHello.\n",
    );
    write(
        &content,
        "docs/guides/intro.mdx",
        "---\ntitle: Intro\ntags: [basics]\n---\nimport Card from '../Card.astro';\n\n## Setup\n\n<Card />\n",
    );
    write(
        &content,
        "docs/reference/config.md",
        "+++\ntitle = \"Configuration\"\ndraft = true\n+++\n\n## Options\n",
    );
    write(&content, "i18n/en.json", r#"{"search.label": "Search"}"#);
    write(&content, "i18n/fr/common.yaml", "search.label: Rechercher\n");

    dir
}

fn config_for(dir: &TempDir) -> Config {
    Config::default().with_root(dir.path())
}

fn load(dir: &TempDir) -> ContentRegistry {
    ContentLoader::new(config_for(dir)).load().unwrap()
}

fn ids(registry: &ContentRegistry, collection: &str) -> Vec<String> {
    registry
        .get_collection(collection)
        .unwrap()
        .iter()
        .map(|e| e.id().to_string())
        .collect()
}

#[test]
fn test_loads_docs_and_i18n() {
    let dir = docs_site();
    let registry = load(&dir);

    assert_eq!(
        ids(&registry, "docs"),
        vec!["guides/intro.mdx", "reference/config.md", "welcome.md"]
    );
    assert_eq!(ids(&registry, "i18n"), vec!["en", "fr/common"]);
}

#[test]
fn test_slug_is_id_without_extension() {
    let dir = docs_site();
    let registry = load(&dir);

    for entry in registry.get_collection("docs").unwrap() {
        let content = entry.as_content().unwrap();
        let stem = content.id.rsplit_once('.').map(|(stem, _)| stem).unwrap();
        assert_eq!(content.slug, stem);
    }
}

#[test]
fn test_collection_tag_matches_group() {
    let dir = docs_site();
    let registry = load(&dir);

    for collection in registry.collections() {
        for entry in collection.entries() {
            assert_eq!(entry.collection(), collection.name());
        }
    }
}

#[test]
fn test_accessors_over_loaded_tree() {
    let dir = docs_site();
    let registry = load(&dir);

    let intro = registry
        .get_entry_by_slug("docs", "guides/intro")
        .unwrap()
        .unwrap();
    assert_eq!(intro.data.str("title"), Some("Intro"));
    assert!(registry.get_entry_by_slug("docs", "unknown-page").unwrap().is_none());

    let fr = registry
        .get_data_entry_by_id("i18n", "fr/common")
        .unwrap()
        .unwrap();
    assert_eq!(fr.data.str("search.label"), Some("Rechercher"));

    let drafts = registry
        .filter_collection("docs", |e| e.data().bool("draft") == Some(true))
        .unwrap();
    assert_eq!(drafts.len(), 1);
    assert_eq!(drafts[0].key(), "reference/config");

    let batch = registry
        .get_entries(&[EntryRef::new("i18n", "fr/common"), EntryRef::new("i18n", "de")])
        .unwrap();
    assert!(batch[0].is_some());
    assert!(batch[1].is_none());

    assert!(matches!(
        registry.get_collection("blog"),
        Err(CollectionError::UnknownCollection(_))
    ));
}

#[test]
fn test_frontmatter_view() {
    let dir = docs_site();
    let registry = load(&dir);

    let config = registry
        .get_entry_by_slug("docs", "reference/config")
        .unwrap()
        .unwrap();
    let frontmatter = config.frontmatter().unwrap();
    assert_eq!(frontmatter.title, "Configuration");
    assert!(frontmatter.draft);
}

#[test]
fn test_render_mdx_entry() {
    let dir = docs_site();
    let registry = load(&dir);
    let renderer = Renderer::default();

    let intro = registry
        .get_entry_by_slug("docs", "guides/intro")
        .unwrap()
        .unwrap();
    let rendered = intro.render(&renderer);

    assert!(!rendered.html.contains("import Card"));
    assert_eq!(rendered.headings.len(), 1);
    assert_eq!(rendered.headings[0].slug, "setup");
    assert_eq!(rendered.headings[0].depth, 2);
    assert!(rendered.remark_plugin_frontmatter.contains_key("minutes_read"));
}

#[test]
fn test_adding_one_file_adds_one_key() {
    let dir = docs_site();
    let before = load(&dir).manifest();

    write(
        &dir.path().join("src/content"),
        "docs/guides/faq.md",
        "---\ntitle: FAQ\n---\n",
    );
    let after = load(&dir).manifest();

    let diff = before.diff(&after);
    assert_eq!(diff.added.len(), 1);
    assert_eq!(diff.added[0].id, "guides/faq.md");
    assert_eq!(diff.added[0].key, "guides/faq");
    assert!(diff.removed.is_empty());

    let before_docs = before.collection("docs").unwrap();
    let after_docs = after.collection("docs").unwrap();
    for (id, key) in before_docs {
        assert_eq!(after_docs.get(id), Some(key));
    }
}

#[test]
fn test_duplicate_slug_is_a_load_error() {
    let dir = docs_site();
    write(
        &dir.path().join("src/content"),
        "docs/welcome.mdx",
        "---\ntitle: Welcome again\n---\n",
    );

    let err = ContentLoader::new(config_for(&dir)).load().unwrap_err();
    assert!(matches!(
        err,
        CollectionError::DuplicateSlug { ref slug, .. } if slug == "welcome"
    ));
}

#[test]
fn test_every_violation_is_reported() {
    let dir = docs_site();
    let content = dir.path().join("src/content");
    write(&content, "docs/untitled.md", "---\ndescription: 42\n---\n");
    write(&content, "docs/also-untitled.md", "# No frontmatter\n");

    let err = ContentLoader::new(config_for(&dir)).load().unwrap_err();
    let CollectionError::Invalid { issues } = &err else {
        panic!("expected validation failure, got {err}");
    };

    assert_eq!(issues.len(), 2);
    let untitled = issues.iter().find(|i| i.id == "untitled.md").unwrap();
    assert_eq!(untitled.violations.len(), 2);

    let message = err.to_string();
    assert!(message.starts_with("2 entries failed validation"));
    assert!(message.contains("`description` expected string, found number"));
}

#[test]
fn test_dangling_reference_is_reported() {
    let dir = docs_site();
    let content = dir.path().join("src/content");
    write(
        &content,
        "docs/next-steps.md",
        "---\ntitle: Next steps\nprevious: guides/intro\nnext: guides/missing\n---\n",
    );

    let mut config = config_for(&dir);
    config.collections.insert(
        "docs".to_string(),
        CollectionConfig::content(
            Schema::new()
                .field("title", FieldRule::required(FieldKind::String))
                .field("previous", FieldRule::optional(reference("docs")))
                .field("next", FieldRule::optional(reference("docs"))),
        ),
    );

    let registry = ContentLoader::new(config.clone()).load_unchecked().unwrap();
    let issues = registry.validate();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].violations.len(), 1);
    assert!(issues[0].to_string().contains("guides/missing"));

    let next_steps = registry.get_entry("docs", "next-steps").unwrap().unwrap();
    let previous = registry.references_of(next_steps, "previous").unwrap();
    let resolved = registry.get_entry_by_ref(&previous[0]).unwrap();
    assert_eq!(resolved.map(Entry::id), Some("guides/intro.mdx"));

    assert!(ContentLoader::new(config).load().is_err());
}

#[test]
fn test_data_references_resolve_by_id() {
    let dir = docs_site();
    let content = dir.path().join("src/content");
    write(&content, "authors/ada.toml", "name = \"Ada\"\n");
    write(
        &content,
        "docs/credits.md",
        "---\ntitle: Credits\nauthors: [ada]\n---\n",
    );

    let mut config = config_for(&dir);
    config.collections.insert(
        "authors".to_string(),
        CollectionConfig::data(Schema::new().field("name", FieldRule::required(FieldKind::String))),
    );
    config.collections.insert(
        "docs".to_string(),
        CollectionConfig::content(
            Schema::new()
                .field("title", FieldRule::required(FieldKind::String))
                .field(
                    "authors",
                    FieldRule::optional(FieldKind::References {
                        collection: "authors".into(),
                    }),
                ),
        ),
    );

    let registry = ContentLoader::new(config).load().unwrap();
    let credits = registry.get_entry("docs", "credits").unwrap().unwrap();
    let refs = registry.references_of(credits, "authors").unwrap();
    let authors = registry.get_entries(&refs).unwrap();

    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].and_then(|e| e.data().str("name")), Some("Ada"));
}

#[test]
fn test_generated_module_lists_known_entries() {
    let dir = docs_site();
    let registry = load(&dir);

    let src = CodeGenerator::default().generate(&registry).unwrap();

    assert!(src.contains("pub enum DocsSlug {"));
    assert!(src.contains("\"guides/intro\" => Some(Self::GuidesIntro),"));
    assert!(src.contains("\"reference/config\" => Some(Self::ReferenceConfig),"));
    assert!(src.contains("pub enum I18nId {"));
    assert!(src.contains("\"fr/common\" => Some(Self::FrCommon),"));
    assert!(src.contains("pub static I18N_COLLECTION: StaticCollection"));
}

#[test]
fn test_generation_is_deterministic() {
    let dir = docs_site();
    let first = CodeGenerator::default().generate(&load(&dir)).unwrap();
    let second = CodeGenerator::default().generate(&load(&dir)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_configured_collection_without_directory_is_empty() {
    let dir = TempDir::new().unwrap();
    let content: PathBuf = dir.path().join("src/content");
    write(&content, "docs/welcome.md", "---\ntitle: Welcome\n---\n");

    let registry = load(&dir);
    assert!(registry.get_collection("i18n").unwrap().is_empty());
    assert!(registry.get_data_entry_by_id("i18n", "en").unwrap().is_none());
}
