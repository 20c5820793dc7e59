//! Registry module generation.
//!
//! Emits Rust source that bakes a loaded registry into statics, plus one
//! enum per collection naming every entry known at generation time. The
//! output only depends on `folio-core`.

use std::{collections::HashSet, fs, io, path::Path};

use folio_core::CollectionKind;
use tracing::{debug, info};

use crate::{
    error::Result,
    registry::{Collection, ContentRegistry},
};

/// Generates the registry module source.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    crate_path: String,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new("folio_core")
    }
}

impl CodeGenerator {
    /// `crate_path` is how the generated module names `folio-core`.
    pub fn new(crate_path: impl Into<String>) -> Self {
        Self {
            crate_path: crate_path.into(),
        }
    }

    /// Render the module for `registry`.
    pub fn generate(&self, registry: &ContentRegistry) -> Result<String> {
        let collections: Vec<&Collection> = registry.collections().collect();
        let names = variant_names(collections.iter().map(|c| c.name()));
        let statics = static_names(&names);

        let mut src = String::new();
        src.push_str("// @generated by folio from the content directory. Do not edit.\n\n");
        src.push_str(&format!(
            "use {}::content::CollectionKind;\n",
            self.crate_path
        ));
        src.push_str(&format!(
            "use {}::snapshot::{{KnownEntry, StaticCollection, StaticEntry}};\n\n",
            self.crate_path
        ));

        src.push_str(&collection_name_enum(&collections, &names, &statics));

        src.push_str("/// Every collection, ordered by name.\n");
        src.push_str("pub static COLLECTIONS: &[&StaticCollection] = &[");
        let refs: Vec<String> = statics.iter().map(|s| format!("&{s}")).collect();
        src.push_str(&refs.join(", "));
        src.push_str("];\n");

        for ((collection, name), static_name) in collections.iter().zip(&names).zip(&statics) {
            src.push('\n');
            src.push_str(&collection_static(collection, static_name)?);
            src.push('\n');
            src.push_str(&key_enum(collection, name, static_name));
        }

        debug!(
            collections = collections.len(),
            bytes = src.len(),
            "generated registry module"
        );
        Ok(src)
    }
}

/// Write `source` to `path` unless the file already holds it.
///
/// Returns whether the file was written.
pub fn write_if_changed(path: &Path, source: &str) -> io::Result<bool> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == source) {
        debug!(path = %path.display(), "registry module unchanged");
        return Ok(false);
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, source)?;
    info!(path = %path.display(), "wrote registry module");
    Ok(true)
}

fn collection_name_enum(
    collections: &[&Collection],
    names: &[String],
    statics: &[String],
) -> String {
    let mut src = String::new();

    src.push_str("/// Collection names.\n");
    src.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]\n");
    src.push_str("pub enum CollectionName {\n");
    for name in names {
        src.push_str(&format!("    {name},\n"));
    }
    src.push_str("}\n\n");

    src.push_str("impl CollectionName {\n");
    src.push_str(&format!(
        "    pub const ALL: &'static [CollectionName] = &[{}];\n\n",
        names
            .iter()
            .map(|n| format!("CollectionName::{n}"))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    src.push_str("    pub fn as_str(self) -> &'static str {\n");
    push_match(
        &mut src,
        collections
            .iter()
            .zip(names)
            .map(|(c, n)| format!("Self::{n} => {:?},", c.name())),
    );
    src.push_str("    }\n\n");

    src.push_str("    pub fn collection(self) -> &'static StaticCollection {\n");
    push_match(
        &mut src,
        names
            .iter()
            .zip(statics)
            .map(|(n, s)| format!("Self::{n} => &{s},")),
    );
    src.push_str("    }\n");
    src.push_str("}\n\n");

    src
}

fn collection_static(collection: &Collection, static_name: &str) -> Result<String> {
    let mut src = String::new();
    let kind = match collection.kind() {
        CollectionKind::Content => "Content",
        CollectionKind::Data => "Data",
    };

    src.push_str(&format!(
        "pub static {static_name}: StaticCollection = StaticCollection {{\n"
    ));
    src.push_str(&format!("    name: {:?},\n", collection.name()));
    src.push_str(&format!("    kind: CollectionKind::{kind},\n"));

    if collection.is_empty() {
        src.push_str("    entries: &[],\n");
    } else {
        src.push_str("    entries: &[\n");
        for entry in collection.entries() {
            let (slug, body) = match entry.as_content() {
                Some(content) => (
                    format!("Some({:?})", content.slug),
                    format!("Some({:?})", content.body),
                ),
                None => ("None".to_string(), "None".to_string()),
            };

            src.push_str("        StaticEntry {\n");
            src.push_str(&format!("            id: {:?},\n", entry.id()));
            src.push_str(&format!("            slug: {slug},\n"));
            src.push_str(&format!("            body: {body},\n"));
            src.push_str(&format!("            collection: {:?},\n", entry.collection()));
            src.push_str(&format!(
                "            data_json: {:?},\n",
                entry.data().to_json()?
            ));
            src.push_str("        },\n");
        }
        src.push_str("    ],\n");
    }

    src.push_str("};\n");
    Ok(src)
}

fn key_enum(collection: &Collection, collection_variant: &str, static_name: &str) -> String {
    let suffix = match collection.kind() {
        CollectionKind::Content => "Slug",
        CollectionKind::Data => "Id",
    };
    let enum_name = format!("{collection_variant}{suffix}");
    let keys: Vec<&str> = collection.entries().iter().map(|e| e.key()).collect();
    let variants = variant_names(keys.iter().copied());

    let mut src = String::new();
    src.push_str(&format!(
        "/// Entries of `{}` known when this module was generated.\n",
        collection.name()
    ));
    src.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]\n");
    src.push_str(&format!("pub enum {enum_name} {{\n"));
    for (key, variant) in keys.iter().zip(&variants) {
        src.push_str(&format!("    /// `{key}`\n"));
        src.push_str(&format!("    {variant},\n"));
    }
    src.push_str("}\n\n");

    src.push_str(&format!("impl {enum_name} {{\n"));
    src.push_str(&format!(
        "    pub const ALL: &'static [{enum_name}] = &[{}];\n\n",
        variants
            .iter()
            .map(|v| format!("{enum_name}::{v}"))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    src.push_str("    pub fn as_str(self) -> &'static str {\n");
    push_match(
        &mut src,
        keys.iter()
            .zip(&variants)
            .map(|(k, v)| format!("Self::{v} => {k:?},")),
    );
    src.push_str("    }\n\n");

    src.push_str("    pub fn from_key(key: &str) -> Option<Self> {\n");
    src.push_str("        match key {\n");
    for (key, variant) in keys.iter().zip(&variants) {
        src.push_str(&format!("            {key:?} => Some(Self::{variant}),\n"));
    }
    src.push_str("            _ => None,\n");
    src.push_str("        }\n");
    src.push_str("    }\n");
    src.push_str("}\n\n");

    src.push_str(&format!("impl KnownEntry for {enum_name} {{\n"));
    src.push_str(&format!(
        "    const COLLECTION: &'static str = {:?};\n\n",
        collection.name()
    ));
    src.push_str("    fn key(self) -> &'static str {\n");
    src.push_str("        self.as_str()\n");
    src.push_str("    }\n\n");
    src.push_str("    fn entry(self) -> &'static StaticEntry {\n");
    push_match(
        &mut src,
        variants
            .iter()
            .enumerate()
            .map(|(i, v)| format!("Self::{v} => &{static_name}.entries[{i}],")),
    );
    src.push_str("    }\n");
    src.push_str("}\n");

    src
}

/// Emit `match self { .. }` at method body indentation.
fn push_match(src: &mut String, arms: impl Iterator<Item = String>) {
    let arms: Vec<String> = arms.collect();
    if arms.is_empty() {
        src.push_str("        match self {}\n");
        return;
    }

    src.push_str("        match self {\n");
    for arm in arms {
        src.push_str(&format!("            {arm}\n"));
    }
    src.push_str("        }\n");
}

/// Static item names for collection variants, unique within the returned list.
fn static_names(variants: &[String]) -> Vec<String> {
    let mut taken = HashSet::new();

    variants
        .iter()
        .map(|variant| {
            let base = upper_snake_case(variant);
            let mut name = format!("{base}_COLLECTION");
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = format!("{base}{n}_COLLECTION");
                n += 1;
            }
            name
        })
        .collect()
}

/// `GuidesV2` → `GUIDES_V2`
fn upper_snake_case(name: &str) -> String {
    let mut out = String::new();
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        out.push(c.to_ascii_uppercase());
    }
    out
}

/// PascalCase identifiers for `keys`, unique within the returned list.
fn variant_names<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();

    keys.map(|key| {
        let base = pascal_case(key);
        let mut name = base.clone();
        let mut n = 2;
        while !taken.insert(name.clone()) {
            name = format!("{base}{n}");
            n += 1;
        }
        name
    })
    .collect()
}

/// `guides/getting-started` → `GuidesGettingStarted`
fn pascal_case(key: &str) -> String {
    let mut name = String::new();
    for word in key.split(|c: char| !c.is_ascii_alphanumeric()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.push(first.to_ascii_uppercase());
            name.push_str(chars.as_str());
        }
    }

    match name.chars().next() {
        None => "Entry".to_string(),
        Some(c) if c.is_ascii_digit() => format!("E{name}"),
        Some(_) if name == "Self" => "SelfEntry".to_string(),
        Some(_) => name,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use folio_core::{ContentType, EntryData, Schema};

    use super::*;
    use crate::entry::{ContentEntry, DataEntry, Entry};

    fn registry() -> ContentRegistry {
        let page = |id: &str, title: &str| {
            let mut data = EntryData::default();
            data.insert("title", title.into());
            Entry::Content(ContentEntry {
                id: id.to_string(),
                slug: folio_core::content::derive_slug(id),
                body: format!("# {title}\n"),
                collection: "docs".into(),
                data,
                content_type: ContentType::Markdown,
                source_path: PathBuf::from(id),
            })
        };

        let docs = Collection::new("docs", CollectionKind::Content, Schema::new())
            .with_entries(vec![
                page("welcome.md", "Welcome"),
                page("guides/getting-started.md", "Getting \"started\""),
            ])
            .unwrap();
        let i18n = Collection::new("i18n", CollectionKind::Data, Schema::new());
        let authors = Collection::new("authors", CollectionKind::Data, Schema::new())
            .with_entries(vec![Entry::Data(DataEntry {
                id: "ada".into(),
                collection: "authors".into(),
                data: EntryData::default(),
                source_path: PathBuf::from("ada.json"),
            })])
            .unwrap();

        ContentRegistry::new()
            .with_collection(docs)
            .with_collection(i18n)
            .with_collection(authors)
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("guides/getting-started"), "GuidesGettingStarted");
        assert_eq!(pascal_case("welcome"), "Welcome");
        assert_eq!(pascal_case("2024/recap"), "E2024Recap");
        assert_eq!(pascal_case("self"), "SelfEntry");
        assert_eq!(pascal_case("---"), "Entry");
    }

    #[test]
    fn test_variant_names_are_unique() {
        let names = variant_names(["a-b", "a/b", "a_b"].into_iter());
        assert_eq!(names, vec!["AB", "AB2", "AB3"]);
    }

    #[test]
    fn test_static_names() {
        let names = variant_names(["docs", "guides-v2", "i18n"].into_iter());
        assert_eq!(
            static_names(&names),
            vec!["DOCS_COLLECTION", "GUIDES_V2_COLLECTION", "I18N_COLLECTION"]
        );
    }

    #[test]
    fn test_static_names_are_unique() {
        let names = variant_names(["a-bc", "abc", "release-notes", "release_notes"].into_iter());
        assert_eq!(names, vec!["ABc", "Abc", "ReleaseNotes", "ReleaseNotes2"]);
        assert_eq!(
            static_names(&names),
            vec![
                "ABC_COLLECTION",
                "ABC2_COLLECTION",
                "RELEASE_NOTES_COLLECTION",
                "RELEASE_NOTES2_COLLECTION",
            ]
        );
    }

    #[test]
    fn test_generate_similar_collection_names() {
        let collection = |name| Collection::new(name, CollectionKind::Content, Schema::new());
        let registry = ContentRegistry::new()
            .with_collection(collection("release-notes"))
            .with_collection(collection("release_notes"));
        let src = CodeGenerator::default().generate(&registry).unwrap();

        assert_eq!(src.matches("pub static RELEASE_NOTES_COLLECTION:").count(), 1);
        assert_eq!(src.matches("pub static RELEASE_NOTES2_COLLECTION:").count(), 1);
        assert!(src.contains("pub enum ReleaseNotesSlug {"));
        assert!(src.contains("pub enum ReleaseNotes2Slug {"));
        assert!(src.contains("Self::ReleaseNotes2 => &RELEASE_NOTES2_COLLECTION,"));
    }

    #[test]
    fn test_generate_header_and_imports() {
        let src = CodeGenerator::new("crate::core").generate(&registry()).unwrap();
        assert!(src.starts_with("// @generated by folio"));
        assert!(
            src.contains("use crate::core::snapshot::{KnownEntry, StaticCollection, StaticEntry};")
        );
        assert!(src.contains("use crate::core::content::CollectionKind;"));
    }

    #[test]
    fn test_generate_collection_names() {
        let src = CodeGenerator::default().generate(&registry()).unwrap();
        assert!(src.contains("pub enum CollectionName {\n    Authors,\n    Docs,\n    I18n,\n}"));
        assert!(src.contains(
            "pub static COLLECTIONS: &[&StaticCollection] = &[&AUTHORS_COLLECTION, &DOCS_COLLECTION, &I18N_COLLECTION];"
        ));
        assert!(src.contains("Self::I18n => \"i18n\","));
    }

    #[test]
    fn test_generate_content_enum() {
        let src = CodeGenerator::default().generate(&registry()).unwrap();

        assert!(src.contains("pub enum DocsSlug {"));
        assert!(src.contains("    GuidesGettingStarted,\n"));
        assert!(src.contains("\"guides/getting-started\" => Some(Self::GuidesGettingStarted),"));
        assert!(src.contains("Self::Welcome => &DOCS_COLLECTION.entries[1],"));
        assert!(src.contains("slug: Some(\"welcome\"),"));
        assert!(src.contains("kind: CollectionKind::Content,"));
    }

    #[test]
    fn test_generate_escapes_strings() {
        let src = CodeGenerator::default().generate(&registry()).unwrap();
        assert!(src.contains(r##"body: Some("# Getting \"started\"\n"),"##));
        assert!(src.contains(r#"data_json: "{\"title\":\"Getting \\\"started\\\"\"}","#));
    }

    #[test]
    fn test_generate_data_enum() {
        let src = CodeGenerator::default().generate(&registry()).unwrap();

        assert!(src.contains("pub enum AuthorsId {"));
        assert!(src.contains("Self::Ada => &AUTHORS_COLLECTION.entries[0],"));
        assert!(src.contains("slug: None,"));
    }

    #[test]
    fn test_generate_empty_collection() {
        let src = CodeGenerator::default().generate(&registry()).unwrap();

        assert!(src.contains("pub enum I18nId {\n}"));
        assert!(src.contains("pub const ALL: &'static [I18nId] = &[];"));
        assert!(src.contains("    entries: &[],\n"));
        assert!(src.contains("        match self {}\n"));
    }

    #[test]
    fn test_write_if_changed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("src/content_registry.rs");

        assert!(write_if_changed(&path, "// a\n").unwrap());
        assert!(!write_if_changed(&path, "// a\n").unwrap());
        assert!(write_if_changed(&path, "// b\n").unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "// b\n");
    }
}
