//! New command - scaffold a new collection entry

use std::{
    fs,
    path::{Component, Path, PathBuf},
};

use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr, bail};
use folio_core::{CollectionKind, Config, DataFormat};
use folio_parser::ParserRegistry;

use super::load_config;

/// Run the new command.
///
/// `path` is `COLLECTION/PATH`, e.g. `docs/guides/faq`.
pub fn run(config_path: &Path, path: &Path, title: Option<&str>) -> Result<()> {
    tracing::info!(?path, "Creating new entry");

    let config = load_config(config_path)?;
    let file_path = create_entry(&config, path, title)?;

    println!("Created: {}", file_path.display());
    Ok(())
}

/// Write the scaffolded entry and return its path.
pub fn create_entry(config: &Config, path: &Path, title: Option<&str>) -> Result<PathBuf> {
    let mut components = path.components();
    let (Some(Component::Normal(collection)), rest) = (components.next(), components.as_path())
    else {
        bail!("Expected COLLECTION/PATH, got {}", path.display());
    };
    if rest.as_os_str().is_empty() {
        bail!("Expected COLLECTION/PATH, got {}", path.display());
    }
    if rest.components().any(|c| !matches!(c, Component::Normal(_))) {
        bail!("Entry path must stay inside the collection: {}", path.display());
    }

    let collection = collection.to_string_lossy();
    let kind = config
        .collection(&collection)
        .map(|c| c.kind)
        .unwrap_or_default();

    let full_path = config.content_dir().join(path);
    let file_path = match full_path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ParserRegistry::accepts(kind, ext) => full_path,
        // `v1.2` keeps its dot, the extension is appended
        _ => {
            let default_ext = match kind {
                CollectionKind::Content => "md",
                CollectionKind::Data => "json",
            };
            let mut name = full_path.into_os_string();
            name.push(".");
            name.push(default_ext);
            PathBuf::from(name)
        }
    };

    let source = match kind {
        CollectionKind::Content => {
            let title = title.map(str::to_string).unwrap_or_else(|| title_from_path(rest));
            markdown_template(&title)
        }
        CollectionKind::Data => data_template(&file_path),
    };

    if file_path.exists() {
        bail!("{} already exists", file_path.display());
    }

    // Create parent directories
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).wrap_err("Failed to create directories")?;
    }

    fs::write(&file_path, source).wrap_err("Failed to write file")?;

    tracing::info!(?file_path, %kind, "Created new entry");
    Ok(file_path)
}

/// `guides/getting-started` → `Getting started`
fn title_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled")
        .replace(['-', '_'], " ");

    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Untitled".to_string(),
    }
}

/// An empty object in the format the extension names.
fn data_template(path: &Path) -> String {
    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(DataFormat::from_extension);
    match format {
        Some(DataFormat::Toml) => String::new(),
        _ => "{}\n".to_string(),
    }
}

fn markdown_template(title: &str) -> String {
    let title = title.replace('\\', "\\\\").replace('"', "\\\"");
    let date = Utc::now().format("%Y-%m-%d").to_string();

    format!(
        r#"---
title: "{title}"
date: {date}
draft: true
---

Write your content here.
"#
    )
}
