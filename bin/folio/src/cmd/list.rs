//! List command - show collections and their entries

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use folio_collections::{ContentLoader, ContentRegistry};

use super::load_config;

/// Run the list command.
///
/// Without a collection name, lists every collection with its entry count.
pub fn run(config_path: &Path, collection: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let registry = ContentLoader::new(config)
        .load_unchecked()
        .wrap_err("Failed to load collections")?;

    print!("{}", format_listing(&registry, collection)?);
    Ok(())
}

/// Render the listing printed by [`run`].
pub fn format_listing(registry: &ContentRegistry, collection: Option<&str>) -> Result<String> {
    let mut out = String::new();

    let Some(name) = collection else {
        for collection in registry.collections() {
            out.push_str(&format!(
                "{:<16} {:<8} {:>5}\n",
                collection.name(),
                collection.kind().as_str(),
                collection.len()
            ));
        }
        return Ok(out);
    };

    let collection = registry.collection(name)?;
    for entry in collection.entries() {
        let title = entry.data().str("title").unwrap_or("");
        out.push_str(format!("{:<32} {:<40} {title}", entry.key(), entry.id()).trim_end());
        out.push('\n');
    }

    Ok(out)
}
