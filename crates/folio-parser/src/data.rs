//! Parsing of data entry sources.

use std::path::Path;

use folio_core::{CoreError, DataFormat, EntryData, frontmatter::toml_to_yaml};
use serde_yaml::Value;

/// Parse a JSON, YAML or TOML record. The top level must be an object.
pub fn parse_data(content: &str, format: DataFormat, path: &Path) -> folio_core::Result<EntryData> {
    let value: Value = match format {
        DataFormat::Json => {
            serde_json::from_str(content).map_err(|e| CoreError::data(path, e.to_string()))?
        }
        DataFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| CoreError::data(path, e.to_string()))?
        }
        DataFormat::Toml => {
            let table: toml::Value =
                toml::from_str(content).map_err(|e| CoreError::data(path, e.to_string()))?;
            toml_to_yaml(table)
        }
    };

    EntryData::from_value(value)
        .ok_or_else(|| CoreError::data(path, "top-level value must be an object"))
}
