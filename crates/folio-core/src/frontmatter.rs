//! Frontmatter splitting and parsing for content files.

use std::{collections::HashMap, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::{
    content::EntryData,
    error::{CoreError, Result},
    schema::parse_date,
};

/// Well-known frontmatter fields of a documentation page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Page title.
    #[serde(default)]
    pub title: String,

    /// Page description for meta tags and summaries.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether this is a draft.
    #[serde(default)]
    pub draft: bool,

    /// Tags for the page.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Sidebar sort order.
    #[serde(default)]
    pub order: Option<i64>,

    /// Publication date.
    #[serde(default, deserialize_with = "de_date")]
    pub date: Option<DateTime<Utc>>,

    /// Last updated date.
    #[serde(default, deserialize_with = "de_date")]
    pub updated: Option<DateTime<Utc>>,

    /// Template to use for rendering.
    #[serde(default)]
    pub template: Option<String>,

    /// Any other fields.
    #[serde(default, flatten)]
    pub extra: HashMap<String, Value>,
}

fn de_date<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_date(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {s}"))),
    }
}

impl Frontmatter {
    /// Read the well-known fields out of entry data.
    pub fn from_data(data: &EntryData) -> Result<Self> {
        data.deserialize()
    }
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into frontmatter and body.
///
/// The opening delimiter must be the first line and the closing delimiter
/// must sit on a line of its own.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let first_line = content.lines().next()?.trim_end();

    let format = match first_line {
        "---" => FrontmatterFormat::Yaml,
        "+++" => FrontmatterFormat::Toml,
        _ => return None,
    };
    let delimiter = format.delimiter();

    let after_first = content[first_line.len()..].trim_start_matches(['\r', '\n']);

    let mut offset = 0;
    for line in after_first.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let frontmatter = after_first[..offset].trim();
            let body = after_first[offset + line.len()..].trim_start_matches(['\r', '\n']);
            return Some((format, frontmatter, body));
        }
        offset += line.len();
    }

    None
}

/// Parse frontmatter from a content source.
///
/// Content without frontmatter yields empty data and the full source as body.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(EntryData, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Ok((EntryData::default(), content.to_string()));
    };

    let value = match format {
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
        FrontmatterFormat::Toml => {
            let table: toml::Value =
                toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;
            toml_to_yaml(table)
        }
    };

    let data = EntryData::from_value(value)
        .ok_or_else(|| CoreError::frontmatter(path, "frontmatter must be a mapping"))?;

    Ok((data, body.to_string()))
}

/// Convert a TOML value into the YAML value model used for entry data.
///
/// Datetimes become their RFC 3339 string form.
pub fn toml_to_yaml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Value::Number(f.into()),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(toml_to_yaml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(k, v)| (Value::String(k), toml_to_yaml(v)))
                .collect(),
        ),
    }
}
