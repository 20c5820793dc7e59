//! Collection schemas and the `reference` rule.
//!
//! A schema is a set of named field rules checked against each entry's data.
//! Fields not named by the schema pass through untouched.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::content::EntryData;

/// Expected shape of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Integer,
    Boolean,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    Date,
    /// List of strings.
    Strings,
    /// Slug or id of an entry in another (or the same) collection.
    Reference { collection: String },
    /// List of references into one collection.
    References { collection: String },
    Any,
}

impl FieldKind {
    fn describe(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Strings => "list of strings",
            Self::Reference { .. } => "reference",
            Self::References { .. } => "list of references",
            Self::Any => "any value",
        }
    }

    /// Collection targeted by a reference rule.
    pub fn referenced_collection(&self) -> Option<&str> {
        match self {
            Self::Reference { collection } | Self::References { collection } => Some(collection),
            _ => None,
        }
    }
}

/// Rule for a string field that must resolve to an entry of `collection`.
pub fn reference(collection: impl Into<String>) -> FieldKind {
    FieldKind::Reference {
        collection: collection.into(),
    }
}

/// A field kind plus whether the field may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    #[serde(flatten)]
    pub kind: FieldKind,

    #[serde(default)]
    pub optional: bool,
}

impl FieldRule {
    pub fn required(kind: FieldKind) -> Self {
        Self {
            kind,
            optional: false,
        }
    }

    pub fn optional(kind: FieldKind) -> Self {
        Self {
            kind,
            optional: true,
        }
    }
}

/// Answers whether a reference key names an existing entry.
pub trait ReferenceResolver {
    /// `key` is a slug for content collections and an id for data collections.
    fn resolves(&self, collection: &str, key: &str) -> bool;
}

/// Why a field failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    Missing,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    InvalidDate(String),
    UnresolvedReference {
        collection: String,
        key: String,
    },
}

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub field: String,
    pub kind: ViolationKind,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::Missing => write!(f, "`{}` is required", self.field),
            ViolationKind::WrongType { expected, found } => {
                write!(f, "`{}` expected {expected}, found {found}", self.field)
            }
            ViolationKind::InvalidDate(raw) => {
                write!(f, "`{}` is not a valid date: {raw}", self.field)
            }
            ViolationKind::UnresolvedReference { collection, key } => write!(
                f,
                "`{}` references `{key}`, which is not an entry of `{collection}`",
                self.field
            ),
        }
    }
}

/// Field rules of one collection, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, FieldRule>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field rule, builder style.
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.insert(name.into(), rule);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields holding references, with their target collection.
    pub fn reference_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter_map(|(name, rule)| Some((name.as_str(), rule.kind.referenced_collection()?)))
    }

    /// Check entry data against every rule, reporting all violations.
    pub fn validate(
        &self,
        data: &EntryData,
        resolver: &dyn ReferenceResolver,
    ) -> Vec<SchemaViolation> {
        let mut violations = Vec::new();

        for (name, rule) in &self.fields {
            let value = data.get(name).filter(|v| !v.is_null());
            let Some(value) = value else {
                if !rule.optional {
                    violations.push(SchemaViolation {
                        field: name.clone(),
                        kind: ViolationKind::Missing,
                    });
                }
                continue;
            };

            if let Some(kind) = check_value(&rule.kind, value, resolver) {
                violations.push(SchemaViolation {
                    field: name.clone(),
                    kind,
                });
            }
        }

        violations
    }
}

fn check_value(
    kind: &FieldKind,
    value: &Value,
    resolver: &dyn ReferenceResolver,
) -> Option<ViolationKind> {
    let wrong_type = || ViolationKind::WrongType {
        expected: kind.describe(),
        found: value_type(value),
    };

    match kind {
        FieldKind::Any => None,
        FieldKind::String => (!value.is_string()).then(wrong_type),
        FieldKind::Number => (!value.is_number()).then(wrong_type),
        FieldKind::Integer => (!(value.is_i64() || value.is_u64())).then(wrong_type),
        FieldKind::Boolean => (!value.is_bool()).then(wrong_type),
        FieldKind::Date => match value.as_str() {
            Some(raw) if parse_date(raw).is_some() => None,
            Some(raw) => Some(ViolationKind::InvalidDate(raw.to_string())),
            None => Some(wrong_type()),
        },
        FieldKind::Strings => match value.as_sequence() {
            Some(items) if items.iter().all(Value::is_string) => None,
            _ => Some(wrong_type()),
        },
        FieldKind::Reference { collection } => match value.as_str() {
            Some(key) => unresolved(resolver, collection, key),
            None => Some(wrong_type()),
        },
        FieldKind::References { collection } => {
            let Some(items) = value.as_sequence() else {
                return Some(wrong_type());
            };
            for item in items {
                let Some(key) = item.as_str() else {
                    return Some(wrong_type());
                };
                if let Some(violation) = unresolved(resolver, collection, key) {
                    return Some(violation);
                }
            }
            None
        }
    }
}

fn unresolved(
    resolver: &dyn ReferenceResolver,
    collection: &str,
    key: &str,
) -> Option<ViolationKind> {
    (!resolver.resolves(collection, key)).then(|| ViolationKind::UnresolvedReference {
        collection: collection.to_string(),
        key: key.to_string(),
    })
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Parse an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
