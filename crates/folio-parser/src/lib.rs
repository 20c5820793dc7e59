//! folio Parser Library
//!
//! Parsers for content entries (Markdown, MDX) and data entries (JSON, YAML,
//! TOML), plus Markdown rendering with heading extraction.

pub mod data;
pub mod markdown;
pub mod syntax;

use std::path::Path;

pub use data::parse_data;
use folio_core::{CollectionKind, ContentType, DataFormat, EntryData};
pub use markdown::{MarkdownHeading, MarkdownParser, ParsedSource, Rendered};
pub use syntax::SyntaxHighlighter;
use thiserror::Error;

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParserError {
    /// Markdown parsing error.
    #[error("markdown error: {0}")]
    Markdown(#[from] markdown::MarkdownError),

    /// Data source parsing error.
    #[error("data error: {0}")]
    Data(#[from] folio_core::CoreError),

    /// File extension does not belong to the collection kind.
    #[error("unsupported file for a {kind} collection: {extension}")]
    UnsupportedExtension {
        kind: CollectionKind,
        extension: String,
    },
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// A parsed source file of either collection kind.
#[derive(Debug, Clone)]
pub enum ParsedFile {
    Content {
        content_type: ContentType,
        source: ParsedSource,
    },
    Data(EntryData),
}

/// Trait for entry source parsers.
pub trait SourceParser {
    /// Parse source text read from `path`.
    fn parse_source(&self, content: &str, path: &Path) -> Result<ParsedFile>;
}

impl SourceParser for MarkdownParser {
    fn parse_source(&self, content: &str, path: &Path) -> Result<ParsedFile> {
        let content_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ContentType::from_extension)
            .unwrap_or(ContentType::Markdown);

        Ok(ParsedFile::Content {
            content_type,
            source: self.parse(content, path)?,
        })
    }
}

/// Registry of parsers with extension-based dispatch.
#[derive(Debug, Default)]
pub struct ParserRegistry {
    markdown: MarkdownParser,
}

impl ParserRegistry {
    /// Create a new parser registry with default parsers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser registry with a custom syntax theme.
    pub fn with_theme(theme: &str) -> Self {
        Self {
            markdown: MarkdownParser::with_theme(theme),
        }
    }

    /// Parse a source belonging to a collection of `kind`.
    pub fn parse(&self, kind: CollectionKind, content: &str, path: &Path) -> Result<ParsedFile> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let unsupported = || ParserError::UnsupportedExtension {
            kind,
            extension: if ext.is_empty() { "(none)".to_string() } else { ext.to_string() },
        };

        match kind {
            CollectionKind::Content => {
                ContentType::from_extension(ext).ok_or_else(unsupported)?;
                self.markdown.parse_source(content, path)
            }
            CollectionKind::Data => {
                let format = DataFormat::from_extension(ext).ok_or_else(unsupported)?;
                Ok(ParsedFile::Data(parse_data(content, format, path)?))
            }
        }
    }

    /// Whether a file with this extension belongs in a collection of `kind`.
    pub fn accepts(kind: CollectionKind, ext: &str) -> bool {
        match kind {
            CollectionKind::Content => ContentType::from_extension(ext).is_some(),
            CollectionKind::Data => DataFormat::from_extension(ext).is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_markdown() {
        let registry = ParserRegistry::new();
        let content = "---\ntitle: \"Welcome\"\n---\n\n# Hello";

        let parsed = registry
            .parse(CollectionKind::Content, content, Path::new("welcome.md"))
            .unwrap();
        let ParsedFile::Content {
            content_type,
            source,
        } = parsed
        else {
            panic!("expected content");
        };
        assert_eq!(content_type, ContentType::Markdown);
        assert_eq!(source.data.str("title"), Some("Welcome"));
    }

    #[test]
    fn test_registry_mdx() {
        let registry = ParserRegistry::new();
        let parsed = registry
            .parse(CollectionKind::Content, "# Hi", Path::new("page.mdx"))
            .unwrap();
        assert!(matches!(
            parsed,
            ParsedFile::Content {
                content_type: ContentType::Mdx,
                ..
            }
        ));
    }

    #[test]
    fn test_registry_data() {
        let registry = ParserRegistry::new();
        let parsed = registry
            .parse(CollectionKind::Data, r#"{"a": "b"}"#, Path::new("en.json"))
            .unwrap();
        assert!(matches!(parsed, ParsedFile::Data(data) if data.str("a") == Some("b")));
    }

    #[test]
    fn test_registry_wrong_kind() {
        let registry = ParserRegistry::new();
        let result = registry.parse(CollectionKind::Data, "# Hi", Path::new("page.md"));
        assert!(matches!(
            result,
            Err(ParserError::UnsupportedExtension { .. })
        ));
    }

    #[test]
    fn test_accepts() {
        assert!(ParserRegistry::accepts(CollectionKind::Content, "mdx"));
        assert!(!ParserRegistry::accepts(CollectionKind::Content, "json"));
        assert!(ParserRegistry::accepts(CollectionKind::Data, "yml"));
    }

    #[test]
    fn test_source_parser_trait() {
        let parser = MarkdownParser::new();
        let result = SourceParser::parse_source(&parser, "Body only", Path::new("x.md"));
        assert!(result.is_ok());
    }
}
