//! Markdown and MDX rendering using pulldown-cmark.

use std::{collections::HashMap, path::Path};

use folio_core::{EntryData, content::ContentType, frontmatter::parse_frontmatter};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::syntax::SyntaxHighlighter;

/// Markdown parsing errors.
#[derive(Debug, Error)]
pub enum MarkdownError {
    /// Failed to parse frontmatter.
    #[error("frontmatter error: {0}")]
    Frontmatter(#[from] folio_core::CoreError),
}

/// Result type for markdown operations.
pub type Result<T> = std::result::Result<T, MarkdownError>;

/// A content source split into frontmatter data and body.
#[derive(Debug, Clone)]
pub struct ParsedSource {
    pub data: EntryData,
    /// Raw body after the frontmatter block.
    pub body: String,
}

/// Heading found while rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownHeading {
    /// Heading level (1-6).
    pub depth: u8,
    /// Anchor id, unique within the document.
    pub slug: String,
    pub text: String,
}

/// Rendered HTML plus the headings it contains.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub html: String,
    pub headings: Vec<MarkdownHeading>,
}

/// Markdown parser with syntax highlighting support.
#[derive(Debug)]
pub struct MarkdownParser {
    highlighter: SyntaxHighlighter,
    options: Options,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownParser {
    /// Create a new markdown parser with default options.
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            highlighter: SyntaxHighlighter::default(),
            options,
        }
    }

    /// Create a parser with a custom syntax theme.
    pub fn with_theme(theme: &str) -> Self {
        let mut parser = Self::new();
        parser.highlighter.set_theme(theme);
        parser
    }

    /// Split a content source into frontmatter data and body.
    pub fn parse(&self, content: &str, path: &Path) -> Result<ParsedSource> {
        let (data, body) = parse_frontmatter(content, path)?;
        Ok(ParsedSource { data, body })
    }

    /// Render a body to HTML, collecting headings.
    pub fn render(&self, body: &str, content_type: ContentType) -> Rendered {
        match content_type {
            ContentType::Markdown => self.render_markdown(body),
            ContentType::Mdx => self.render_markdown(&strip_mdx_esm(body)),
        }
    }

    fn render_markdown(&self, content: &str) -> Rendered {
        let parser = Parser::new_ext(content, self.options);
        let mut slugger = HeadingSlugger::default();
        let mut headings = Vec::new();
        let mut html = String::new();

        // (level, explicit id, text, offset of the heading's inner html)
        let mut current_heading: Option<(u8, Option<String>, String, usize)> = None;
        let mut code_block: Option<Option<String>> = None;
        let mut code_block_content = String::new();
        let mut image: Option<(String, String, String)> = None;
        let mut in_table_head = false;

        for event in parser {
            // Image alt text is collected instead of emitted.
            if let Some((_, _, ref mut alt)) = image {
                match &event {
                    Event::Text(text) | Event::Code(text) => {
                        alt.push_str(text);
                        continue;
                    }
                    Event::End(TagEnd::Image) => {}
                    _ => continue,
                }
            }

            match event {
                Event::Start(Tag::Heading { level, id, .. }) => {
                    current_heading =
                        Some((level as u8, id.map(|i| i.to_string()), String::new(), html.len()));
                }

                Event::End(TagEnd::Heading(level)) => {
                    let lvl = level as u8;
                    if let Some((_, explicit_id, text, start)) = current_heading.take() {
                        let inner = html.split_off(start);
                        let slug = match explicit_id {
                            Some(id) => slugger.claim(id),
                            None => slugger.slug(&text),
                        };
                        html.push_str(&format!(
                            "<h{lvl} id=\"{}\">{inner}</h{lvl}>\n",
                            html_escape(&slug)
                        ));
                        headings.push(MarkdownHeading {
                            depth: lvl,
                            slug,
                            text,
                        });
                    }
                }

                Event::Start(Tag::CodeBlock(kind)) => {
                    code_block = Some(match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    });
                    code_block_content.clear();
                }

                Event::End(TagEnd::CodeBlock) => {
                    if let Some(lang) = code_block.take() {
                        let highlighted = self
                            .highlighter
                            .highlight(&code_block_content, lang.as_deref());
                        html.push_str(&highlighted);
                        html.push('\n');
                    }
                    code_block_content.clear();
                }

                Event::Text(text) if code_block.is_some() => {
                    code_block_content.push_str(&text);
                }

                Event::Text(text) => {
                    if let Some((_, _, ref mut heading_text, _)) = current_heading {
                        heading_text.push_str(&text);
                    }
                    html.push_str(&html_escape(&text));
                }

                Event::Code(code) => {
                    if let Some((_, _, ref mut heading_text, _)) = current_heading {
                        heading_text.push_str(&code);
                    }
                    html.push_str(&format!("<code>{}</code>", html_escape(&code)));
                }

                Event::Start(Tag::Image {
                    dest_url, title, ..
                }) => {
                    image = Some((dest_url.to_string(), title.to_string(), String::new()));
                }

                Event::End(TagEnd::Image) => {
                    if let Some((src, title, alt)) = image.take() {
                        let title_attr = if title.is_empty() {
                            String::new()
                        } else {
                            format!(" title=\"{}\"", html_escape(&title))
                        };
                        html.push_str(&format!(
                            "<img src=\"{}\" alt=\"{}\"{title_attr} />",
                            html_escape(&src),
                            html_escape(&alt)
                        ));
                    }
                }

                Event::Start(Tag::TableHead) => {
                    in_table_head = true;
                    html.push_str("<thead><tr>");
                }

                Event::End(TagEnd::TableHead) => {
                    in_table_head = false;
                    html.push_str("</tr></thead>\n<tbody>\n");
                }

                Event::Start(Tag::TableCell) => {
                    html.push_str(if in_table_head { "<th>" } else { "<td>" });
                }

                Event::End(TagEnd::TableCell) => {
                    html.push_str(if in_table_head { "</th>" } else { "</td>" });
                }

                Event::SoftBreak => {
                    html.push('\n');
                }

                Event::HardBreak => {
                    html.push_str("<br />\n");
                }

                Event::Start(tag) => {
                    html.push_str(&tag_to_html_start(&tag));
                }

                Event::End(tag) => {
                    html.push_str(&tag_to_html_end(&tag));
                }

                Event::Html(raw) | Event::InlineHtml(raw) => {
                    html.push_str(&raw);
                }

                Event::FootnoteReference(name) => {
                    let name = html_escape(&name);
                    html.push_str(&format!(
                        "<sup class=\"footnote-ref\"><a href=\"#fn-{name}\">[{name}]</a></sup>"
                    ));
                }

                Event::Rule => {
                    html.push_str("<hr />\n");
                }

                Event::TaskListMarker(checked) => {
                    let checkbox = if checked {
                        "<input type=\"checkbox\" checked disabled /> "
                    } else {
                        "<input type=\"checkbox\" disabled /> "
                    };
                    html.push_str(checkbox);
                }

                Event::InlineMath(math) => {
                    html.push_str(&format!(
                        "<span class=\"math inline\">\\({}\\)</span>",
                        html_escape(&math)
                    ));
                }

                Event::DisplayMath(math) => {
                    html.push_str(&format!(
                        "<div class=\"math display\">\\[{}\\]</div>",
                        html_escape(&math)
                    ));
                }
            }
        }

        Rendered { html, headings }
    }
}

/// Drop top-level `import`/`export` statements from an MDX body.
///
/// A statement runs on until its brackets balance. Lines inside fenced code
/// blocks are kept.
pub fn strip_mdx_esm(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut fence: Option<&str> = None;
    // Open brackets of the statement being dropped
    let mut esm_depth: Option<i32> = None;

    for line in body.lines() {
        let trimmed = line.trim_start();

        if let Some(depth) = esm_depth {
            let depth = depth + bracket_balance(line);
            esm_depth = (depth > 0).then_some(depth);
            continue;
        }

        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
        } else if trimmed.starts_with("```") {
            fence = Some("```");
        } else if trimmed.starts_with("~~~") {
            fence = Some("~~~");
        } else if line.starts_with("import ") || line.starts_with("export ") {
            let depth = bracket_balance(line);
            esm_depth = (depth > 0).then_some(depth);
            continue;
        }

        out.push_str(line);
        out.push('\n');
    }

    out
}

/// Opening minus closing brackets on `line`.
fn bracket_balance(line: &str) -> i32 {
    line.chars()
        .map(|c| match c {
            '{' | '[' | '(' => 1,
            '}' | ']' | ')' => -1,
            _ => 0,
        })
        .sum()
}

/// Produces unique heading anchors, suffixing repeats with `-1`, `-2`, ...
#[derive(Debug, Default)]
pub struct HeadingSlugger {
    seen: HashMap<String, usize>,
}

impl HeadingSlugger {
    /// Slugify heading text and make it unique.
    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let base = if base.is_empty() {
            "heading".to_string()
        } else {
            base
        };
        self.claim(base)
    }

    /// Reserve an id as is, suffixing it if already taken.
    pub fn claim(&mut self, id: String) -> String {
        let mut candidate = id.clone();
        while let Some(count) = self.seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{id}-{count}");
        }
        self.seen.insert(candidate.clone(), 0);
        candidate
    }
}

/// Convert a pulldown-cmark tag to HTML opening tag.
fn tag_to_html_start(tag: &Tag) -> String {
    match tag {
        Tag::Paragraph => "<p>".to_string(),
        Tag::Heading { level, .. } => format!("<h{}>", *level as u8),
        Tag::BlockQuote(_) => "<blockquote>\n".to_string(),
        Tag::CodeBlock(_) => String::new(),
        Tag::List(Some(1)) => "<ol>\n".to_string(),
        Tag::List(Some(start)) => format!("<ol start=\"{start}\">\n"),
        Tag::List(None) => "<ul>\n".to_string(),
        Tag::Item => "<li>".to_string(),
        Tag::FootnoteDefinition(name) => {
            format!("<div class=\"footnote\" id=\"fn-{}\">", html_escape(name))
        }
        Tag::Table(_) => "<table>\n".to_string(),
        Tag::TableHead => "<thead><tr>".to_string(),
        Tag::TableRow => "<tr>".to_string(),
        Tag::TableCell => "<td>".to_string(),
        Tag::Emphasis => "<em>".to_string(),
        Tag::Strong => "<strong>".to_string(),
        Tag::Strikethrough => "<del>".to_string(),
        Tag::Link {
            dest_url, title, ..
        } => {
            let title_attr = if title.is_empty() {
                String::new()
            } else {
                format!(" title=\"{}\"", html_escape(title))
            };
            format!("<a href=\"{}\"{}>", html_escape(dest_url), title_attr)
        }
        Tag::Image { .. } => String::new(),
        Tag::HtmlBlock => String::new(),
        Tag::MetadataBlock(_) => String::new(),
        Tag::DefinitionList => "<dl>\n".to_string(),
        Tag::DefinitionListTitle => "<dt>".to_string(),
        Tag::DefinitionListDefinition => "<dd>".to_string(),
        Tag::Superscript => "<sup>".to_string(),
        Tag::Subscript => "<sub>".to_string(),
    }
}

/// Convert a pulldown-cmark tag end to HTML closing tag.
fn tag_to_html_end(tag: &TagEnd) -> String {
    match tag {
        TagEnd::Paragraph => "</p>\n".to_string(),
        TagEnd::Heading(level) => format!("</h{}>\n", *level as u8),
        TagEnd::BlockQuote(_) => "</blockquote>\n".to_string(),
        TagEnd::CodeBlock => String::new(),
        TagEnd::List(true) => "</ol>\n".to_string(),
        TagEnd::List(false) => "</ul>\n".to_string(),
        TagEnd::Item => "</li>\n".to_string(),
        TagEnd::FootnoteDefinition => "</div>\n".to_string(),
        TagEnd::Table => "</tbody>\n</table>\n".to_string(),
        TagEnd::TableHead => "</tr></thead>\n".to_string(),
        TagEnd::TableRow => "</tr>\n".to_string(),
        TagEnd::TableCell => "</td>".to_string(),
        TagEnd::Emphasis => "</em>".to_string(),
        TagEnd::Strong => "</strong>".to_string(),
        TagEnd::Strikethrough => "</del>".to_string(),
        TagEnd::Link => "</a>".to_string(),
        TagEnd::Image => String::new(),
        TagEnd::HtmlBlock => String::new(),
        TagEnd::MetadataBlock(_) => String::new(),
        TagEnd::DefinitionList => "</dl>\n".to_string(),
        TagEnd::DefinitionListTitle => "</dt>\n".to_string(),
        TagEnd::DefinitionListDefinition => "</dd>\n".to_string(),
        TagEnd::Superscript => "</sup>".to_string(),
        TagEnd::Subscript => "</sub>".to_string(),
    }
}

/// Escape HTML special characters.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Convert heading text to a URL-safe anchor.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
