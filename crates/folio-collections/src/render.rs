//! Entry rendering and render plugins.
//!
//! Rendering turns a content entry body into HTML plus its headings. Render
//! plugins then inspect the output and contribute extra frontmatter, such as
//! reading time or a summary, which is returned alongside the HTML.

use std::fmt;

use folio_core::{EntryData, config::MarkdownConfig};
use folio_parser::{MarkdownHeading, MarkdownParser};
use serde_yaml::Value;
use tracing::debug;

use crate::entry::ContentEntry;

/// Output of rendering one content entry.
#[derive(Debug, Clone, Default)]
pub struct RenderedEntry {
    pub html: String,
    pub headings: Vec<MarkdownHeading>,
    /// Frontmatter contributed by render plugins.
    pub remark_plugin_frontmatter: EntryData,
}

/// What a plugin sees of a rendered entry.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub entry: &'a ContentEntry,
    pub html: &'a str,
    pub headings: &'a [MarkdownHeading],
}

/// A step that adds frontmatter after an entry has been rendered.
pub trait RenderPlugin: Send + Sync {
    /// Plugin name, for logging.
    fn name(&self) -> &str;

    /// Add fields to the plugin frontmatter.
    fn apply(&self, ctx: &RenderContext<'_>, frontmatter: &mut EntryData);
}

/// Sets `words` and `minutes_read`.
#[derive(Debug, Clone, Copy)]
pub struct ReadingTime {
    pub words_per_minute: u32,
}

impl RenderPlugin for ReadingTime {
    fn name(&self) -> &str {
        "reading-time"
    }

    fn apply(&self, ctx: &RenderContext<'_>, frontmatter: &mut EntryData) {
        let words = strip_html(ctx.html).split_whitespace().count() as u64;
        let per_minute = u64::from(self.words_per_minute.max(1));
        let minutes = words.div_ceil(per_minute).max(1);

        frontmatter.insert("words", Value::from(words));
        frontmatter.insert("minutes_read", Value::from(minutes));
    }
}

/// Sets `summary` from the description, or the start of the rendered text.
#[derive(Debug, Clone, Copy)]
pub struct Summary {
    pub max_chars: usize,
}

impl RenderPlugin for Summary {
    fn name(&self) -> &str {
        "summary"
    }

    fn apply(&self, ctx: &RenderContext<'_>, frontmatter: &mut EntryData) {
        let summary = match ctx.entry.data.str("description") {
            Some(description) if !description.trim().is_empty() => description.trim().to_string(),
            _ => truncate_at_word_boundary(&strip_html(ctx.html), self.max_chars),
        };

        if !summary.is_empty() {
            frontmatter.insert("summary", Value::from(summary));
        }
    }
}

/// Renders content entries and runs plugins over the result.
pub struct Renderer {
    markdown: MarkdownParser,
    plugins: Vec<Box<dyn RenderPlugin>>,
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plugins: Vec<&str> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("Renderer")
            .field("markdown", &self.markdown)
            .field("plugins", &plugins)
            .finish()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&MarkdownConfig::default())
    }
}

impl Renderer {
    /// Renderer with the reading time and summary plugins installed.
    pub fn new(config: &MarkdownConfig) -> Self {
        Self::bare(config)
            .with_plugin(ReadingTime {
                words_per_minute: config.words_per_minute,
            })
            .with_plugin(Summary {
                max_chars: config.summary_length,
            })
    }

    /// Renderer without plugins.
    pub fn bare(config: &MarkdownConfig) -> Self {
        Self {
            markdown: MarkdownParser::with_theme(&config.syntax_theme),
            plugins: Vec::new(),
        }
    }

    /// Append a plugin. Plugins run in insertion order.
    pub fn with_plugin(mut self, plugin: impl RenderPlugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    pub fn render(&self, entry: &ContentEntry) -> RenderedEntry {
        let rendered = self.markdown.render(&entry.body, entry.content_type);

        let ctx = RenderContext {
            entry,
            html: &rendered.html,
            headings: &rendered.headings,
        };
        let mut frontmatter = EntryData::default();
        for plugin in &self.plugins {
            debug!(plugin = plugin.name(), entry = %entry.id, "applying render plugin");
            plugin.apply(&ctx, &mut frontmatter);
        }

        RenderedEntry {
            html: rendered.html,
            headings: rendered.headings,
            remark_plugin_frontmatter: frontmatter,
        }
    }
}

/// Strip HTML tags, decode common entities and collapse whitespace.
fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max_chars` characters, ending on a whole word.
fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars).collect();
    let trimmed = match cut.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => &cut[..pos],
        _ => cut.as_str(),
    };

    format!("{}…", trimmed.trim_end_matches(|c: char| c.is_ascii_punctuation()))
}
