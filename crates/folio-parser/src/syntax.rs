//! Syntax highlighting for fenced code blocks.

use syntect::{
    highlighting::ThemeSet,
    html::highlighted_html_for_string,
    parsing::{SyntaxReference, SyntaxSet},
};

/// Fence languages the default syntax set lacks, mapped to a close relative.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("mdx", "md"),
    ("astro", "html"),
    ("jsx", "js"),
    ("tsx", "js"),
    ("ts", "js"),
    ("typescript", "js"),
    ("toml", "yaml"),
    ("shell", "sh"),
    ("console", "sh"),
];

/// Syntax highlighter using syntect.
#[derive(Debug)]
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme: String,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new("base16-ocean.dark")
    }
}

impl SyntaxHighlighter {
    /// Create a new syntax highlighter with the specified theme.
    pub fn new(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme: theme.to_string(),
        }
    }

    /// Get available theme names.
    pub fn available_themes(&self) -> Vec<&str> {
        self.theme_set.themes.keys().map(|s| s.as_str()).collect()
    }

    /// Name of the theme in use.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Switch themes; unknown names are ignored and reported as `false`.
    pub fn set_theme(&mut self, theme: &str) -> bool {
        if self.theme_set.themes.contains_key(theme) {
            self.theme = theme.to_string();
            true
        } else {
            false
        }
    }

    fn find_syntax(&self, lang: &str) -> Option<&SyntaxReference> {
        let lang = lang.to_lowercase();
        self.syntax_set.find_syntax_by_token(&lang).or_else(|| {
            LANGUAGE_ALIASES
                .iter()
                .find(|(alias, _)| *alias == lang)
                .and_then(|(_, target)| self.syntax_set.find_syntax_by_token(target))
        })
    }

    /// Highlight code with the given fence language.
    ///
    /// Unknown languages are rendered as escaped plain text.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let syntax = lang.and_then(|l| self.find_syntax(l));
        let theme = self
            .theme_set
            .themes
            .get(&self.theme)
            .or_else(|| self.theme_set.themes.values().next());

        match (syntax, theme) {
            (Some(syntax), Some(theme)) => {
                highlighted_html_for_string(code, &self.syntax_set, syntax, theme)
                    .unwrap_or_else(|_| plain_block(code, lang))
            }
            _ => plain_block(code, lang),
        }
    }
}

fn plain_block(code: &str, lang: Option<&str>) -> String {
    let escaped = crate::markdown::html_escape(code).replace('\'', "&#x27;");
    let lang_class = lang
        .map(|l| format!(" class=\"language-{}\"", crate::markdown::html_escape(l)))
        .unwrap_or_default();
    format!("<pre><code{lang_class}>{escaped}</code></pre>")
}
