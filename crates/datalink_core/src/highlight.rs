//! Syntax-highlighted HTML rendering for text previews.

use std::sync::OnceLock;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};
use thiserror::Error;

/// Theme used for rendered previews.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Failure to render a preview.
#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("theme '{0}' is not available")]
    MissingTheme(String),

    #[error("highlighting failed: {0}")]
    Render(#[from] syntect::Error),
}

/// Renders source text as HTML markup.
///
/// Implementations must escape the input; the output is embedded into pages
/// as-is.
pub trait Highlighter: Send + Sync {
    /// Render `source` for the canonical `language` label.
    ///
    /// # Errors
    /// Returns an error if the renderer cannot produce markup.
    fn render(&self, source: &str, language: &str) -> Result<String, HighlightError>;
}

/// [`Highlighter`] backed by syntect's bundled grammars and themes.
#[derive(Debug, Clone)]
pub struct SyntectHighlighter {
    theme: String,
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new(DEFAULT_THEME)
    }
}

impl SyntectHighlighter {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
        }
    }
}

impl Highlighter for SyntectHighlighter {
    fn render(&self, source: &str, language: &str) -> Result<String, HighlightError> {
        let syntaxes = syntax_set();
        let theme = theme_set()
            .themes
            .get(self.theme.as_str())
            .ok_or_else(|| HighlightError::MissingTheme(self.theme.clone()))?;
        let syntax = resolve_syntax(syntaxes, language);
        Ok(highlighted_html_for_string(source, syntaxes, syntax, theme)?)
    }
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    static THEMES: OnceLock<ThemeSet> = OnceLock::new();
    THEMES.get_or_init(ThemeSet::load_defaults)
}

fn normalized_syntax_key(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

fn try_resolve_syntax_candidate<'a>(
    ps: &'a SyntaxSet,
    candidate: &str,
) -> Option<&'a SyntaxReference> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(syntax) = ps.find_syntax_by_name(trimmed) {
        return Some(syntax);
    }
    if let Some(syntax) = ps.find_syntax_by_extension(trimmed) {
        return Some(syntax);
    }

    if let Some(syntax) = ps
        .syntaxes()
        .iter()
        .find(|syntax| syntax.name.eq_ignore_ascii_case(trimmed))
    {
        return Some(syntax);
    }

    let normalized = normalized_syntax_key(trimmed);
    if normalized.is_empty() {
        return None;
    }
    ps.syntaxes()
        .iter()
        .find(|syntax| normalized_syntax_key(syntax.name.as_str()) == normalized)
}

fn syntax_fallback_candidates(language: &str) -> &'static [&'static str] {
    match language {
        "cs" => &["C#", "cs"],
        "shell" => &["Bourne Again Shell (bash)", "bash", "sh"],
        "cpp" => &["C++", "cpp", "cc"],
        "latex" => &["LaTeX", "tex"],
        "dockerfile" => &["Dockerfile", "bash", "sh"],
        // Not shipped in the default grammar bundle.
        "typescript" => &["JavaScript", "js"],
        "toml" => &["Java Properties", "properties", "YAML", "yaml"],
        "swift" => &["Rust", "rs", "Go", "go"],
        "powershell" => &["ps1", "Bourne Again Shell (bash)", "bash"],
        "kotlin" => &["Java", "java"],
        "zig" => &["Rust", "rs", "C"],
        "scss" | "sass" => &["css"],
        _ => &[],
    }
}

/// Resolve a syntect grammar for a canonical language label.
///
/// # Returns
/// Best matching syntax definition, falling back to plain text.
pub fn resolve_syntax<'a>(ps: &'a SyntaxSet, language: &str) -> &'a SyntaxReference {
    let language = language.trim().to_ascii_lowercase();
    if language.is_empty() || matches!(language.as_str(), "text" | "txt" | "plain") {
        return ps.find_syntax_plain_text();
    }

    if let Some(syntax) = try_resolve_syntax_candidate(ps, &language) {
        return syntax;
    }

    syntax_fallback_candidates(&language)
        .iter()
        .find_map(|candidate| try_resolve_syntax_candidate(ps, candidate))
        .unwrap_or_else(|| ps.find_syntax_plain_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_common_labels_and_falls_back_to_plain_text() {
        let ps = syntax_set();
        assert_eq!(resolve_syntax(ps, "python").name, "Python");
        assert_eq!(resolve_syntax(ps, "rust").name, "Rust");
        assert_eq!(resolve_syntax(ps, "cpp").name, "C++");
        assert_eq!(resolve_syntax(ps, "text").name, "Plain Text");
        assert_eq!(resolve_syntax(ps, "").name, "Plain Text");
        assert_eq!(resolve_syntax(ps, "no-such-language").name, "Plain Text");
    }

    #[test]
    fn highlighted_output_is_escaped_markup() {
        let html = SyntectHighlighter::default()
            .render("print(\"<script>\")\n", "python")
            .expect("highlight");
        assert!(html.starts_with("<pre"), "{html}");
        assert!(html.contains("&lt;script&gt;"), "{html}");
        assert!(!html.contains("<script>"), "{html}");
    }

    #[test]
    fn unknown_theme_is_an_error() {
        let err = SyntectHighlighter::new("No Such Theme")
            .render("x = 1\n", "python")
            .unwrap_err();
        assert!(matches!(err, HighlightError::MissingTheme(_)));
    }
}
