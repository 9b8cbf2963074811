//! Language canonicalization and the manual selection options offered to clients.

use serde::Serialize;

/// Manual language option metadata for hint selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManualLanguageOption {
    pub label: &'static str,
    pub value: &'static str,
}

macro_rules! options {
    ($(($label:expr, $value:expr)),* $(,)?) => {
        &[$(ManualLanguageOption { label: $label, value: $value }),*]
    };
}

/// Sorted language options for manual selection.
pub const MANUAL_LANGUAGE_OPTIONS: &[ManualLanguageOption] = options![
    ("C", "c"),
    ("C#", "cs"),
    ("C++", "cpp"),
    ("CSS", "css"),
    ("Dart", "dart"),
    ("Elixir", "elixir"),
    ("Go", "go"),
    ("HTML", "html"),
    ("INI", "ini"),
    ("Java", "java"),
    ("JavaScript", "javascript"),
    ("JSON", "json"),
    ("Kotlin", "kotlin"),
    ("LaTeX", "latex"),
    ("Lua", "lua"),
    ("Markdown", "markdown"),
    ("Perl", "perl"),
    ("PHP", "php"),
    ("Plain text", "text"),
    ("PowerShell", "powershell"),
    ("Python", "python"),
    ("Ruby", "ruby"),
    ("Rust", "rust"),
    ("Shell", "shell"),
    ("SQL", "sql"),
    ("Swift", "swift"),
    ("TOML", "toml"),
    ("TypeScript", "typescript"),
    ("XML", "xml"),
    ("YAML", "yaml"),
    ("Zig", "zig"),
];

/// Convert aliases/legacy names to canonical labels.
///
/// # Returns
/// Canonical, lowercase label (or empty string for empty/whitespace input).
pub fn canonicalize(language: &str) -> String {
    let lowered = language.trim().to_ascii_lowercase();
    let canonical = match lowered.as_str() {
        "csharp" | "c#" => "cs",
        "c++" | "cc" | "cxx" | "hpp" => "cpp",
        "bash" | "sh" | "zsh" => "shell",
        "pwsh" | "ps1" => "powershell",
        "yml" => "yaml",
        "jsonl" => "json",
        "js" | "jsx" | "mjs" | "node" => "javascript",
        "ts" | "tsx" => "typescript",
        "md" => "markdown",
        "plaintext" | "plain text" | "plain" | "txt" => "text",
        "py" | "python3" => "python",
        "rs" => "rust",
        "rb" => "ruby",
        "kt" => "kotlin",
        "pl" => "perl",
        "ex" | "exs" => "elixir",
        "tex" => "latex",
        "golang" => "go",
        "htm" => "html",
        _ => return lowered,
    };
    canonical.to_string()
}
