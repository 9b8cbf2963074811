//! Filename and content classification.
//!
//! Three questions are answered here, each from its own table:
//! - which language/category a name or text belongs to (for note extensions
//!   and highlighting grammars),
//! - whether a stored file is "text-like" and gets an inline preview,
//! - which media class (image/video/audio) a file falls into.

use crate::detection::{canonical::canonicalize, detect_language};
use serde::{Deserialize, Serialize};

/// Language category and the extension used for synthetic notes in it.
///
/// The first entry for a language is its preferred note extension.
const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("text", "txt"),
    ("text", "log"),
    ("text", "csv"),
    ("python", "py"),
    ("python", "pyw"),
    ("rust", "rs"),
    ("javascript", "js"),
    ("javascript", "mjs"),
    ("javascript", "cjs"),
    ("javascript", "jsx"),
    ("typescript", "ts"),
    ("typescript", "tsx"),
    ("json", "json"),
    ("html", "html"),
    ("html", "htm"),
    ("css", "css"),
    ("css", "scss"),
    ("xml", "xml"),
    ("yaml", "yaml"),
    ("yaml", "yml"),
    ("toml", "toml"),
    ("ini", "ini"),
    ("ini", "cfg"),
    ("ini", "conf"),
    ("markdown", "md"),
    ("markdown", "markdown"),
    ("shell", "sh"),
    ("shell", "bash"),
    ("shell", "zsh"),
    ("sql", "sql"),
    ("c", "c"),
    ("c", "h"),
    ("cpp", "cpp"),
    ("cpp", "cc"),
    ("cpp", "cxx"),
    ("cpp", "hpp"),
    ("cs", "cs"),
    ("java", "java"),
    ("go", "go"),
    ("kotlin", "kt"),
    ("kotlin", "kts"),
    ("swift", "swift"),
    ("ruby", "rb"),
    ("php", "php"),
    ("lua", "lua"),
    ("perl", "pl"),
    ("perl", "pm"),
    ("powershell", "ps1"),
    ("latex", "tex"),
    ("dart", "dart"),
    ("zig", "zig"),
    ("elixir", "ex"),
    ("elixir", "exs"),
];

/// Extensions that get an inline text preview.
///
/// Deliberately a fixed list: a stored file is previewed based on its name
/// only, never on sniffed content.
const TEXT_LIKE_EXTENSIONS: &[&str] = &[
    "txt", "log", "csv", "tsv", "py", "pyw", "rs", "js", "mjs", "cjs", "jsx", "ts", "tsx",
    "json", "html", "htm", "css", "scss", "xml", "yaml", "yml", "toml", "ini", "cfg", "conf",
    "md", "markdown", "sh", "bash", "zsh", "sql", "c", "h", "cpp", "cc", "cxx", "hpp", "cs",
    "java", "go", "kt", "kts", "swift", "rb", "php", "lua", "pl", "pm", "ps1", "tex", "dart",
    "zig", "ex", "exs", "env",
];

/// Outcome of classifying a filename and/or content sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Resolved from a known filename extension.
    Extension(&'static str),
    /// Chosen explicitly by the client.
    Manual(String),
    /// Inferred from the content sample.
    Detected(String),
    /// No opinion; callers treat the content as plain text.
    Unknown,
}

impl Classification {
    /// Canonical language label, `"text"` when nothing matched.
    pub fn language(&self) -> &str {
        match self {
            Self::Extension(language) => *language,
            Self::Manual(language) | Self::Detected(language) => language.as_str(),
            Self::Unknown => "text",
        }
    }
}

/// Client-supplied language choice for pasted text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LanguageHint {
    #[default]
    Auto,
    Manual(String),
}

impl LanguageHint {
    /// Parse an optional hint; absent, blank, or `auto` selects detection.
    pub fn parse(raw: Option<&str>) -> Self {
        let canonical = raw.map(canonicalize).unwrap_or_default();
        if canonical.is_empty() || canonical == "auto" {
            Self::Auto
        } else {
            Self::Manual(canonical)
        }
    }
}

/// Broad media class derived from the guessed MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Other,
}

/// Lowercased extension of `filename`, if it has a non-empty one.
///
/// Dotfiles such as `.png` have no extension.
pub fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Language category mapped to an extension, if the extension is known.
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();
    LANGUAGE_EXTENSIONS
        .iter()
        .find(|(_, candidate)| *candidate == ext)
        .map(|(language, _)| *language)
}

/// Preferred extension for a language category; `txt` when unknown.
pub fn extension_for_language(language: &str) -> &'static str {
    let canonical = canonicalize(language);
    LANGUAGE_EXTENSIONS
        .iter()
        .find(|(candidate, _)| *candidate == canonical)
        .map(|(_, ext)| *ext)
        .unwrap_or("txt")
}

/// Classify by filename first, then by content.
///
/// A known extension is authoritative; content sniffing only runs when the
/// name says nothing. Never fails.
pub fn classify(filename: Option<&str>, sample: Option<&str>) -> Classification {
    if let Some(language) = filename
        .and_then(extension_of)
        .and_then(|ext| language_for_extension(&ext))
    {
        return Classification::Extension(language);
    }

    match sample.and_then(detect_language) {
        Some(language) => Classification::Detected(language),
        None => Classification::Unknown,
    }
}

/// Language for pasted text, honoring an explicit hint over detection.
pub fn classify_note(text: &str, hint: &LanguageHint) -> Classification {
    match hint {
        LanguageHint::Manual(language) => Classification::Manual(language.clone()),
        LanguageHint::Auto => classify(None, Some(text)),
    }
}

/// Whether a stored file is eligible for inline text preview.
pub fn is_text_like(filename: &str) -> bool {
    extension_of(filename)
        .map(|ext| TEXT_LIKE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// MIME type guessed from the extension, `application/octet-stream` otherwise.
pub fn mime_for(filename: &str) -> mime_guess::Mime {
    mime_guess::from_path(filename).first_or_octet_stream()
}

/// Media class of a filename based on its guessed MIME type.
pub fn media_kind(filename: &str) -> MediaKind {
    let mime = mime_for(filename);
    let top_level = mime.type_();
    if top_level == mime_guess::mime::IMAGE {
        MediaKind::Image
    } else if top_level == mime_guess::mime::VIDEO {
        MediaKind::Video
    } else if top_level == mime_guess::mime::AUDIO {
        MediaKind::Audio
    } else {
        MediaKind::Other
    }
}
