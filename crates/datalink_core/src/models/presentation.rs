//! Display-time metadata for an artifact.

use serde::{Deserialize, Serialize};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// What kind of page the display endpoint should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayKind {
    File,
    Note,
    Gallery,
    Bundle,
}

/// Outcome of trying to build an inline text preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// The artifact is not previewed as text.
    NotText,
    /// Highlighted markup was produced.
    Highlighted { language: String, html: String },
    /// Text-like by name, but no markup could be produced.
    Unavailable { reason: String },
}

/// Everything a download page needs to render an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub id: String,
    pub kind: DisplayKind,
    pub mime: String,
    pub size_bytes: u64,
    pub size_mb: f64,
    pub is_image: bool,
    pub is_video: bool,
    pub is_text_like: bool,
    pub language: Option<String>,
    pub highlighted_html: Option<String>,
    pub members: Vec<String>,
}

impl Presentation {
    /// Fold a preview outcome into the flat text fields.
    ///
    /// A failed preview still marks the artifact text-like so the page offers
    /// the raw download instead of an error.
    pub fn apply_preview(&mut self, preview: Preview) {
        match preview {
            Preview::NotText => {}
            Preview::Highlighted { language, html } => {
                self.is_text_like = true;
                self.language = Some(language);
                self.highlighted_html = Some(html);
            }
            Preview::Unavailable { .. } => {
                self.is_text_like = true;
                self.highlighted_html = None;
            }
        }
    }
}

/// Size in binary megabytes, rounded to two decimals.
pub fn size_in_mb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_MB * 100.0).round() / 100.0
}
