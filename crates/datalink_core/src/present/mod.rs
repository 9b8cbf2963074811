//! Display-time resolution of an artifact into presentation metadata.
//!
//! Nothing here is cached: every call re-reads storage, so the result is a
//! pure function of the stored bytes and records.


use crate::classify::{classify, is_text_like, media_kind, mime_for, MediaKind};
use crate::error::AppError;
use crate::highlight::Highlighter;
use crate::models::artifact::{Artifact, StoredFile};
use crate::models::presentation::{size_in_mb, DisplayKind, Preview, Presentation};
use crate::storage::Storage;
use std::sync::Arc;

/// Resolves artifact identifiers into [`Presentation`]s.
#[derive(Clone)]
pub struct Presenter {
    storage: Arc<Storage>,
    highlighter: Arc<dyn Highlighter>,
    max_preview_bytes: u64,
}

impl Presenter {
    pub fn new(
        storage: Arc<Storage>,
        highlighter: Arc<dyn Highlighter>,
        max_preview_bytes: u64,
    ) -> Self {
        Self {
            storage,
            highlighter,
            max_preview_bytes,
        }
    }

    /// Build presentation metadata for an artifact.
    ///
    /// # Errors
    /// Returns [`AppError::NotFound`] when `id` is invalid or nothing is
    /// stored under it. Preview failures never surface as errors.
    pub fn present(&self, id: &str) -> Result<Presentation, AppError> {
        Storage::validate_name(id)?;
        let stored = self.storage.stat(id)?.ok_or(AppError::NotFound)?;

        let artifact = match self.storage.read_record(id) {
            Ok(record) => record.map(|record| record.artifact),
            Err(err) => {
                tracing::warn!(id, error = %err, "Ignoring unreadable artifact record");
                None
            }
        };

        match artifact {
            Some(Artifact::Gallery { .. }) => self.present_gallery(&stored),
            other => Ok(self.present_file(&stored, other.as_ref())),
        }
    }

    fn present_gallery(&self, manifest: &StoredFile) -> Result<Presentation, AppError> {
        let body = self.storage.read(&manifest.name)?;
        let body = String::from_utf8_lossy(&body);

        let mut members = Vec::new();
        let mut total = 0u64;
        for line in body.lines().map(str::trim).filter(|line| !line.is_empty()) {
            match self.storage.stat(line)? {
                Some(member) => {
                    total += member.len;
                    members.push(member.name);
                }
                None => tracing::debug!(manifest = %manifest.name, member = line, "Skipping missing gallery member"),
            }
        }

        Ok(Presentation {
            id: manifest.name.clone(),
            kind: DisplayKind::Gallery,
            mime: mime_for(&manifest.name).to_string(),
            size_bytes: total,
            size_mb: size_in_mb(total),
            is_image: false,
            is_video: false,
            is_text_like: false,
            language: None,
            highlighted_html: None,
            members,
        })
    }

    fn present_file(&self, stored: &StoredFile, artifact: Option<&Artifact>) -> Presentation {
        let media = media_kind(&stored.name);
        let (kind, recorded_language) = match artifact {
            Some(Artifact::TextNote { language, .. }) => (DisplayKind::Note, Some(language.as_str())),
            Some(Artifact::ZipBundle { .. }) => (DisplayKind::Bundle, None),
            _ => (DisplayKind::File, None),
        };

        let mut presentation = Presentation {
            id: stored.name.clone(),
            kind,
            mime: mime_for(&stored.name).to_string(),
            size_bytes: stored.len,
            size_mb: size_in_mb(stored.len),
            is_image: media == MediaKind::Image,
            is_video: media == MediaKind::Video,
            is_text_like: false,
            language: None,
            highlighted_html: None,
            members: artifact.map(|a| a.members().to_vec()).unwrap_or_default(),
        };

        let preview = self.preview(stored, recorded_language);
        if let Preview::Unavailable { reason } = &preview {
            tracing::debug!(id = %stored.name, reason = %reason, "Text preview unavailable");
        }
        presentation.apply_preview(preview);
        presentation
    }

    fn preview(&self, stored: &StoredFile, recorded_language: Option<&str>) -> Preview {
        if !is_text_like(&stored.name) {
            return Preview::NotText;
        }
        if stored.len > self.max_preview_bytes {
            return Preview::Unavailable {
                reason: format!(
                    "{} bytes exceeds the {} byte preview limit",
                    stored.len, self.max_preview_bytes
                ),
            };
        }

        let bytes = match self.storage.read(&stored.name) {
            Ok(bytes) => bytes,
            Err(err) => {
                return Preview::Unavailable {
                    reason: err.to_string(),
                }
            }
        };
        let Ok(text) = String::from_utf8(bytes) else {
            return Preview::Unavailable {
                reason: "content is not valid UTF-8".to_string(),
            };
        };

        let language = match recorded_language {
            Some(language) => language.to_string(),
            None => classify(Some(&stored.name), Some(&text))
                .language()
                .to_string(),
        };

        match self.highlighter.render(&text, &language) {
            Ok(html) => Preview::Highlighted { language, html },
            Err(err) => {
                tracing::warn!(id = %stored.name, error = %err, "Highlighter failed");
                Preview::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }
}
