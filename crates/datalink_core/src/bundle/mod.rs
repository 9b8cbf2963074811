//! Artifact resolution: turn one request's input into a single artifact.
//!
//! A batch of stored files becomes a single file, a gallery manifest, or a
//! zip bundle; pasted text becomes a note. Every synthetic artifact is written
//! through [`Storage::create`] and then described by a sidecar record, so the
//! presenter never has to guess the variant from a filename.

mod archive;

use crate::classify::{classify_note, extension_for_language, media_kind, LanguageHint, MediaKind};
use crate::config::Config;
use crate::error::AppError;
use crate::models::artifact::{Artifact, ArtifactInput, ArtifactRecord, StoredFile, Upload};
use crate::naming::{generate_name, ArtifactKind};
use crate::storage::Storage;
use std::io::Write;
use std::sync::Arc;

/// Builds artifacts from uploads and pasted text.
#[derive(Debug, Clone)]
pub struct BundleBuilder {
    storage: Arc<Storage>,
    config: Arc<Config>,
}

impl BundleBuilder {
    pub fn new(storage: Arc<Storage>, config: Arc<Config>) -> Self {
        Self { storage, config }
    }

    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    /// Save the accepted uploads, in order.
    ///
    /// Uploads whose extension is not allowed are dropped without an error.
    ///
    /// # Returns
    /// The stored files, possibly renamed to avoid collisions.
    ///
    /// # Errors
    /// Returns an error if a save fails; files saved before the failure stay.
    pub fn store_uploads(&self, uploads: Vec<Upload>) -> Result<Vec<StoredFile>, AppError> {
        let mut batch = Vec::with_capacity(uploads.len());
        for upload in uploads {
            if !self.config.accepts(&upload.filename) {
                tracing::debug!(filename = %upload.filename, "Dropping upload with disallowed extension");
                continue;
            }
            let stored = self.storage.save(&upload.filename, &upload.content)?;
            tracing::debug!(filename = %stored.name, bytes = stored.len, "Stored upload");
            batch.push(stored);
        }
        Ok(batch)
    }

    /// Resolve input to exactly one artifact.
    ///
    /// # Errors
    /// Returns [`AppError::NoValidInput`] for an empty batch or blank text, or
    /// a storage error if writing the artifact fails.
    pub fn resolve(&self, input: ArtifactInput) -> Result<Artifact, AppError> {
        let artifact = match input {
            ArtifactInput::Files(batch) => self.resolve_files(&batch)?,
            ArtifactInput::Text { text, hint } => self.write_note(&text, &hint)?,
        };
        tracing::info!(id = %artifact.id(), kind = artifact.kind_label(), "Resolved artifact");
        Ok(artifact)
    }

    /// Store uploads and resolve them, falling back to `text` when no file
    /// was accepted. Files win when both are present.
    ///
    /// # Errors
    /// Returns [`AppError::NoValidInput`] when nothing usable was supplied.
    pub fn create_from_uploads(
        &self,
        uploads: Vec<Upload>,
        text: Option<String>,
        hint: LanguageHint,
    ) -> Result<Artifact, AppError> {
        let batch = self.store_uploads(uploads)?;
        if !batch.is_empty() {
            return self.resolve(ArtifactInput::Files(batch));
        }
        match text {
            Some(text) => self.create_from_text(text, hint),
            None => Err(AppError::NoValidInput),
        }
    }

    /// Write pasted text as a note.
    ///
    /// # Errors
    /// Returns [`AppError::NoValidInput`] when `text` is blank.
    pub fn create_from_text(&self, text: String, hint: LanguageHint) -> Result<Artifact, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::NoValidInput);
        }
        self.resolve(ArtifactInput::Text { text, hint })
    }

    fn resolve_files(&self, batch: &[StoredFile]) -> Result<Artifact, AppError> {
        match batch {
            [] => Err(AppError::NoValidInput),
            [only] => Ok(Artifact::SingleFile {
                name: only.name.clone(),
            }),
            files if files.iter().all(|file| media_kind(&file.name) == MediaKind::Image) => {
                self.write_gallery(files)
            }
            files => self.write_bundle(files),
        }
    }

    fn write_note(&self, text: &str, hint: &LanguageHint) -> Result<Artifact, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::NoValidInput);
        }
        let classification = classify_note(text, hint);
        let language = classification.language().to_string();
        let extension = extension_for_language(&language);
        let name = generate_name(ArtifactKind::Note, extension);

        self.storage
            .create(&name, |file| Ok(file.write_all(text.as_bytes())?))?;
        self.commit(Artifact::TextNote {
            name,
            language,
            extension: extension.to_string(),
        })
    }

    fn write_gallery(&self, files: &[StoredFile]) -> Result<Artifact, AppError> {
        let manifest = generate_name(ArtifactKind::Gallery, "");
        let body = archive::manifest_body(files);
        self.storage
            .create(&manifest, |file| Ok(file.write_all(body.as_bytes())?))?;
        self.commit(Artifact::Gallery {
            manifest,
            members: member_names(files),
        })
    }

    fn write_bundle(&self, files: &[StoredFile]) -> Result<Artifact, AppError> {
        let name = generate_name(ArtifactKind::Bundle, "");
        self.storage.create(&name, |file| {
            archive::write_zip(file, &self.storage, files)?;
            Ok(())
        })?;
        self.commit(Artifact::ZipBundle {
            name,
            members: member_names(files),
        })
    }

    /// Record the artifact's variant, removing the artifact file if the record
    /// cannot be written.
    fn commit(&self, artifact: Artifact) -> Result<Artifact, AppError> {
        let record = ArtifactRecord::new(artifact);
        if let Err(err) = self.storage.write_record(&record) {
            tracing::error!(id = %record.artifact.id(), error = %err, "Failed to write artifact record");
            if let Err(cleanup) = self.storage.remove(record.artifact.id()) {
                tracing::warn!(id = %record.artifact.id(), error = %cleanup, "Failed to remove unrecorded artifact");
            }
            return Err(err);
        }
        Ok(record.artifact)
    }
}

fn member_names(files: &[StoredFile]) -> Vec<String> {
    files.iter().map(|file| file.name.clone()).collect()
}
