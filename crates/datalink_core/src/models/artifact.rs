//! Artifact-related data models.

use crate::classify::LanguageHint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file saved in the storage directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub name: String,
    pub len: u64,
}

/// One uploaded file as handed over by the transport, name already cleaned.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// Input to artifact resolution.
#[derive(Debug, Clone)]
pub enum ArtifactInput {
    /// Files saved by one upload request, in upload order.
    Files(Vec<StoredFile>),
    /// Pasted text with an optional language choice.
    Text { text: String, hint: LanguageHint },
}

/// The single addressable thing a shareable link resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Artifact {
    /// A stored file served as-is.
    SingleFile { name: String },
    /// A file written from pasted text.
    TextNote {
        name: String,
        language: String,
        extension: String,
    },
    /// A manifest listing image members, one per line, in upload order.
    Gallery {
        manifest: String,
        members: Vec<String>,
    },
    /// A zip archive holding copies of the members at its top level.
    ZipBundle { name: String, members: Vec<String> },
}

impl Artifact {
    /// Storage filename identifying this artifact.
    pub fn id(&self) -> &str {
        match self {
            Self::SingleFile { name }
            | Self::TextNote { name, .. }
            | Self::ZipBundle { name, .. } => name.as_str(),
            Self::Gallery { manifest, .. } => manifest.as_str(),
        }
    }

    /// Short label used in API payloads and logs.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::SingleFile { .. } => "single_file",
            Self::TextNote { .. } => "text_note",
            Self::Gallery { .. } => "gallery",
            Self::ZipBundle { .. } => "zip_bundle",
        }
    }

    /// Member filenames for galleries and bundles; empty otherwise.
    pub fn members(&self) -> &[String] {
        match self {
            Self::Gallery { members, .. } | Self::ZipBundle { members, .. } => members.as_slice(),
            Self::SingleFile { .. } | Self::TextNote { .. } => &[],
        }
    }
}

/// Sidecar persisted next to an artifact to record its variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub artifact: Artifact,
    pub created_at: DateTime<Utc>,
}

impl ArtifactRecord {
    pub fn new(artifact: Artifact) -> Self {
        Self {
            artifact,
            created_at: Utc::now(),
        }
    }
}
