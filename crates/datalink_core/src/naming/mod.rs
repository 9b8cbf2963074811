//! Collision-resistant names for synthetic artifacts.
//!
//! Names carry their kind in a fixed prefix and suffix so an operator can
//! tell bundles, notes, and galleries apart in a directory listing. There is
//! no existence check before use: the random part is a v4 UUID (122 bits
//! from the OS CSPRNG), and writes never clobber an existing file.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix of zip bundle names.
pub const BUNDLE_PREFIX: &str = "DataLink-";
/// Prefix of text note names.
pub const NOTE_PREFIX: &str = "note-";
/// Prefix of gallery manifest names.
pub const GALLERY_PREFIX: &str = "gallery-";
/// Extension of zip bundles.
pub const BUNDLE_EXTENSION: &str = "zip";
/// Extension of gallery manifests.
pub const GALLERY_EXTENSION: &str = "list";

/// Kinds of artifact the service names itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Bundle,
    Note,
    Gallery,
}

impl ArtifactKind {
    /// Fixed name prefix for this kind.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Bundle => BUNDLE_PREFIX,
            Self::Note => NOTE_PREFIX,
            Self::Gallery => GALLERY_PREFIX,
        }
    }

    /// Fixed extension, when the kind has one (notes take theirs from the
    /// classifier).
    pub fn fixed_extension(self) -> Option<&'static str> {
        match self {
            Self::Bundle => Some(BUNDLE_EXTENSION),
            Self::Note => None,
            Self::Gallery => Some(GALLERY_EXTENSION),
        }
    }

    /// Whether `name` follows this kind's naming convention.
    pub fn matches(self, name: &str) -> bool {
        let Some(rest) = name.strip_prefix(self.prefix()) else {
            return false;
        };
        let Some((token, ext)) = rest.split_once('.') else {
            return false;
        };
        let token_ok = token.len() == 32 && token.chars().all(|ch| ch.is_ascii_hexdigit());
        let ext_ok = match self.fixed_extension() {
            Some(expected) => ext == expected,
            None => !ext.is_empty() && !ext.contains('.'),
        };
        token_ok && ext_ok
    }
}

/// Generate a fresh artifact name.
///
/// # Arguments
/// - `kind`: Artifact kind, selecting the prefix.
/// - `extension`: Used for notes; bundles and galleries always use their
///   fixed extension.
///
/// # Returns
/// `<prefix><32 hex chars>.<extension>`.
pub fn generate_name(kind: ArtifactKind, extension: &str) -> String {
    let extension = kind
        .fixed_extension()
        .unwrap_or_else(|| extension.trim_start_matches('.'));
    let extension = if extension.is_empty() { "txt" } else { extension };
    format!(
        "{}{}.{}",
        kind.prefix(),
        Uuid::new_v4().simple(),
        extension
    )
}
