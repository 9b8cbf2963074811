//! Core domain library for DataLink (config, storage, artifact resolution).

/// Artifact bundling: notes, galleries, and zip archives.
pub mod bundle;
/// Extension and MIME classification.
pub mod classify;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Language detection for text content.
pub mod detection;
/// Process-global environment helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Syntax highlighting renderers.
pub mod highlight;
/// Artifact and presentation models.
pub mod models;
/// Artifact naming helpers.
pub mod naming;
/// Display-time presentation resolution.
pub mod present;
/// Flat-directory file storage.
pub mod storage;
/// Text normalization helpers.
pub mod text;

pub use bundle::BundleBuilder;
pub use config::Config;
pub use constants::{DEFAULT_CLI_SERVER_URL, DEFAULT_PORT};
pub use error::AppError;
pub use highlight::{Highlighter, SyntectHighlighter};
pub use models::artifact::{Artifact, ArtifactInput, StoredFile, Upload};
pub use models::presentation::Presentation;
pub use present::Presenter;
pub use storage::Storage;
