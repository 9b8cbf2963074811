//! Data models shared by the core components and the HTTP layer.

/// Stored files, upload inputs, and the artifact variants.
pub mod artifact;
/// Display-time metadata.
pub mod presentation;
