//! Root crate facade for the DataLink server and domain library.

pub use datalink_core::{
    bundle, classify, config, detection, highlight, models, naming, present, storage,
    AppError, Artifact, ArtifactInput, BundleBuilder, Config, Highlighter, Presentation,
    Presenter, Storage, SyntectHighlighter, Upload, DEFAULT_PORT,
};
pub use datalink_server::{
    create_app, error, handlers, resolve_bind_address, serve_router, AppState,
    CreateNoteRequest, CreatedResponse,
};
