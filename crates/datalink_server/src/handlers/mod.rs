//! HTTP request handlers.

/// Artifact metadata and language option endpoints.
pub mod artifact;
/// Raw artifact downloads.
pub mod download;
pub(crate) mod filename;
/// Upload and note creation endpoints.
pub mod upload;

use crate::error::HttpError;
use datalink_core::AppError;

/// Run filesystem-bound core work off the async executor.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, HttpError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(work).await??)
}
