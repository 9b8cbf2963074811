//! Artifact metadata handlers.

use super::run_blocking;
use crate::{error::HttpError, AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use datalink_core::detection::canonical::{ManualLanguageOption, MANUAL_LANGUAGE_OPTIONS};
use datalink_core::Presentation;

/// Resolve display metadata for an artifact.
///
/// # Errors
/// Returns 404 when the artifact does not exist.
pub async fn get_artifact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Presentation>, HttpError> {
    let presenter = state.presenter.clone();
    run_blocking(move || presenter.present(&id)).await.map(Json)
}

/// Languages a client may pick instead of auto-detection.
pub async fn list_languages() -> Json<&'static [ManualLanguageOption]> {
    Json(MANUAL_LANGUAGE_OPTIONS)
}
