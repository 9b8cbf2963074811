//! Upload and note creation handlers.

use super::filename::clean_filename;
use super::run_blocking;
use crate::{error::HttpError, AppState};
use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    Json,
};
use datalink_core::classify::LanguageHint;
use datalink_core::{Artifact, Upload};
use serde::{Deserialize, Serialize};

/// Response for every successful creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
    pub artifact: Artifact,
    pub display_url: String,
    pub download_url: String,
}

impl CreatedResponse {
    pub fn new(artifact: Artifact) -> Self {
        let encoded = urlencoding::encode(artifact.id()).into_owned();
        Self {
            id: artifact.id().to_string(),
            display_url: format!("/api/artifact/{}", encoded),
            download_url: format!("/download/{}", encoded),
            artifact,
        }
    }
}

/// Request body for `POST /api/note`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoteRequest {
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// Accept a multipart upload of files and/or pasted text.
///
/// Recognized parts: repeated `file`, optional `text`, optional `language`.
///
/// # Returns
/// The created artifact and its links.
///
/// # Errors
/// Returns 413 when the body exceeds the size ceiling, 400 when nothing
/// usable was supplied, and 500 on storage failures.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CreatedResponse>, HttpError> {
    let mut multipart = multipart?;
    let mut uploads = Vec::new();
    let mut text = None;
    let mut language = None;

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let Some(filename) = field.file_name().and_then(clean_filename) else {
                    continue;
                };
                let content = field.bytes().await?;
                uploads.push(Upload::new(filename, content));
            }
            "text" => text = Some(field.text().await?),
            "language" => language = Some(field.text().await?),
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    let hint = LanguageHint::parse(language.as_deref());
    let builder = state.builder.clone();
    let artifact =
        run_blocking(move || builder.create_from_uploads(uploads, text, hint)).await?;
    Ok(Json(CreatedResponse::new(artifact)))
}

/// Create a note from a JSON body.
///
/// # Errors
/// Returns 400 when the body is malformed or the text is blank, and 413 when
/// the body exceeds the size ceiling.
pub async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<Json<CreatedResponse>, HttpError> {
    let Json(req) = payload?;
    let hint = LanguageHint::parse(req.language.as_deref());
    let builder = state.builder.clone();
    let artifact = run_blocking(move || builder.create_from_text(req.text, hint)).await?;
    Ok(Json(CreatedResponse::new(artifact)))
}
