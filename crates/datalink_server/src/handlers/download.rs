//! Raw artifact download handler.

use super::run_blocking;
use crate::{error::HttpError, AppState};
use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::Response,
};
use datalink_core::AppError;
use tokio_util::io::ReaderStream;

/// Build a Content-Disposition value that survives any stored filename.
///
/// Control characters are dropped, quotes and backslashes replaced, and a
/// RFC 5987 `filename*` parameter carries non-ASCII names.
pub(crate) fn content_disposition_header(filename: &str) -> String {
    let needs_encoding = !filename.is_ascii()
        || filename
            .chars()
            .any(|ch| ch.is_control() || ch == '"' || ch == '\\');
    if !needs_encoding {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let fallback: String = filename
        .chars()
        .filter(|ch| !ch.is_control())
        .map(|ch| match ch {
            '"' | '\\' => '_',
            ch if ch.is_ascii() => ch,
            _ => '_',
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

/// Stream an artifact's bytes as an attachment.
///
/// # Errors
/// Returns 404 when the artifact does not exist.
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, HttpError> {
    let storage = state.storage.clone();
    let (file, stored) = run_blocking(move || storage.open_file(&id)).await?;

    let content_type = mime_guess::from_path(&stored.name)
        .first_or_octet_stream()
        .to_string();
    let stream = ReaderStream::new(tokio::fs::File::from_std(file));

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&stored.name),
        )
        .header(header::CONTENT_LENGTH, stored.len)
        .body(Body::from_stream(stream))
        .map_err(|err| {
            tracing::error!("Failed to build download response: {}", err);
            AppError::Internal.into()
        })
}

#[cfg(test)]
mod tests {
    use super::content_disposition_header;

    #[test]
    fn ascii_names_are_quoted_directly() {
        assert_eq!(
            content_disposition_header("my document.txt"),
            "attachment; filename=\"my document.txt\""
        );
    }

    #[test]
    fn unicode_names_get_encoded_parameter() {
        let value = content_disposition_header("日本語.txt");
        assert!(value.starts_with("attachment; filename=\"___.txt\""), "{value}");
        assert!(value.contains("filename*=UTF-8''%E6%97%A5"), "{value}");
    }

    #[test]
    fn quotes_and_control_characters_cannot_break_the_header() {
        let value = content_disposition_header("a\"b\r\nX-Evil: 1.txt");
        assert!(!value.contains('\r') && !value.contains('\n'), "{value}");
        assert!(value.starts_with("attachment; filename=\"a_bX-Evil: 1.txt\""), "{value}");
    }
}
