//! Regression tests for explicit language handling on note creation.

mod support;

use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use serde_json::json;
use support::setup_test_server;

const RUST_SOURCE: &str = "fn main() {\n    let mut x = 1;\n    println!(\"{}\", x);\n}";

#[tokio::test]
async fn test_create_note_respects_explicit_language_even_when_content_differs() {
    let (server, _temp, _storage) = setup_test_server();

    let response = server
        .post("/api/note")
        .json(&json!({ "text": RUST_SOURCE, "language": "python" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let created: serde_json::Value = response.json();
    assert_eq!(created["artifact"]["kind"], "text_note");
    assert_eq!(created["artifact"]["language"], "python");
    assert_eq!(created["artifact"]["extension"], "py");
    assert!(created["id"].as_str().unwrap().ends_with(".py"));
}

#[tokio::test]
async fn test_multipart_text_uses_language_field() {
    let (server, _temp, _storage) = setup_test_server();

    let form = MultipartForm::new()
        .add_text("text", RUST_SOURCE)
        .add_text("language", "py");
    let response = server.post("/api/upload").multipart(form).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let created: serde_json::Value = response.json();
    assert_eq!(created["artifact"]["language"], "python");
}

#[tokio::test]
async fn test_auto_language_detects_from_content() {
    let (server, _temp, _storage) = setup_test_server();

    for language in [json!("auto"), json!(""), serde_json::Value::Null] {
        let response = server
            .post("/api/note")
            .json(&json!({ "text": RUST_SOURCE, "language": language }))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let created: serde_json::Value = response.json();
        assert_eq!(created["artifact"]["extension"], "rs", "hint: {language}");
    }
}
