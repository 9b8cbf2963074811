//! End-to-end behavior of the assembled DataLink service.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use datalink::highlight::HighlightError;
use datalink::{create_app, AppState, Config, Highlighter, Storage};
use serde_json::json;
use std::io::{Cursor, Read};
use std::sync::Arc;
use tempfile::TempDir;

struct BrokenHighlighter;

impl Highlighter for BrokenHighlighter {
    fn render(&self, _source: &str, _language: &str) -> Result<String, HighlightError> {
        Err(HighlightError::MissingTheme("missing".to_string()))
    }
}

fn test_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::with_storage_dir(temp_dir.path().join("uploads"));
    config.port = 0;
    config.max_upload_size = 10_000_000;
    config
}

fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let state = AppState::new(test_config(&temp_dir)).unwrap();
    let server = TestServer::new(create_app(state, false)).unwrap();
    (server, temp_dir)
}

fn form_with_files(files: &[(&str, Vec<u8>)]) -> MultipartForm {
    files.iter().fold(MultipartForm::new(), |form, (name, content)| {
        form.add_part("file", Part::bytes(content.clone()).file_name(*name))
    })
}

async fn create(server: &TestServer, form: MultipartForm) -> serde_json::Value {
    let response = server.post("/api/upload").multipart(form).await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.text());
    response.json()
}

async fn create_note(server: &TestServer, body: serde_json::Value) -> serde_json::Value {
    let response = server.post("/api/note").json(&body).await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.text());
    response.json()
}

#[tokio::test]
async fn upload_display_download_walkthrough() {
    let (server, _temp) = setup_test_server();

    let gallery = create(
        &server,
        form_with_files(&[("a.png", vec![1; 4]), ("b.png", vec![2; 6])]),
    )
    .await;
    assert_eq!(gallery["artifact"]["kind"], "gallery");
    assert_eq!(gallery["artifact"]["members"], json!(["a.png", "b.png"]));

    let bundle = create(
        &server,
        form_with_files(&[("a.png", vec![3; 4]), ("b.txt", b"text".to_vec())]),
    )
    .await;
    assert_eq!(bundle["artifact"]["kind"], "zip_bundle");

    let single = create(&server, form_with_files(&[("a.py", b"x = 1\n".to_vec())])).await;
    assert_eq!(single["artifact"]["kind"], "single_file");
    assert_eq!(single["id"], "a.py");

    let shown: serde_json::Value = server.get("/api/artifact/a.py").await.json();
    assert_eq!(shown["is_text_like"], true);
    assert_eq!(shown["language"], "python");
    assert!(shown["highlighted_html"].as_str().is_some());
}

#[tokio::test]
async fn gallery_size_is_sum_of_members() {
    let (server, _temp) = setup_test_server();

    for sizes in [vec![1usize, 2], vec![10, 20, 30], vec![7, 3, 5, 100]] {
        let files: Vec<(String, Vec<u8>)> = sizes
            .iter()
            .enumerate()
            .map(|(index, size)| (format!("img{}.jpg", index), vec![0u8; *size]))
            .collect();
        let borrowed: Vec<(&str, Vec<u8>)> = files
            .iter()
            .map(|(name, content)| (name.as_str(), content.clone()))
            .collect();

        let created = create(&server, form_with_files(&borrowed)).await;
        let id = created["id"].as_str().unwrap().to_string();
        let shown: serde_json::Value = server.get(&format!("/api/artifact/{}", id)).await.json();
        assert_eq!(
            shown["size_bytes"].as_u64().unwrap(),
            sizes.iter().sum::<usize>() as u64
        );
        assert_eq!(shown["members"].as_array().unwrap().len(), sizes.len());
    }
}

#[tokio::test]
async fn zip_bundle_holds_exactly_the_accepted_files() {
    let (server, _temp) = setup_test_server();
    let created = create(
        &server,
        form_with_files(&[
            ("report.pdf", b"%PDF-1.4".to_vec()),
            ("tool.exe", b"MZ".to_vec()),
            ("data.csv", b"a,b\n1,2\n".to_vec()),
        ]),
    )
    .await;
    assert_eq!(created["artifact"]["kind"], "zip_bundle");
    assert_eq!(created["artifact"]["members"], json!(["report.pdf", "data.csv"]));

    let id = created["id"].as_str().unwrap().to_string();
    let download = server.get(&format!("/download/{}", id)).await;
    let mut archive = zip::ZipArchive::new(Cursor::new(download.as_bytes().to_vec())).unwrap();
    assert_eq!(archive.len(), 2);

    for (name, expected) in [("report.pdf", &b"%PDF-1.4"[..]), ("data.csv", &b"a,b\n1,2\n"[..])] {
        let mut content = Vec::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_end(&mut content)
            .unwrap();
        assert_eq!(content, expected);
    }
}

#[tokio::test]
async fn python_hint_wins_regardless_of_content() {
    let (server, _temp) = setup_test_server();
    for text in ["fn main() {}", "<html></html>", "just some words"] {
        let created = create_note(&server, json!({ "text": text, "language": "python" })).await;
        let id = created["id"].as_str().unwrap();
        assert!(id.ends_with(".py"), "{id}");
    }
}

#[tokio::test]
async fn detected_extension_is_deterministic() {
    let (server, _temp) = setup_test_server();
    let text = "import os\n\ndef main():\n    print(os.getcwd())\n";

    let first = create_note(&server, json!({ "text": text })).await;
    let second = create_note(&server, json!({ "text": text, "language": "auto" })).await;
    let extension = |value: &serde_json::Value| {
        let id = value["id"].as_str().unwrap().to_string();
        id.rsplit_once('.').map(|(_, ext)| ext.to_string())
    };
    assert_eq!(extension(&first), extension(&second));
    assert_ne!(first["id"], second["id"]);
}

#[tokio::test]
async fn failing_highlighter_still_serves_text_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);
    let storage = Storage::open(&config.storage_dir).unwrap();
    let state = AppState::with_highlighter(config, storage, Arc::new(BrokenHighlighter));
    let server = TestServer::new(create_app(state, false)).unwrap();

    create(&server, form_with_files(&[("a.py", b"print(1)\n".to_vec())])).await;

    let response = server.get("/api/artifact/a.py").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let shown: serde_json::Value = response.json();
    assert_eq!(shown["is_text_like"], true);
    assert!(shown["highlighted_html"].is_null());

    let download = server.get("/download/a.py").await;
    assert_eq!(&download.as_bytes()[..], b"print(1)\n");
}

#[tokio::test]
async fn note_downloads_its_exact_text() {
    let (server, _temp) = setup_test_server();
    let text = "SELECT id FROM users WHERE active = 1;\n";
    let created = create_note(&server, json!({ "text": text, "language": "sql" })).await;
    assert_eq!(created["artifact"]["kind"], "text_note");
    let id = created["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("note-") && id.ends_with(".sql"), "{id}");

    let shown: serde_json::Value = server.get(&format!("/api/artifact/{}", id)).await.json();
    assert_eq!(shown["kind"], "note");
    assert_eq!(shown["language"], "sql");

    let download = server.get(&format!("/download/{}", id)).await;
    assert_eq!(download.text(), text);
}
