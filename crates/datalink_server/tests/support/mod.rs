//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use datalink_core::constants::RECORD_DIR_NAME;
use datalink_server::{create_app, AppState, Config};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub(crate) fn test_config_for_storage(storage_dir: &Path) -> Config {
    let mut config = Config::with_storage_dir(storage_dir);
    config.port = 0;
    config.max_upload_size = 10_000_000;
    config
}

pub(crate) fn test_server_for_config(config: Config) -> TestServer {
    let state = AppState::new(config).expect("open storage");
    let app = create_app(state, false);
    TestServer::new(app).expect("server")
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("temp dir");
    let storage_dir = temp_dir.path().join("uploads");
    let server = test_server_for_config(test_config_for_storage(&storage_dir));
    (server, temp_dir, storage_dir)
}

/// Entries of the storage directory other than the record directory, sorted.
#[allow(dead_code)]
pub(crate) fn stored_names(storage_dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(storage_dir)
        .expect("read storage dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .filter(|name| name != RECORD_DIR_NAME)
        .collect();
    names.sort();
    names
}
