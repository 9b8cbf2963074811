//! Configuration loading from environment variables.

use crate::classify::extension_of;
use crate::constants::{
    DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_MAX_PREVIEW_SIZE, DEFAULT_MAX_UPLOAD_SIZE, DEFAULT_PORT,
};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Runtime configuration for DataLink.
///
/// Built once at startup and handed to each component; nothing reads the
/// environment after construction.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage_dir: PathBuf,
    pub port: u16,
    pub max_upload_size: usize,
    pub max_preview_size: u64,
    pub allowed_extensions: BTreeSet<String>,
}

/// Parse `key` from the environment, warning and falling back on bad values.
fn env_parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("Invalid {}='{}': {}. Using default {}", key, raw, err, default);
                default
            }
        },
        Err(_) => default,
    }
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

fn default_storage_dir() -> PathBuf {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache").join("datalink").join("uploads")
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

/// Parse a comma/whitespace separated extension list.
///
/// Leading dots are stripped and entries are lowercased, so `".PNG, jpg"`
/// yields `{"jpg", "png"}`.
pub fn parse_extension_list(raw: &str) -> BTreeSet<String> {
    raw.split(|ch: char| ch == ',' || ch.is_whitespace())
        .map(|entry| entry.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn default_allowed_extensions() -> BTreeSet<String> {
    DEFAULT_ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        let allowed_extensions = env::var("ALLOWED_EXTENSIONS")
            .ok()
            .map(|raw| parse_extension_list(&raw))
            .filter(|set| !set.is_empty())
            .unwrap_or_else(default_allowed_extensions);

        Self {
            storage_dir: env::var("STORAGE_DIR")
                .map(expand_tilde)
                .unwrap_or_else(|_| default_storage_dir()),
            port: env_parse_or("PORT", DEFAULT_PORT),
            max_upload_size: env_parse_or("MAX_UPLOAD_SIZE", DEFAULT_MAX_UPLOAD_SIZE),
            max_preview_size: env_parse_or("MAX_PREVIEW_SIZE", DEFAULT_MAX_PREVIEW_SIZE),
            allowed_extensions,
        }
    }

    /// Default configuration rooted at an explicit storage directory.
    pub fn with_storage_dir(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
            port: DEFAULT_PORT,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            max_preview_size: DEFAULT_MAX_PREVIEW_SIZE,
            allowed_extensions: default_allowed_extensions(),
        }
    }

    /// Whether an upload with this filename passes the extension allow-list.
    pub fn accepts(&self, filename: &str) -> bool {
        extension_of(filename)
            .map(|ext| self.allowed_extensions.contains(ext.as_str()))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::{env_parse_or, parse_env_flag, parse_extension_list, Config};
    use crate::env::{env_lock, EnvGuard};

    #[test]
    fn parse_env_flag_accepts_truthy_values() {
        for value in ["1", "true", "TRUE", " yes ", "on"] {
            assert_eq!(parse_env_flag(value), Some(true), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_accepts_falsy_values() {
        for value in ["", "0", "false", "FALSE", " no ", "off"] {
            assert_eq!(parse_env_flag(value), Some(false), "value: {}", value);
        }
    }

    #[test]
    fn parse_env_flag_rejects_unknown_values() {
        assert_eq!(parse_env_flag("maybe"), None);
        assert_eq!(parse_env_flag("enabled"), None);
    }

    #[test]
    fn parse_extension_list_normalizes_entries() {
        let parsed = parse_extension_list(" .PNG, jpg  txt,,");
        let collected: Vec<&str> = parsed.iter().map(String::as_str).collect();
        assert_eq!(collected, vec!["jpg", "png", "txt"]);
    }

    #[test]
    fn accepts_checks_extension_case_insensitively() {
        let config = Config::with_storage_dir("/tmp/datalink-config-test");
        assert!(config.accepts("photo.PNG"));
        assert!(config.accepts("script.py"));
        assert!(!config.accepts("installer.exe"));
        assert!(!config.accepts("README"));
        assert!(!config.accepts(".png"));
    }

    #[test]
    fn from_env_reads_overrides_and_falls_back_on_garbage() {
        let _lock = env_lock().lock().expect("env lock");
        let _dir = EnvGuard::set("STORAGE_DIR", "/tmp/datalink-env-test");
        let _port = EnvGuard::set("PORT", "not-a-port");
        let _size = EnvGuard::set("MAX_UPLOAD_SIZE", "4096");
        let _exts = EnvGuard::set("ALLOWED_EXTENSIONS", "png,txt");

        let config = Config::from_env();
        assert_eq!(
            config.storage_dir,
            std::path::PathBuf::from("/tmp/datalink-env-test")
        );
        assert_eq!(config.port, crate::DEFAULT_PORT);
        assert_eq!(config.max_upload_size, 4096);
        assert!(config.accepts("a.png"));
        assert!(!config.accepts("a.pdf"));
    }

    #[test]
    fn env_parse_or_falls_back_on_invalid_values() {
        let _lock = env_lock().lock().expect("env lock");
        let _bad = EnvGuard::set("DATALINK_TEST_PREVIEW", "two megabytes");
        assert_eq!(env_parse_or("DATALINK_TEST_PREVIEW", 7u64), 7);

        let _good = EnvGuard::set("DATALINK_TEST_PREVIEW", " 2048 ");
        assert_eq!(env_parse_or("DATALINK_TEST_PREVIEW", 7u64), 2048);

        let _unset = EnvGuard::remove("DATALINK_TEST_PREVIEW");
        assert_eq!(env_parse_or("DATALINK_TEST_PREVIEW", 7u64), 7);
    }

    #[test]
    fn from_env_ignores_empty_extension_override() {
        let _lock = env_lock().lock().expect("env lock");
        let _exts = EnvGuard::set("ALLOWED_EXTENSIONS", " , ");
        let config = Config::from_env();
        assert!(config.accepts("a.pdf"));
    }
}
