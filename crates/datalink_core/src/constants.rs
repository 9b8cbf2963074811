//! Shared constants used across DataLink crates.

/// Default HTTP port for the DataLink server.
pub const DEFAULT_PORT: u16 = 5000;

/// Default request payload ceiling (2 GiB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 2 * 1024 * 1024 * 1024;

/// Default upper bound for files rendered as highlighted previews.
pub const DEFAULT_MAX_PREVIEW_SIZE: u64 = 2 * 1024 * 1024;

/// Default base URL for CLI/API clients.
pub const DEFAULT_CLI_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Name of the hidden directory holding artifact sidecar records.
pub const RECORD_DIR_NAME: &str = ".artifacts";

/// Extensions accepted by default when `ALLOWED_EXTENSIONS` is unset.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[
    // documents and office formats
    "txt", "pdf", "doc", "docx", "ppt", "pptx", "xls", "xlsx", "odt", "csv", "md", "rtf",
    // archives
    "zip", "tar", "gz", "7z",
    // images
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "svg",
    // video and audio
    "mp4", "webm", "mov", "mkv", "mp3", "wav", "ogg", "flac",
    // code and config
    "py", "rs", "js", "ts", "jsx", "tsx", "json", "html", "htm", "css", "xml", "yaml", "yml",
    "toml", "ini", "sh", "sql", "c", "h", "cpp", "hpp", "cs", "java", "go", "kt", "swift", "rb",
    "php", "lua", "pl", "ps1", "tex", "dart", "zig", "ex", "exs", "log",
];
