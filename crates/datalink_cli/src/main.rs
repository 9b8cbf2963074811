//! Command-line client for the DataLink API.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use datalink_core::text::normalize_optional_nonempty;
use datalink_core::DEFAULT_CLI_SERVER_URL;
use serde_json::Value;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "dlink", about = "DataLink CLI", version)]
struct Cli {
    /// Server URL (can also be set via DL_SERVER env var)
    #[arg(short, long, env = "DL_SERVER")]
    server: Option<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Print timing for API requests
    #[arg(long, global = true)]
    timing: bool,

    /// Request timeout in seconds
    #[arg(short = 't', long, default_value = "300")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Upload one or more files as a single artifact
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Store text from a file or stdin as a note
    Note {
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Language hint such as `python`, or `auto` to detect
        #[arg(short, long)]
        language: Option<String>,
    },
    /// Show display metadata for an artifact
    Show { id: String },
    /// Download an artifact's raw bytes
    Download {
        id: String,
        /// Output path, or `-` for stdout (defaults to the artifact id)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List manual language choices
    Languages,
}

fn log_timing(timing: bool, label: &str, duration: Duration) {
    if timing {
        eprintln!(
            "[timing] {}: {:.1} ms",
            label,
            duration.as_secs_f64() * 1000.0
        );
    }
}

fn error_message_for_response(status: reqwest::StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return value
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or(body)
            .to_string();
    }

    body.to_string()
}

async fn ensure_success_or_exit(res: reqwest::Response, action: &str) -> reqwest::Response {
    let status = res.status();
    if status.is_success() {
        return res;
    }

    let body = match res.text().await {
        Ok(body) => body,
        Err(err) => format!("failed to read error response body: {}", err),
    };
    let message = error_message_for_response(status, &body);
    eprintln!("{} failed ({}): {}", action, status, message);
    std::process::exit(1);
}

fn encode_pretty(value: &Value) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("response encoding error: {}", err))
}

fn format_created_output(created: &Value, server: &str, json: bool) -> Result<String, String> {
    if json {
        return encode_pretty(created);
    }

    let field = |name: &str| {
        created
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| format!("response missing '{}' field", name))
    };
    let id = field("id")?;
    let display_url = field("display_url")?;
    let download_url = field("download_url")?;
    let kind = created
        .pointer("/artifact/kind")
        .and_then(Value::as_str)
        .unwrap_or("artifact");

    Ok(format!(
        "Created {}: {}\n  display:  {}{}\n  download: {}{}",
        kind, id, server, display_url, server, download_url
    ))
}

fn format_show_output(presentation: &Value, json: bool) -> Result<String, String> {
    if json {
        return encode_pretty(presentation);
    }

    let id = presentation
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| "response missing 'id' field".to_string())?;
    let kind = presentation
        .get("kind")
        .and_then(Value::as_str)
        .unwrap_or("file");
    let size_bytes = presentation
        .get("size_bytes")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let size_mb = presentation
        .get("size_mb")
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    let mut lines = vec![
        format!("{:<10} {}", "id", id),
        format!("{:<10} {}", "kind", kind),
        format!("{:<10} {:.2} MB ({} bytes)", "size", size_mb, size_bytes),
    ];
    if let Some(mime) = presentation.get("mime").and_then(Value::as_str) {
        lines.push(format!("{:<10} {}", "mime", mime));
    }
    if let Some(language) = presentation.get("language").and_then(Value::as_str) {
        lines.push(format!("{:<10} {}", "language", language));
    }
    let members: Vec<&str> = presentation
        .get("members")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();
    if !members.is_empty() {
        lines.push("members".to_string());
        lines.extend(members.iter().map(|member| format!("  {}", member)));
    }

    Ok(lines.join("\n"))
}

fn format_languages_output(options: &Value, json: bool) -> Result<String, String> {
    if json {
        return encode_pretty(options);
    }

    let items = options
        .as_array()
        .ok_or_else(|| "response is not a list".to_string())?;
    let mut rows = Vec::with_capacity(items.len());
    for (index, option) in items.iter().enumerate() {
        let value = option.get("value").and_then(Value::as_str);
        let label = option.get("label").and_then(Value::as_str);
        let (Some(value), Some(label)) = (value, label) else {
            return Err(format!(
                "response item {} missing 'value' or 'label' field",
                index
            ));
        };
        rows.push(format!("{:<14} {}", value, label));
    }
    Ok(rows.join("\n"))
}

fn upload_part_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

fn note_body(text: String, language: Option<String>) -> Value {
    let mut body = serde_json::json!({ "text": text });
    if let Some(language) = normalize_optional_nonempty(language) {
        body["language"] = language.into();
    }
    body
}

fn download_target(id: &str, output: Option<PathBuf>) -> Option<PathBuf> {
    match output {
        Some(path) if path.as_os_str() == "-" => None,
        Some(path) => Some(path),
        None => Some(PathBuf::from(id)),
    }
}

fn api_url(server: &str, segments: &[&str]) -> Result<reqwest::Url, String> {
    let mut url = reqwest::Url::parse(server)
        .map_err(|err| format!("Invalid server URL '{}': {}", server, err))?;
    let mut path = url
        .path_segments_mut()
        .map_err(|_| "Server URL cannot be used as an API base".to_string())?;
    path.pop_if_empty();
    for segment in segments {
        path.push(segment);
    }
    drop(path);
    Ok(url)
}

fn api_url_or_exit(server: &str, action: &str, segments: &[&str]) -> reqwest::Url {
    match api_url(server, segments) {
        Ok(url) => url,
        Err(message) => {
            eprintln!("{} failed: {}", action, message);
            std::process::exit(1);
        }
    }
}

fn normalize_server(server: String) -> String {
    if let Ok(mut url) = reqwest::Url::parse(&server) {
        let should_normalize_localhost =
            url.scheme().eq_ignore_ascii_case("http") && url.host_str() == Some("localhost");
        if should_normalize_localhost && url.set_host(Some("127.0.0.1")).is_err() {
            return server;
        }
        let mut normalized = url.to_string();
        while normalized.ends_with('/') {
            normalized.pop();
        }
        return normalized;
    }
    server
}

fn resolve_server(server: Option<String>) -> String {
    normalize_optional_nonempty(server).unwrap_or_else(|| DEFAULT_CLI_SERVER_URL.to_string())
}

fn print_or_exit(action: &str, output: Result<String, String>) {
    match output {
        Ok(text) => println!("{}", text),
        Err(message) => {
            eprintln!("{} failed: {}", action, message);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        server,
        json,
        timing,
        timeout,
        command,
    } = Cli::parse();

    if let Commands::Completions { shell } = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()?;
    let server = normalize_server(resolve_server(server));

    match command {
        Commands::Completions { .. } => unreachable!("completions handled before client setup"),
        Commands::Upload { files } => {
            let endpoint = api_url_or_exit(&server, "Upload", &["api", "upload"]);
            let mut form = reqwest::multipart::Form::new();
            for path in &files {
                let content = std::fs::read(path)?;
                let part =
                    reqwest::multipart::Part::bytes(content).file_name(upload_part_name(path));
                form = form.part("file", part);
            }

            let request_start = Instant::now();
            let res = client.post(endpoint).multipart(form).send().await?;
            log_timing(timing, "upload", request_start.elapsed());
            let res = ensure_success_or_exit(res, "Upload").await;

            let created: Value = res.json().await?;
            print_or_exit("Upload", format_created_output(&created, &server, json));
        }
        Commands::Note { file, language } => {
            let endpoint = api_url_or_exit(&server, "Note", &["api", "note"]);
            let text = if let Some(path) = file {
                std::fs::read_to_string(path)?
            } else {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                buffer
            };

            let request_start = Instant::now();
            let res = client
                .post(endpoint)
                .json(&note_body(text, language))
                .send()
                .await?;
            log_timing(timing, "note", request_start.elapsed());
            let res = ensure_success_or_exit(res, "Note").await;

            let created: Value = res.json().await?;
            print_or_exit("Note", format_created_output(&created, &server, json));
        }
        Commands::Show { id } => {
            let endpoint = api_url_or_exit(&server, "Show", &["api", "artifact", &id]);
            let request_start = Instant::now();
            let res = client.get(endpoint).send().await?;
            log_timing(timing, "show", request_start.elapsed());
            let res = ensure_success_or_exit(res, "Show").await;

            let presentation: Value = res.json().await?;
            print_or_exit("Show", format_show_output(&presentation, json));
        }
        Commands::Download { id, output } => {
            let endpoint = api_url_or_exit(&server, "Download", &["download", &id]);
            let request_start = Instant::now();
            let res = client.get(endpoint).send().await?;
            let res = ensure_success_or_exit(res, "Download").await;
            let bytes = res.bytes().await?;
            log_timing(timing, "download", request_start.elapsed());

            match download_target(&id, output) {
                Some(path) => {
                    let mut file = std::fs::OpenOptions::new()
                        .write(true)
                        .create_new(true)
                        .open(&path)
                        .map_err(|err| format!("cannot create '{}': {}", path.display(), err))?;
                    file.write_all(&bytes)?;
                    if !json {
                        eprintln!("Saved {} bytes to {}", bytes.len(), path.display());
                    }
                }
                None => io::stdout().write_all(&bytes)?,
            }
        }
        Commands::Languages => {
            let endpoint = api_url_or_exit(&server, "Languages", &["api", "languages"]);
            let request_start = Instant::now();
            let res = client.get(endpoint).send().await?;
            log_timing(timing, "languages", request_start.elapsed());
            let res = ensure_success_or_exit(res, "Languages").await;

            let options: Value = res.json().await?;
            print_or_exit("Languages", format_languages_output(&options, json));
        }
    }

    Ok(())
}
