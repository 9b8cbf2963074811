//! Headless API server entrypoint.

use datalink_core::config::env_flag_enabled;
use datalink_core::DEFAULT_PORT;
use datalink_server::{resolve_bind_address, serve_router, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
    print_config: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            "--print-config" => flags.print_config = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "datalink=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    if cli_flags.print_config {
        print_config(&config);
        return Ok(());
    }

    let allow_public = env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept requests from any origin");
    }

    let bind_override = std::env::var("BIND").ok();
    let bind_addr = resolve_bind_address(&config, bind_override.as_deref(), allow_public);
    if !bind_addr.ip().is_loopback() {
        tracing::warn!(
            "Binding to non-localhost address: {} - ensure proper security measures are in place",
            bind_addr
        );
    }

    let state = AppState::new(config.clone())?;
    tracing::info!("Storing uploads in {}", config.storage_dir.display());

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("DataLink running at http://{}", actual_addr);

    serve_router(listener, state, allow_public, shutdown_signal()).await?;
    tracing::info!("DataLink stopped");

    Ok(())
}

fn print_help() {
    println!("DataLink Server\n");
    println!("Usage: datalink [OPTIONS]\n");
    println!("Options:");
    println!("  --print-config    Print the resolved configuration and exit");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  STORAGE_DIR       Upload directory (default: ~/.cache/datalink/uploads)");
    println!(
        "  PORT              Server port (default: {})",
        DEFAULT_PORT
    );
    println!("  MAX_UPLOAD_SIZE   Maximum request size in bytes (default: 2GiB)");
    println!("  MAX_PREVIEW_SIZE  Largest file rendered as a text preview (default: 2MiB)");
    println!("  ALLOWED_EXTENSIONS  Comma-separated upload extension allow-list");
    println!("  ALLOW_PUBLIC_ACCESS  Allow CORS from any origin");
    println!(
        "  BIND              Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

fn print_config(config: &Config) {
    println!("storage_dir        {}", config.storage_dir.display());
    println!("port               {}", config.port);
    println!("max_upload_size    {}", config.max_upload_size);
    println!("max_preview_size   {}", config.max_preview_size);
    let extensions: Vec<&str> = config.allowed_extensions.iter().map(String::as_str).collect();
    println!("allowed_extensions {}", extensions.join(","));
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
