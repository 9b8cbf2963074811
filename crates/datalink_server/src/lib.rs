//! HTTP server wiring for DataLink (API, handlers, and shared state).

/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for upload, display, and download endpoints.
pub mod handlers;

pub use datalink_core::{
    config, models, AppError, Artifact, Config, Presentation, Storage, DEFAULT_PORT,
};
pub use handlers::upload::{CreateNoteRequest, CreatedResponse};

use axum::{
    extract::DefaultBodyLimit,
    http::header,
    routing::{get, post},
    Router,
};
use datalink_core::{BundleBuilder, Highlighter, Presenter, SyntectHighlighter};
use hyper::HeaderMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub storage: Arc<Storage>,
    pub builder: BundleBuilder,
    pub presenter: Presenter,
}

impl AppState {
    /// Open storage and construct shared application state.
    ///
    /// # Errors
    /// Returns an error if the storage directory cannot be created.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let storage = Storage::open(&config.storage_dir)?;
        Ok(Self::with_highlighter(
            config,
            storage,
            Arc::new(SyntectHighlighter::default()),
        ))
    }

    /// Construct shared application state around an open storage directory
    /// and a specific highlighter.
    pub fn with_highlighter(
        config: Config,
        storage: Storage,
        highlighter: Arc<dyn Highlighter>,
    ) -> Self {
        let config = Arc::new(config);
        let storage = Arc::new(storage);
        let builder = BundleBuilder::new(Arc::clone(&storage), Arc::clone(&config));
        let presenter = Presenter::new(
            Arc::clone(&storage),
            highlighter,
            config.max_preview_size,
        );
        Self {
            config,
            storage,
            builder,
            presenter,
        }
    }
}

/// Create the application router with all routes and middleware.
///
/// # Arguments
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any origin.
///
/// # Returns
/// Configured `axum::Router`.
///
/// # Panics
/// Panics if static header values fail to parse (should not happen).
pub fn create_app(state: AppState, allow_public_access: bool) -> Router {
    let cors_port = state.config.port;
    create_app_with_cors_port(state, allow_public_access, cors_port)
}

/// Resolve the listener address from a `BIND` override and security policy.
///
/// # Arguments
/// - `config`: Server configuration containing the configured `port`.
/// - `bind_override`: Raw `BIND` value, if set.
/// - `allow_public_access`: Whether non-loopback bind targets are permitted.
///
/// # Returns
/// A validated socket address that enforces loopback when public access is disabled.
pub fn resolve_bind_address(
    config: &Config,
    bind_override: Option<&str>,
    allow_public_access: bool,
) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match bind_override {
        Some(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        None => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

fn create_app_with_cors_port(state: AppState, allow_public_access: bool, cors_port: u16) -> Router {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(header::X_CONTENT_TYPE_OPTIONS, "nosniff".parse().unwrap());
    default_headers.insert(header::X_FRAME_OPTIONS, "DENY".parse().unwrap());
    default_headers.insert(
        header::CONTENT_SECURITY_POLICY,
        "default-src 'self'; script-src 'self' 'unsafe-inline'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; media-src 'self'; font-src 'self'; connect-src 'self'; frame-ancestors 'none'; base-uri 'self'; form-action 'self'"
            .parse()
            .unwrap(),
    );

    let methods = [axum::http::Method::GET, axum::http::Method::POST];
    let cors = if allow_public_access {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any)
    } else {
        CorsLayer::new()
            .allow_origin([
                format!("http://localhost:{}", cors_port).parse().unwrap(),
                format!("http://127.0.0.1:{}", cors_port).parse().unwrap(),
            ])
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
    };

    let body_limit = state.config.max_upload_size;
    Router::new()
        .route("/api/upload", post(handlers::upload::upload))
        .route("/api/note", post(handlers::upload::create_note))
        .route("/api/artifact/:id", get(handlers::artifact::get_artifact))
        .route("/api/languages", get(handlers::artifact::list_languages))
        .route("/download/:id", get(handlers::download::download))
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors)
                .layer(SetResponseHeaderLayer::overriding(
                    header::CONTENT_SECURITY_POLICY,
                    default_headers
                        .get(header::CONTENT_SECURITY_POLICY)
                        .unwrap()
                        .clone(),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    default_headers
                        .get(header::X_CONTENT_TYPE_OPTIONS)
                        .unwrap()
                        .clone(),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    default_headers
                        .get(header::X_FRAME_OPTIONS)
                        .unwrap()
                        .clone(),
                )),
        )
}

fn listener_cors_port(listener: &tokio::net::TcpListener, fallback_port: u16) -> u16 {
    listener
        .local_addr()
        .map(|addr| addr.port())
        .unwrap_or(fallback_port)
}

/// Run the Axum server with graceful shutdown support.
///
/// # Arguments
/// - `listener`: Bound TCP listener for the server.
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any origin.
/// - `shutdown_signal`: Future that resolves when shutdown should start.
///
/// # Returns
/// `Ok(())` when the server exits cleanly.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    allow_public_access: bool,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let cors_port = listener_cors_port(&listener, state.config.port);
    let app = create_app_with_cors_port(state, allow_public_access, cors_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}

#[cfg(test)]
mod tests {
    use super::listener_cors_port;
    use super::resolve_bind_address;
    use datalink_core::Config;
    use datalink_core::DEFAULT_PORT;
    use std::net::SocketAddr;

    fn config_with_port(port: u16) -> Config {
        let mut config = Config::with_storage_dir("/tmp/datalink-bind-test");
        config.port = port;
        config
    }

    #[tokio::test]
    async fn listener_cors_port_uses_bound_listener_port() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener");
        let expected = listener.local_addr().expect("listener addr").port();
        let resolved = listener_cors_port(&listener, DEFAULT_PORT);
        assert_eq!(resolved, expected);
    }

    #[test]
    fn resolve_bind_address_enforces_loopback_when_public_access_disabled() {
        let config = config_with_port(4040);
        let resolved = resolve_bind_address(&config, Some("0.0.0.0:4040"), false);
        assert_eq!(resolved.ip().to_string(), "127.0.0.1");
        assert_eq!(resolved.port(), 4040);

        let public = resolve_bind_address(&config, Some("0.0.0.0:4040"), true);
        assert_eq!(public, SocketAddr::from(([0, 0, 0, 0], 4040)));
    }

    #[test]
    fn resolve_bind_address_allows_loopback_and_invalid_fallback() {
        let config = config_with_port(4041);
        let loopback = resolve_bind_address(&config, None, false);
        assert_eq!(loopback, SocketAddr::from(([127, 0, 0, 1], 4041)));

        let fallback = resolve_bind_address(&config, Some("bad:host"), false);
        assert_eq!(fallback, SocketAddr::from(([127, 0, 0, 1], 4041)));
    }
}
