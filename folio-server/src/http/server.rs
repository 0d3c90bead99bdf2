//! Axum server setup
//!
//! Server skeleton with:
//! - Connection stage in front of every route
//! - Credentialed CORS (mirrors the request origin unless an allow-list is set)
//! - Tracing middleware and a request timeout
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::middleware::require_connection;
use super::routes;
use crate::db::Connector;
use crate::error::ConnectionError;
use crate::state::AppState;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:5000)
    pub bind_addr: SocketAddr,

    /// Origins allowed by CORS. Empty mirrors whatever origin the request
    /// carries, with credentials allowed.
    pub cors_origins: Vec<String>,

    /// Upper bound on handling a single request
    pub request_timeout: Duration,

    /// Acquire a connection before binding the listener
    pub eager_connect: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            cors_origins: Vec::new(),
            request_timeout: Duration::from_secs(30),
            eager_connect: true,
        }
    }
}

/// Build the application router.
///
/// `auth` is nested under `/api/auth` behind the connection stage; its
/// handlers reach the connection through [`DbConn`](super::extractors::DbConn).
pub fn build_router<C: Connector>(
    state: AppState<C>,
    config: &ServerConfig,
    auth: Option<Router<AppState<C>>>,
) -> Router {
    let mut app = Router::new()
        .merge(routes::root::router())
        .merge(routes::health::router::<C>());

    if let Some(auth) = auth {
        app = app.nest("/api/auth", auth);
    }

    app.layer(middleware::from_fn_with_state(
        state.clone(),
        require_connection::<C>,
    ))
    .layer(cors_layer(&config.cors_origins))
    .layer(TimeoutLayer::new(config.request_timeout))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    if origins.is_empty() {
        return cors.allow_origin(AllowOrigin::mirror_request());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "CORS: ignoring invalid origin");
                None
            }
        })
        .collect();
    cors.allow_origin(allowed)
}

/// Run the HTTP server.
///
/// With `eager_connect` set, one connection is acquired before the listener
/// is bound and a failure aborts startup.
///
/// # Example
///
/// ```ignore
/// let cache = ConnectionCache::new(PgConnector::new(DbOptions::new(url)));
/// run_server(AppState::new(cache), ServerConfig::default(), None).await?;
/// ```
pub async fn run_server<C: Connector>(
    state: AppState<C>,
    config: ServerConfig,
    auth: Option<Router<AppState<C>>>,
) -> Result<(), ServerError> {
    if config.eager_connect {
        state.cache().acquire().await?;
        tracing::info!("Initial database connection established");
    } else {
        tracing::info!("Lazy connect: database connection deferred to first request");
    }

    let app = build_router(state, &config, auth);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server started on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("initial {0}")]
    Connection(#[from] ConnectionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
