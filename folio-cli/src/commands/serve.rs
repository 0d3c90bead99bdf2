//! HTTP server command
//!
//! Runs the folio API as a long-lived process: one eager connection
//! acquisition, then bind and serve until Ctrl+C / SIGTERM.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use folio_server::{run_server, AppState, ConnectionCache, PgConnector, ServerConfig};

use crate::config::DbArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Interface to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Allowed CORS origin (repeatable). Without any, the request origin is mirrored
    #[arg(long = "cors-origin", env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    /// Skip the startup connection and connect on the first request instead
    #[arg(long, env = "LAZY_CONNECT")]
    pub lazy_connect: bool,

    #[command(flatten)]
    pub db: DbArgs,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            cors_origins: self.cors_origins.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            eager_connect: !self.lazy_connect,
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.server_config();
    let connector = PgConnector::new(args.db.db_options());
    let cache = ConnectionCache::with_options(connector, args.db.cache_options());

    tracing::info!("Starting folio server on {}", config.bind_addr);

    // Run server (blocks until shutdown)
    run_server(AppState::new(cache), config, None)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_from_args() {
        let args = ServeArgs::parse_from([
            "serve",
            "--database-url",
            "postgres://localhost/folio",
            "--port",
            "8080",
            "--cors-origin",
            "https://a.example,https://b.example",
            "--lazy-connect",
        ]);
        let config = args.server_config();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(!config.eager_connect);
    }
}
