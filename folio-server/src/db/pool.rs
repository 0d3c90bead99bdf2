//! Postgres connector backed by a sqlx `PgPool`
//!
//! The pool is the cached handle: the cache opens it once and hands clones to
//! every request. Readiness is "pool not closed"; sqlx replaces individual
//! broken sockets inside an open pool on its own.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use super::cache::Connector;

/// Default maximum connections for the pool.
/// Kept low so many scale-to-zero instances do not exhaust the server.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How long to wait for the server before giving up.
pub const DEFAULT_SERVER_SELECTION_TIMEOUT: Duration = Duration::from_millis(5000);

/// Idle sockets are closed after this long.
pub const DEFAULT_SOCKET_IDLE_TIMEOUT: Duration = Duration::from_millis(45_000);

/// Connection settings, supplied by the process entry point
#[derive(Debug, Clone)]
pub struct DbOptions {
    pub database_url: String,
    pub server_selection_timeout: Duration,
    pub socket_idle_timeout: Duration,
    pub max_connections: u32,
}

impl DbOptions {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            server_selection_timeout: DEFAULT_SERVER_SELECTION_TIMEOUT,
            socket_idle_timeout: DEFAULT_SOCKET_IDLE_TIMEOUT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.server_selection_timeout)
            .idle_timeout(Some(self.socket_idle_timeout))
    }
}

/// Opens a `PgPool` per physical connect attempt
#[derive(Debug, Clone)]
pub struct PgConnector {
    options: DbOptions,
}

impl PgConnector {
    pub fn new(options: DbOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DbOptions {
        &self.options
    }
}

#[async_trait]
impl Connector for PgConnector {
    type Connection = PgPool;
    type Error = sqlx::Error;

    async fn connect(&self) -> Result<PgPool, sqlx::Error> {
        let connect_options = PgConnectOptions::from_str(&self.options.database_url)?;
        let host = connect_options.get_host().to_string();

        // connect_with() opens one connection up front, so an unreachable
        // server fails within server_selection_timeout.
        let pool = self
            .options
            .pool_options()
            .connect_with(connect_options)
            .await?;

        tracing::info!(host = %host, "database connected");
        Ok(pool)
    }

    fn is_ready(&self, pool: &PgPool) -> bool {
        !pool.is_closed()
    }
}
