//! folio-server: portfolio API backend
//!
//! Keeps one database connection per process behind a single-flight cache so
//! that scale-to-zero instances neither race on cold start nor reuse a dead
//! connection, and serves the API behind a stage that acquires it.

pub mod db;
pub mod error;
pub mod http;
pub mod state;

pub use db::{CacheOptions, ConnectionCache, Connector, DbOptions, PgConnector};
pub use error::ConnectionError;
pub use http::{build_router, run_server, ServerConfig, ServerError};
pub use state::AppState;
