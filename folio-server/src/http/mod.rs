//! HTTP server layer
//!
//! Axum server with:
//! - Connection stage (middleware) ahead of every route
//! - CORS with credentials
//! - Request tracing and timeout
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use extractors::DbConn;
pub use server::{build_router, run_server, ServerConfig, ServerError};
