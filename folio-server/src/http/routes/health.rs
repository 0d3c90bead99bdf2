//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::Connector;
use crate::http::extractors::DbConn;
use crate::state::AppState;

/// Database section of the health report
#[derive(Serialize)]
pub struct DatabaseHealth {
    pub ready: bool,
    pub connect_attempts: u64,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub database: DatabaseHealth,
}

/// GET /health
async fn health<C: Connector>(
    State(state): State<AppState<C>>,
    DbConn(connection): DbConn<C::Connection>,
) -> Json<HealthResponse> {
    let cache = state.cache();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        database: DatabaseHealth {
            ready: cache.connector().is_ready(&connection),
            connect_attempts: cache.attempts(),
        },
    })
}

/// Health routes
pub fn router<C: Connector>() -> Router<AppState<C>> {
    Router::new().route("/health", get(health::<C>))
}
