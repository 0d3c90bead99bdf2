//! Connection stage - runs before every route handler
//!
//! Acquires a ready connection from the cache and stores it in the request
//! extensions, where [`DbConn`](super::extractors::DbConn) picks it up. If no
//! connection can be acquired the request is answered with a 500 instead of
//! reaching the handler.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::error::ApiError;
use crate::db::Connector;
use crate::state::AppState;

pub async fn require_connection<C: Connector>(
    State(state): State<AppState<C>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let connection = state.cache().acquire().await?;
    request.extensions_mut().insert(connection);
    Ok(next.run(request).await)
}
