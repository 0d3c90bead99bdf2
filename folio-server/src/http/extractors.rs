//! Custom Axum extractors

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::error::ApiError;

/// The connection acquired by the connection stage for this request.
///
/// Handlers mounted behind [`require_connection`](super::middleware::require_connection)
/// take `DbConn<C::Connection>`; the type must match the connector's handle.
pub struct DbConn<H>(pub H);

impl<S, H> FromRequestParts<S> for DbConn<H>
where
    S: Send + Sync,
    H: Clone + Send + Sync + 'static,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<H>()
            .cloned()
            .map(DbConn)
            .ok_or_else(|| ApiError::Internal {
                message: "no database connection on request; connection stage not mounted".into(),
            })
    }
}
