//! Root liveness route

use axum::{routing::get, Router};

/// GET /
async fn root() -> &'static str {
    "API is running..."
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn root_reports_running() {
        assert_eq!(root().await, "API is running...");
    }
}
