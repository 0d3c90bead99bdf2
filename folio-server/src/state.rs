//! Application state shared across handlers

use std::sync::Arc;

use crate::db::{ConnectionCache, Connector};

/// Shared application state
pub struct AppState<C: Connector> {
    inner: Arc<AppStateInner<C>>,
}

struct AppStateInner<C: Connector> {
    cache: ConnectionCache<C>,
}

impl<C: Connector> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Connector> AppState<C> {
    pub fn new(cache: ConnectionCache<C>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cache }),
        }
    }

    pub fn cache(&self) -> &ConnectionCache<C> {
        &self.inner.cache
    }
}
