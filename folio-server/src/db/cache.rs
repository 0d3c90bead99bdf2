//! Single-flight database connection cache
//!
//! Holds at most one established connection and at most one in-flight
//! connect attempt. Concurrent callers that arrive while an attempt is
//! running await that same attempt instead of opening their own.
//!
//! State transitions:
//!
//! ```text
//! empty --acquire--> pending --ok--> connected --not ready--> pending
//!                       |
//!                       +--err--> empty
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};

use crate::error::ConnectionError;

/// Default outer bound on a single physical connect attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can open a database connection and report whether a
/// previously opened one is still usable.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Handle shared between requests
    type Connection: Clone + Send + Sync + 'static;

    /// Error returned by the underlying driver
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issue one physical connect call.
    async fn connect(&self) -> Result<Self::Connection, Self::Error>;

    /// Readiness of an established connection. Must not perform I/O.
    fn is_ready(&self, connection: &Self::Connection) -> bool;
}

/// Tuning for [`ConnectionCache`]
#[derive(Debug, Clone)]
pub struct CacheOptions {
    pub connect_timeout: Duration,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

type Attempt<H> = Shared<BoxFuture<'static, Result<H, ConnectionError>>>;

struct PendingAttempt<H> {
    id: u64,
    attempt: Attempt<H>,
}

struct ConnectionState<H> {
    connection: Option<H>,
    pending: Option<PendingAttempt<H>>,
}

struct Inner<C: Connector> {
    connector: Arc<C>,
    options: CacheOptions,
    state: Mutex<ConnectionState<C::Connection>>,
    attempts: AtomicU64,
}

impl<C: Connector> Inner<C> {
    // The lock is never held across an await, so a poisoned guard still
    // protects consistent data.
    fn lock_state(&self) -> MutexGuard<'_, ConnectionState<C::Connection>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the outcome of attempt `id` and drop it from the in-flight slot.
    fn settle(&self, id: u64, result: &Result<C::Connection, ConnectionError>) {
        let mut state = self.lock_state();
        if state.pending.as_ref().is_some_and(|p| p.id == id) {
            state.pending = None;
        }
        if let Ok(connection) = result {
            state.connection = Some(connection.clone());
        }
    }
}

/// Process-wide connection cache.
///
/// Cloning is cheap and every clone shares the same state.
pub struct ConnectionCache<C: Connector> {
    inner: Arc<Inner<C>>,
}

impl<C: Connector> Clone for ConnectionCache<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Connector> ConnectionCache<C> {
    pub fn new(connector: C) -> Self {
        Self::with_options(connector, CacheOptions::default())
    }

    pub fn with_options(connector: C, options: CacheOptions) -> Self {
        Self {
            inner: Arc::new(Inner {
                connector: Arc::new(connector),
                options,
                state: Mutex::new(ConnectionState {
                    connection: None,
                    pending: None,
                }),
                attempts: AtomicU64::new(0),
            }),
        }
    }

    pub fn connector(&self) -> &C {
        &self.inner.connector
    }

    /// Return a ready connection, connecting if necessary.
    ///
    /// A cached connection is returned without I/O as long as the connector
    /// reports it ready. Otherwise the caller joins the in-flight attempt, or
    /// starts one when none is running. Failures are handed to every waiter
    /// and are not cached.
    pub async fn acquire(&self) -> Result<C::Connection, ConnectionError> {
        let attempt = {
            let mut state = self.inner.lock_state();

            if let Some(connection) = state
                .connection
                .as_ref()
                .filter(|connection| self.inner.connector.is_ready(connection))
            {
                return Ok(connection.clone());
            }

            if state.connection.take().is_some() {
                tracing::warn!("cached database connection is no longer ready, reconnecting");
            }

            let in_flight = state
                .pending
                .as_ref()
                .map(|pending| (pending.id, pending.attempt.clone()));

            match in_flight {
                Some((id, attempt)) => {
                    tracing::debug!(attempt = id, "joining in-flight connect attempt");
                    attempt
                }
                None => self.start_attempt(&mut state),
            }
        };

        attempt.await
    }

    /// Whether a cached connection exists and currently reports ready.
    pub fn is_ready(&self) -> bool {
        let state = self.inner.lock_state();
        state
            .connection
            .as_ref()
            .is_some_and(|connection| self.inner.connector.is_ready(connection))
    }

    /// Number of physical connect calls issued so far.
    pub fn attempts(&self) -> u64 {
        self.inner.attempts.load(Ordering::Relaxed)
    }

    fn start_attempt(&self, state: &mut ConnectionState<C::Connection>) -> Attempt<C::Connection> {
        let id = self.inner.attempts.fetch_add(1, Ordering::Relaxed) + 1;
        let connector = Arc::clone(&self.inner.connector);
        let timeout = self.inner.options.connect_timeout;
        // Weak so an attempt left unpolled in the slot does not keep the
        // cache alive.
        let cache: Weak<Inner<C>> = Arc::downgrade(&self.inner);

        tracing::debug!(attempt = id, "starting database connect attempt");

        let attempt = async move {
            let result = match tokio::time::timeout(timeout, connector.connect()).await {
                Ok(Ok(connection)) => Ok(connection),
                Ok(Err(e)) => Err(ConnectionError::connect(e)),
                Err(_) => Err(ConnectionError::Timeout { after: timeout }),
            };

            if let Err(e) = &result {
                tracing::error!(attempt = id, error = %e, "database connect attempt failed");
            }

            if let Some(inner) = cache.upgrade() {
                inner.settle(id, &result);
            }
            result
        }
        .boxed()
        .shared();

        state.pending = Some(PendingAttempt {
            id,
            attempt: attempt.clone(),
        });
        attempt
    }
}
