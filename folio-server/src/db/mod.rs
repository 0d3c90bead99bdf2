//! Database layer - connection cache and Postgres connector
//!
//! # Design Principles
//!
//! - One cached handle per process, revalidated before every reuse
//! - At most one connect attempt in flight; waiters share its outcome
//! - Failed attempts are never cached

pub mod cache;
pub mod pool;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheOptions, ConnectionCache, Connector, DEFAULT_CONNECT_TIMEOUT};
pub use pool::{DbOptions, PgConnector};
