//! Error types for folio-server
//!
//! `ConnectionError` is cloneable: a single failed connect attempt is handed
//! to every caller that was waiting on it.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// Failure to obtain a ready database connection
#[derive(Error, Debug, Clone)]
pub enum ConnectionError {
    /// The underlying connect call failed (unreachable host, auth failure, bad URL)
    #[error("database connection failed: {source}")]
    Connect {
        #[source]
        source: Arc<dyn StdError + Send + Sync>,
    },

    /// The connect call did not settle within the configured bound
    #[error("database connection timed out after {}ms", after.as_millis())]
    Timeout { after: Duration },
}

impl ConnectionError {
    /// Wrap a connector error
    pub fn connect<E>(source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Connect {
            source: Arc::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn connect_error_display_includes_cause() {
        let err = ConnectionError::connect(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert_eq!(
            err.to_string(),
            "database connection failed: connection refused"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn timeout_error_display() {
        let err = ConnectionError::Timeout {
            after: Duration::from_millis(5000),
        };
        assert_eq!(err.to_string(), "database connection timed out after 5000ms");
    }

    #[test]
    fn clones_share_the_same_cause() {
        let err = ConnectionError::connect(io::Error::new(io::ErrorKind::Other, "boom"));
        let cloned = err.clone();
        match (&err, &cloned) {
            (ConnectionError::Connect { source: a }, ConnectionError::Connect { source: b }) => {
                assert!(Arc::ptr_eq(a, b));
            }
            _ => panic!("expected Connect variants"),
        }
    }
}
