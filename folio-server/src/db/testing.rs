//! In-memory connector for tests

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::cache::Connector;

/// Handle produced by [`FakeConnector`]; `id` is the connect call number.
#[derive(Debug, Clone)]
pub struct FakeConnection {
    pub id: u64,
    alive: Arc<AtomicBool>,
}

impl FakeConnection {
    /// Simulate the server dropping the connection.
    pub fn drop_connection(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct FakeConnector {
    calls: AtomicU64,
    failing: AtomicBool,
    delay_ms: AtomicU64,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        self.set_delay(delay);
        self
    }

    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for FakeConnector {
    type Connection = FakeConnection;
    type Error = io::Error;

    async fn connect(&self) -> Result<FakeConnection, io::Error> {
        let id = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.failing.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ));
        }

        Ok(FakeConnection {
            id,
            alive: Arc::new(AtomicBool::new(true)),
        })
    }

    fn is_ready(&self, connection: &FakeConnection) -> bool {
        connection.is_alive()
    }
}
