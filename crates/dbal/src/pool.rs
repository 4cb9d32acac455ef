//! Connection pool utilities

use crate::connection::Connection;
use crate::driver::Driver;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

type ConnectionFactory<D> = Arc<dyn Fn() -> Connection<D> + Send + Sync>;

/// A pool of reusable connections fed by a factory.
///
/// Checked-in connections are kept for reuse up to `max_idle`; when the idle
/// list is empty, [`ConnectionPool::get`] asks the factory for a fresh
/// unconnected instance. Connections are never validated on checkout — the
/// lazy reconnect inside [`Connection`] covers links that went stale while
/// idle.
///
/// # Example
///
/// ```ignore
/// let pool = ConnectionPool::new(16, move || Connection::new(make_driver(), Dialect::MySql));
/// let conn = pool.get().await;
/// // ... use conn ...
/// pool.put(conn).await;
/// ```
pub struct ConnectionPool<D: Driver> {
    factory: ConnectionFactory<D>,
    idle: Mutex<Vec<Connection<D>>>,
    max_idle: usize,
}

impl<D: Driver> ConnectionPool<D> {
    /// Create a pool that retains at most `max_idle` checked-in connections.
    pub fn new(max_idle: usize, factory: impl Fn() -> Connection<D> + Send + Sync + 'static) -> Self {
        Self {
            factory: Arc::new(factory),
            idle: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    /// Check out a connection, reusing an idle one when available.
    pub async fn get(&self) -> Connection<D> {
        if let Some(conn) = self.idle.lock().await.pop() {
            debug!("reusing idle database connection");
            return conn;
        }
        (self.factory)()
    }

    /// Return a connection for reuse. Dropped when the idle list is full.
    pub async fn put(&self, conn: Connection<D>) {
        let mut idle = self.idle.lock().await;
        if idle.len() < self.max_idle {
            idle.push(conn);
        }
    }

    /// Number of currently idle connections.
    pub async fn idle_count(&self) -> usize {
        self.idle.lock().await.len()
    }
}

impl<D: Driver> fmt::Debug for ConnectionPool<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("max_idle", &self.max_idle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::driver::mock::MockDriver;

    fn pool(max_idle: usize) -> ConnectionPool<MockDriver> {
        ConnectionPool::new(max_idle, || {
            Connection::new(MockDriver::new(), Dialect::MySql)
        })
    }

    #[tokio::test]
    async fn get_falls_back_to_the_factory() {
        let pool = pool(4);
        let conn = pool.get().await;
        assert!(!conn.is_connected());
        assert_eq!(pool.idle_count().await, 0);
    }

    #[tokio::test]
    async fn put_retains_connections_for_reuse() {
        let pool = pool(4);
        let mut conn = pool.get().await;
        conn.connect().await.unwrap();
        pool.put(conn).await;

        assert_eq!(pool.idle_count().await, 1);
        let reused = pool.get().await;
        assert!(reused.is_connected());
    }

    #[tokio::test]
    async fn put_drops_connections_beyond_max_idle() {
        let pool = pool(1);
        pool.put(pool.get().await).await;
        pool.put(pool.get().await).await;
        assert_eq!(pool.idle_count().await, 1);
    }
}
