//! Live engine link with transaction control.

use crate::builder::QueryBuilder;
use crate::dialect::{Dialect, TransactionControl};
use crate::driver::Driver;
use crate::error::{DbalError, DbalResult};
use crate::escape::QueryEscaper;
use crate::result::QueryResult;
use crate::simple::SimpleQueryBuilder;
use std::sync::Arc;
use tracing::{debug, warn};

/// Owns the link to one database engine.
///
/// Constructed unconnected; every operation that touches the engine attempts
/// a single lazy reconnect and surfaces [`DbalError::Connection`] on
/// persistent failure. A connection is single-owner mutable state: share
/// work across concurrent callers with distinct connections, not by sharing
/// one.
#[derive(Debug)]
pub struct Connection<D: Driver> {
    driver: Arc<D>,
    dialect: Dialect,
    connected: bool,
}

impl<D: Driver> Connection<D> {
    /// Wrap an engine driver. No link is established yet.
    pub fn new(driver: D, dialect: Dialect) -> Self {
        Self {
            driver: Arc::new(driver),
            dialect,
            connected: false,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Establish the engine link. Reconnecting an already-connected
    /// instance is a no-op.
    pub async fn connect(&mut self) -> DbalResult<()> {
        if self.connected {
            return Ok(());
        }

        match self.driver.connect().await {
            Ok(()) => {
                self.connected = true;
                debug!(dialect = ?self.dialect, "database connection established");
                Ok(())
            }
            Err(error) => {
                warn!(dialect = ?self.dialect, error = %error, "database connection failed");
                Err(DbalError::Connection)
            }
        }
    }

    /// Release the engine link. Disconnecting an unconnected instance is a
    /// no-op.
    pub async fn disconnect(&mut self) {
        if !self.connected {
            return;
        }

        if let Err(error) = self.driver.disconnect().await {
            warn!(dialect = ?self.dialect, error = %error, "database disconnect failed");
        }
        self.connected = false;
    }

    /// Verify liveness, attempting the lazy reconnect once.
    async fn ensure_connected(&mut self) -> DbalResult<()> {
        if self.connected {
            return Ok(());
        }
        self.connect().await
    }

    /// Start a transaction.
    pub async fn begin_transaction(&mut self) -> DbalResult<bool> {
        self.transaction_control(TransactionControl::Begin).await
    }

    /// Commit the current transaction.
    pub async fn commit(&mut self) -> DbalResult<bool> {
        self.transaction_control(TransactionControl::Commit).await
    }

    /// Roll back the current transaction.
    pub async fn rollback(&mut self) -> DbalResult<bool> {
        self.transaction_control(TransactionControl::Rollback).await
    }

    /// End the current transaction.
    pub async fn end_transaction(&mut self) -> DbalResult<bool> {
        self.transaction_control(TransactionControl::End).await
    }

    async fn transaction_control(&mut self, control: TransactionControl) -> DbalResult<bool> {
        self.ensure_connected().await?;

        let statement = self.dialect.transaction_statement(control);
        let outcome = self.driver.execute(statement).await;
        Ok(!outcome.failed)
    }

    /// Escape a raw string literal using the engine's native primitive.
    ///
    /// Requires a live link; this is the last line of defense against
    /// injection for string values.
    pub async fn escape_string(&mut self, value: &str) -> DbalResult<String> {
        self.ensure_connected().await?;
        Ok(self.driver.escape_string(value))
    }

    /// Execute a statement and block until the engine replies.
    pub async fn query(&mut self, sql: &str) -> DbalResult<QueryResult<D>> {
        self.ensure_connected().await?;

        let outcome = self.driver.execute(sql).await;
        Ok(QueryResult::fetched(sql.to_string(), self.dialect, outcome))
    }

    /// Execute a statement asynchronously.
    ///
    /// Returns immediately with a pending [`QueryResult`]; the first data
    /// access (or an explicit [`QueryResult::reap`]) blocks until the
    /// deferred outcome is available.
    pub async fn async_query(&mut self, sql: &str) -> DbalResult<QueryResult<D>> {
        self.ensure_connected().await?;

        Ok(QueryResult::pending(
            sql.to_string(),
            self.dialect,
            Arc::clone(&self.driver),
        ))
    }

    /// An escaper matched to this connection's dialect.
    pub fn query_escaper(&self) -> QueryEscaper {
        QueryEscaper::new(self.dialect)
    }

    /// A query builder matched to this connection's dialect.
    pub fn query_builder(&self) -> QueryBuilder {
        QueryBuilder::new(self.dialect)
    }

    /// A matched auto-escaping builder/escaper pair.
    pub fn simple_query_builder(&self) -> SimpleQueryBuilder {
        SimpleQueryBuilder::new(self.query_builder(), self.query_escaper())
    }

    #[cfg(test)]
    pub(crate) fn driver(&self) -> &D {
        &self.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::DriverOutcome;
    use crate::driver::mock::MockDriver;
    use std::sync::atomic::Ordering;

    fn connection(driver: MockDriver) -> Connection<MockDriver> {
        Connection::new(driver, Dialect::Sqlite)
    }

    #[tokio::test]
    async fn connect_is_idempotent() {
        let mut conn = connection(MockDriver::new());
        conn.connect().await.unwrap();
        conn.connect().await.unwrap();

        assert!(conn.is_connected());
        assert_eq!(conn.driver.connect_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disconnect_unconnected_is_a_noop() {
        let mut conn = connection(MockDriver::new());
        conn.disconnect().await;
        assert!(!conn.is_connected());
    }

    #[tokio::test]
    async fn query_lazily_reconnects() {
        let mut conn = connection(MockDriver::new());
        assert!(!conn.is_connected());

        conn.query("SELECT 1").await.unwrap();
        assert!(conn.is_connected());
    }

    #[tokio::test]
    async fn operations_fail_with_fixed_message_when_unreachable() {
        let mut conn = connection(MockDriver::failing_to_connect());

        let err = conn.begin_transaction().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not establish connection to the database!"
        );

        assert!(conn.escape_string("x").await.is_err());
        assert!(conn.query("SELECT 1").await.is_err());
        assert!(conn.async_query("SELECT 1").await.is_err());
    }

    #[tokio::test]
    async fn transaction_boundaries_send_dialect_literals() {
        let mut conn = connection(MockDriver::new());

        assert!(conn.begin_transaction().await.unwrap());
        assert!(conn.commit().await.unwrap());
        assert!(conn.begin_transaction().await.unwrap());
        assert!(conn.rollback().await.unwrap());
        assert!(conn.end_transaction().await.unwrap());

        assert_eq!(
            conn.driver.executed_statements(),
            vec![
                "BEGIN TRANSACTION",
                "COMMIT TRANSACTION",
                "BEGIN TRANSACTION",
                "ROLLBACK TRANSACTION",
                "END TRANSACTION",
            ]
        );
    }

    #[tokio::test]
    async fn failed_transaction_statement_reports_false() {
        let driver = MockDriver::new();
        driver.push_outcome(DriverOutcome::failure(1, "cannot start a transaction"));
        let mut conn = connection(driver);

        assert!(!conn.begin_transaction().await.unwrap());
    }

    #[tokio::test]
    async fn escape_string_delegates_to_the_driver() {
        let mut conn = connection(MockDriver::new());
        assert_eq!(conn.escape_string("it's").await.unwrap(), "it''s");
    }

    #[tokio::test]
    async fn query_returns_a_fetched_result() {
        let driver = MockDriver::new();
        driver.push_outcome(DriverOutcome::with_affected_rows(1, Some(42)));
        let mut conn = connection(driver);

        let mut result = conn.query("INSERT INTO t VALUES (1)").await.unwrap();
        assert!(result.is_fetched());
        assert_eq!(result.insert_id().await, Some(42));
    }

    #[tokio::test]
    async fn async_query_defers_execution() {
        let driver = MockDriver::new();
        driver.push_outcome(DriverOutcome::default());
        let mut conn = connection(driver);

        let mut result = conn.async_query("SELECT 1").await.unwrap();
        assert!(!result.is_fetched());
        assert!(conn.driver.executed_statements().is_empty());

        result.reap().await;
        assert_eq!(conn.driver.executed_statements(), vec!["SELECT 1"]);
    }

    #[tokio::test]
    async fn factories_match_the_connection_dialect() {
        let conn = connection(MockDriver::new());
        assert_eq!(conn.query_escaper().dialect(), Dialect::Sqlite);
        assert_eq!(conn.query_builder().dialect(), Dialect::Sqlite);
    }
}
