//! Query result with deferred materialization.
//!
//! A [`QueryResult`] is either fetched (synchronous execution buffers the
//! engine outcome immediately) or pending (asynchronous execution defers it).
//! Every accessor materializes a pending result exactly once on first call;
//! the `&mut self` receivers make the single-owner discipline of a pending
//! result a compile-time property.

use crate::dialect::Dialect;
use crate::driver::{Driver, DriverOutcome};
use crate::error::{DbalError, DbalResult};
use crate::row::{Row, Value};
use std::sync::Arc;

/// The outcome of one executed statement.
#[derive(Debug)]
pub struct QueryResult<D: Driver> {
    query: String,
    dialect: Dialect,
    /// Present until the first fetch of an asynchronously issued statement.
    pending: Option<Arc<D>>,
    outcome: Option<DriverOutcome>,
}

impl<D: Driver> QueryResult<D> {
    /// A result that has already been materialized (synchronous execution).
    pub(crate) fn fetched(query: String, dialect: Dialect, outcome: DriverOutcome) -> Self {
        Self {
            query,
            dialect,
            pending: None,
            outcome: Some(outcome),
        }
    }

    /// A result whose statement has not been executed yet (asynchronous
    /// execution); the first accessor triggers it.
    pub(crate) fn pending(query: String, dialect: Dialect, driver: Arc<D>) -> Self {
        Self {
            query,
            dialect,
            pending: Some(driver),
            outcome: None,
        }
    }

    /// The original SQL text of this result. Never triggers a fetch.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Whether the deferred outcome has been materialized.
    pub fn is_fetched(&self) -> bool {
        self.outcome.is_some()
    }

    /// Block until the deferred outcome is available. Idempotent.
    pub async fn reap(&mut self) {
        self.fetch().await;
    }

    /// Materialize the outcome exactly once and return it.
    async fn fetch(&mut self) -> &DriverOutcome {
        if let Some(driver) = self.pending.take() {
            self.outcome = Some(driver.execute(&self.query).await);
        }

        // A result is constructed either fetched or pending, so the only way
        // to reach an empty outcome is a pending fetch that was never stored;
        // degrade to a failure rather than panic.
        self.outcome
            .get_or_insert_with(|| DriverOutcome::failure(0, "result was not materialized"))
    }

    /// Whether the statement failed.
    pub async fn has_failed(&mut self) -> bool {
        self.fetch().await.failed
    }

    /// Whether the failure is an engine-reported deadlock or lock wait
    /// timeout.
    pub async fn has_deadlock(&mut self) -> bool {
        let dialect = self.dialect;
        let outcome = self.fetch().await;
        outcome.failed && dialect.is_deadlock_code(outcome.error_number)
    }

    /// The engine error message; empty on success.
    pub async fn error_message(&mut self) -> String {
        self.fetch().await.error_message.clone()
    }

    /// The engine error code; `0` on success.
    pub async fn error_number(&mut self) -> i32 {
        self.fetch().await.error_number
    }

    /// Rows affected by a write statement.
    pub async fn affected_rows(&mut self) -> u64 {
        self.fetch().await.affected_rows
    }

    /// Number of rows in the buffered result set.
    pub async fn number_of_rows(&mut self) -> usize {
        self.fetch().await.rows.len()
    }

    /// Auto-generated id of the last inserted row, if any.
    pub async fn insert_id(&mut self) -> Option<u64> {
        self.fetch().await.insert_id
    }

    /// The full buffered row set.
    pub async fn result_array(&mut self) -> Vec<Row> {
        self.fetch().await.rows.clone()
    }

    /// The first row of the result set, or an empty row when there is none.
    pub async fn result_row(&mut self) -> Row {
        self.fetch().await.rows.first().cloned().unwrap_or_default()
    }

    /// All values of one named column.
    ///
    /// Fails with [`DbalError::UnknownColumn`] when a non-empty result set
    /// does not contain the column.
    pub async fn result_column(&mut self, column: &str) -> DbalResult<Vec<Value>> {
        let outcome = self.fetch().await;

        let mut values = Vec::with_capacity(outcome.rows.len());
        for row in &outcome.rows {
            match row.get(column) {
                Some(value) => values.push(value.clone()),
                None => return Err(DbalError::UnknownColumn(column.to_string())),
            }
        }

        Ok(values)
    }

    /// The named cell of the first row.
    ///
    /// Fails with [`DbalError::UnknownColumn`] when the first row does not
    /// contain the column; yields NULL when the result set is empty.
    pub async fn result_cell(&mut self, column: &str) -> DbalResult<Value> {
        let outcome = self.fetch().await;

        match outcome.rows.first() {
            None => Ok(Value::Null),
            Some(row) => row
                .get(column)
                .cloned()
                .ok_or_else(|| DbalError::UnknownColumn(column.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::MockDriver;

    fn pending_result(driver: Arc<MockDriver>, sql: &str) -> QueryResult<MockDriver> {
        QueryResult::pending(sql.to_string(), Dialect::MySql, driver)
    }

    #[tokio::test]
    async fn accessor_fetches_pending_result_exactly_once() {
        let driver = Arc::new(MockDriver::new());
        driver.push_outcome(DriverOutcome::with_affected_rows(3, None));

        let mut result = pending_result(Arc::clone(&driver), "UPDATE t SET a = 1");
        assert!(!result.is_fetched());

        assert_eq!(result.affected_rows().await, 3);
        assert!(result.is_fetched());

        // Further accessors read cached state; nothing is re-executed.
        assert!(!result.has_failed().await);
        assert_eq!(result.affected_rows().await, 3);
        assert_eq!(driver.executed_statements(), vec!["UPDATE t SET a = 1"]);
    }

    #[tokio::test]
    async fn reap_materializes_explicitly() {
        let driver = Arc::new(MockDriver::new());
        driver.push_outcome(DriverOutcome::default());

        let mut result = pending_result(Arc::clone(&driver), "SELECT 1");
        result.reap().await;

        assert!(result.is_fetched());
        assert_eq!(driver.executed_statements(), vec!["SELECT 1"]);
    }

    #[tokio::test]
    async fn synchronous_result_never_touches_the_driver() {
        let driver = Arc::new(MockDriver::new());
        let mut result = QueryResult::<MockDriver>::fetched(
            "SELECT 1".to_string(),
            Dialect::MySql,
            DriverOutcome::with_rows(vec![Row::from_pairs([("one", Value::Integer(1))])]),
        );

        assert_eq!(result.number_of_rows().await, 1);
        assert!(driver.executed_statements().is_empty());
    }

    #[tokio::test]
    async fn deadlock_detection_uses_dialect_codes() {
        let mut result = QueryResult::<MockDriver>::fetched(
            "UPDATE t SET a = 1".to_string(),
            Dialect::MySql,
            DriverOutcome::failure(1213, "Deadlock found when trying to get lock"),
        );
        assert!(result.has_failed().await);
        assert!(result.has_deadlock().await);

        let mut result = QueryResult::<MockDriver>::fetched(
            "UPDATE t SET a = 1".to_string(),
            Dialect::MySql,
            DriverOutcome::failure(1064, "syntax error"),
        );
        assert!(result.has_failed().await);
        assert!(!result.has_deadlock().await);
    }

    #[tokio::test]
    async fn result_row_is_empty_when_no_rows() {
        let mut result = QueryResult::<MockDriver>::fetched(
            "SELECT 1".to_string(),
            Dialect::MySql,
            DriverOutcome::default(),
        );
        assert!(result.result_row().await.is_empty());
    }

    #[tokio::test]
    async fn result_column_extracts_values_in_order() {
        let rows = vec![
            Row::from_pairs([("id", Value::Integer(1))]),
            Row::from_pairs([("id", Value::Integer(2))]),
        ];
        let mut result = QueryResult::<MockDriver>::fetched(
            "SELECT id FROM t".to_string(),
            Dialect::MySql,
            DriverOutcome::with_rows(rows),
        );

        let column = result.result_column("id").await.unwrap();
        assert_eq!(column, vec![Value::Integer(1), Value::Integer(2)]);
    }

    #[tokio::test]
    async fn result_column_fails_on_unknown_column() {
        let rows = vec![Row::from_pairs([("id", Value::Integer(1))])];
        let mut result = QueryResult::<MockDriver>::fetched(
            "SELECT id FROM t".to_string(),
            Dialect::MySql,
            DriverOutcome::with_rows(rows),
        );

        let err = result.result_column("name").await.unwrap_err();
        assert!(matches!(err, DbalError::UnknownColumn(column) if column == "name"));
    }

    #[tokio::test]
    async fn result_cell_validates_column_and_defaults_to_null() {
        let rows = vec![Row::from_pairs([("id", Value::Integer(7))])];
        let mut result = QueryResult::<MockDriver>::fetched(
            "SELECT id FROM t".to_string(),
            Dialect::MySql,
            DriverOutcome::with_rows(rows),
        );
        assert_eq!(result.result_cell("id").await.unwrap(), Value::Integer(7));
        assert!(result.result_cell("name").await.is_err());

        let mut empty = QueryResult::<MockDriver>::fetched(
            "SELECT id FROM t".to_string(),
            Dialect::MySql,
            DriverOutcome::default(),
        );
        assert_eq!(empty.result_cell("id").await.unwrap(), Value::Null);
    }
}
