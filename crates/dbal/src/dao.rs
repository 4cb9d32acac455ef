//! Data access object base with failure logging and deadlock retry.
//!
//! [`DatabaseAccessObject`] is the layer application repositories build on:
//! it owns one [`Connection`], keeps a [`QueryEscaper`] derived from it, and
//! turns raw [`QueryResult`]s into verified data. Every engine failure is
//! logged exactly once at the point it is converted into a
//! [`DbalError::Query`].

use crate::connection::Connection;
use crate::driver::Driver;
use crate::error::{DbalError, DbalResult};
use crate::escape::QueryEscaper;
use crate::pool::ConnectionPool;
use crate::result::QueryResult;
use crate::row::{Row, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::error;

/// Base for repository-style data access.
#[derive(Debug)]
pub struct DatabaseAccessObject<D: Driver> {
    connection: Connection<D>,
    escaper: QueryEscaper,
    pool: Option<Arc<ConnectionPool<D>>>,
}

impl<D: Driver> DatabaseAccessObject<D> {
    /// Build a DAO around an owned connection.
    pub fn new(connection: Connection<D>) -> Self {
        let escaper = connection.query_escaper();
        Self {
            connection,
            escaper,
            pool: None,
        }
    }

    /// Build a DAO by checking a connection out of a pool. The pool handle
    /// is retained so the connection can be returned via
    /// [`DatabaseAccessObject::release`].
    pub async fn from_pool(pool: Arc<ConnectionPool<D>>) -> Self {
        let connection = pool.get().await;
        let escaper = connection.query_escaper();
        Self {
            connection,
            escaper,
            pool: Some(pool),
        }
    }

    /// Hand the connection back to the pool it came from, if any.
    pub async fn release(self) {
        if let Some(pool) = self.pool {
            pool.put(self.connection).await;
        }
    }

    pub fn connection(&mut self) -> &mut Connection<D> {
        &mut self.connection
    }

    pub fn escaper(&self) -> &QueryEscaper {
        &self.escaper
    }

    /// Replace the underlying connection. The escaper is re-derived so the
    /// pair never drifts out of dialect sync.
    pub fn swap_connection(&mut self, connection: Connection<D>) {
        self.escaper = connection.query_escaper();
        self.connection = connection;
    }

    /// Convert a failed result into an error, logging it once.
    async fn verify(&self, result: &mut QueryResult<D>) -> DbalResult<()> {
        if !result.has_failed().await {
            return Ok(());
        }

        let query = result.query().to_string();
        let message = result.error_message().await;
        error!(query = %query, error = %message, "{query}; failed with error: {message}");
        Err(DbalError::query(query, message))
    }

    /// All rows of a verified result; empty on zero rows.
    pub async fn result_array(&self, mut result: QueryResult<D>) -> DbalResult<Vec<Row>> {
        self.verify(&mut result).await?;
        Ok(result.result_array().await)
    }

    /// All rows of a verified result, keyed by the rendered cell of
    /// `index_column`. Rows sharing an index value overwrite earlier ones.
    pub async fn indexed_result_array(
        &self,
        mut result: QueryResult<D>,
        index_column: &str,
    ) -> DbalResult<BTreeMap<String, Row>> {
        self.verify(&mut result).await?;

        let mut indexed = BTreeMap::new();
        for row in result.result_array().await {
            match row.get(index_column) {
                Some(value) => {
                    indexed.insert(value.to_string(), row);
                }
                None => return Err(DbalError::UnknownColumn(index_column.to_string())),
            }
        }

        Ok(indexed)
    }

    /// The first row of a verified result; empty on zero rows.
    pub async fn result_row(&self, mut result: QueryResult<D>) -> DbalResult<Row> {
        self.verify(&mut result).await?;
        Ok(result.result_row().await)
    }

    /// One named column of a verified result; empty on zero rows.
    pub async fn result_column(
        &self,
        mut result: QueryResult<D>,
        column: &str,
    ) -> DbalResult<Vec<Value>> {
        self.verify(&mut result).await?;
        result.result_column(column).await
    }

    /// The named cell of the first row of a verified result; NULL on zero
    /// rows.
    pub async fn result_cell(
        &self,
        mut result: QueryResult<D>,
        column: &str,
    ) -> DbalResult<Value> {
        self.verify(&mut result).await?;

        if result.number_of_rows().await == 0 {
            return Ok(Value::Null);
        }
        result.result_cell(column).await
    }

    /// Whether the statement succeeded.
    pub async fn result_boolean(&self, mut result: QueryResult<D>) -> DbalResult<bool> {
        self.verify(&mut result).await?;
        Ok(true)
    }

    /// Rows affected by a verified write statement.
    pub async fn get_affected_rows(&self, mut result: QueryResult<D>) -> DbalResult<u64> {
        self.verify(&mut result).await?;
        Ok(result.affected_rows().await)
    }

    /// Re-issue a statement that failed with an engine deadlock or lock wait
    /// timeout, up to `max_retries` times.
    ///
    /// Returns the final attempt's result whether or not it succeeded;
    /// failure handling stays with the result accessor the caller feeds it
    /// to next.
    pub async fn result_retry(
        &mut self,
        mut result: QueryResult<D>,
        max_retries: usize,
    ) -> DbalResult<QueryResult<D>> {
        for _ in 0..max_retries {
            if !result.has_deadlock().await {
                break;
            }
            let query = result.query().to_string();
            result = self.connection.query(&query).await?;
        }

        Ok(result)
    }
}
