//! Error types for dbal

use thiserror::Error;

/// Result type alias for dbal operations
pub type DbalResult<T> = Result<T, DbalError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum DbalError {
    /// A live engine link was required but could not be established
    #[error("Could not establish connection to the database!")]
    Connection,

    /// A query was executed and the engine reported failure
    #[error("Database query error: {message}")]
    Query {
        /// The offending SQL text
        query: String,
        /// The engine error message
        message: String,
    },

    /// A result accessor was asked for a column the row set does not contain
    #[error("Unknown result column: {0}")]
    UnknownColumn(String),

    /// Pool error
    #[error("Pool error: {0}")]
    Pool(String),
}

impl DbalError {
    /// Create a query error carrying the offending SQL and engine message
    pub fn query(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Check if this is a connection error
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection)
    }

    /// Check if this is a query error
    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_error_has_fixed_message() {
        assert_eq!(
            DbalError::Connection.to_string(),
            "Could not establish connection to the database!"
        );
    }

    #[test]
    fn query_error_carries_sql_and_message() {
        let err = DbalError::query("SELECT 1", "server has gone away");
        match err {
            DbalError::Query { query, message } => {
                assert_eq!(query, "SELECT 1");
                assert_eq!(message, "server has gone away");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
