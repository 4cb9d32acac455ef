//! Engine driver seam.
//!
//! A [`Driver`] is the native binding to one database engine (one per
//! dialect). This crate never speaks a wire protocol itself; everything
//! engine-specific behind `connect`/`execute`/`escape_string` is delegated
//! to the driver supplied by the host application.

use crate::row::Row;

/// The raw outcome of one executed statement, as reported by the engine.
#[derive(Debug, Clone, Default)]
pub struct DriverOutcome {
    /// Whether the engine reported failure.
    pub failed: bool,
    /// Engine error message; empty on success.
    pub error_message: String,
    /// Engine error code; `0` on success.
    pub error_number: i32,
    /// Rows affected by a write statement.
    pub affected_rows: u64,
    /// Auto-generated id of the last inserted row, if any.
    pub insert_id: Option<u64>,
    /// Buffered result rows.
    pub rows: Vec<Row>,
}

impl DriverOutcome {
    /// A failed outcome carrying an engine error.
    pub fn failure(error_number: i32, error_message: impl Into<String>) -> Self {
        Self {
            failed: true,
            error_message: error_message.into(),
            error_number,
            ..Self::default()
        }
    }

    /// A successful outcome carrying buffered rows.
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// A successful write outcome.
    pub fn with_affected_rows(affected_rows: u64, insert_id: Option<u64>) -> Self {
        Self {
            affected_rows,
            insert_id,
            ..Self::default()
        }
    }
}

/// Native engine binding used by [`Connection`](crate::Connection).
///
/// Implementations are expected to be cheap to share (`Arc`-wrapped by the
/// connection) and to serialize statement execution per instance; this crate
/// issues operations on one driver strictly in sequence.
pub trait Driver: Send + Sync + 'static {
    /// Establish the engine link. Called lazily and possibly more than once;
    /// must be a no-op when already connected.
    fn connect(&self) -> impl std::future::Future<Output = Result<(), String>> + Send;

    /// Release the engine link. Must be a no-op when not connected.
    fn disconnect(&self) -> impl std::future::Future<Output = Result<(), String>> + Send;

    /// Escape a raw string literal using the engine's native primitive.
    ///
    /// This is the last line of defense against injection and must be
    /// multi-byte safe.
    fn escape_string(&self, value: &str) -> String;

    /// Execute one statement to completion. Engine failures are reported
    /// inside the outcome, not as an `Err`.
    fn execute(&self, sql: &str) -> impl std::future::Future<Output = DriverOutcome> + Send;
}
