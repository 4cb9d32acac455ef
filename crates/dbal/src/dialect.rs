//! Engine dialect descriptors.
//!
//! Every per-engine divergence point (identifier delimiters, transaction
//! verbs, deadlock codes, statement mode whitelists) lives here so that the
//! escaper, builder and connection can share one closed set of variants.

use serde::{Deserialize, Serialize};

/// Transaction boundary statements issued by a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionControl {
    Begin,
    Commit,
    Rollback,
    End,
}

/// A specific relational engine's SQL variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    /// MySQL-family engines (MySQL, MariaDB).
    MySql,
    /// SQLite-family engines.
    Sqlite,
}

impl Dialect {
    /// Left and right identifier delimiters.
    pub fn identifier_delimiters(self) -> (char, char) {
        match self {
            Dialect::MySql => ('`', '`'),
            Dialect::Sqlite => ('"', '"'),
        }
    }

    /// The literal statement sent for a transaction boundary.
    ///
    /// Verbs are sent to the engine as-is. MySQL has no `END TRANSACTION`;
    /// ending a transaction there commits it.
    pub fn transaction_statement(self, control: TransactionControl) -> &'static str {
        match self {
            Dialect::MySql => match control {
                TransactionControl::Begin => "START TRANSACTION",
                TransactionControl::Commit => "COMMIT",
                TransactionControl::Rollback => "ROLLBACK",
                TransactionControl::End => "COMMIT",
            },
            Dialect::Sqlite => match control {
                TransactionControl::Begin => "BEGIN TRANSACTION",
                TransactionControl::Commit => "COMMIT TRANSACTION",
                TransactionControl::Rollback => "ROLLBACK TRANSACTION",
                TransactionControl::End => "END TRANSACTION",
            },
        }
    }

    /// Whether the given engine error code signals a deadlock or lock wait
    /// timeout, i.e. a transient failure worth retrying.
    pub fn is_deadlock_code(self, code: i32) -> bool {
        match self {
            // ER_LOCK_DEADLOCK, ER_LOCK_WAIT_TIMEOUT
            Dialect::MySql => matches!(code, 1213 | 1205),
            // SQLITE_BUSY, SQLITE_LOCKED
            Dialect::Sqlite => matches!(code, 5 | 6),
        }
    }

    /// Recognized `SELECT` mode keywords.
    pub fn select_modes(self) -> &'static [&'static str] {
        match self {
            Dialect::MySql => &[
                "ALL",
                "DISTINCT",
                "DISTINCTROW",
                "HIGH_PRIORITY",
                "STRAIGHT_JOIN",
                "SQL_SMALL_RESULT",
                "SQL_BIG_RESULT",
                "SQL_BUFFER_RESULT",
                "SQL_CACHE",
                "SQL_NO_CACHE",
                "SQL_CALC_FOUND_ROWS",
            ],
            Dialect::Sqlite => &["ALL", "DISTINCT"],
        }
    }

    /// Recognized `UPDATE` mode keywords.
    pub fn update_modes(self) -> &'static [&'static str] {
        match self {
            Dialect::MySql => &["LOW_PRIORITY", "IGNORE"],
            Dialect::Sqlite => &["OR ROLLBACK", "OR ABORT", "OR FAIL", "OR IGNORE", "OR REPLACE"],
        }
    }

    /// Recognized `INSERT` mode keywords.
    pub fn insert_modes(self) -> &'static [&'static str] {
        match self {
            Dialect::MySql => &["LOW_PRIORITY", "DELAYED", "HIGH_PRIORITY", "IGNORE"],
            Dialect::Sqlite => &["OR ROLLBACK", "OR ABORT", "OR FAIL", "OR IGNORE", "OR REPLACE"],
        }
    }

    /// Recognized `REPLACE` mode keywords.
    pub fn replace_modes(self) -> &'static [&'static str] {
        match self {
            Dialect::MySql => &["LOW_PRIORITY", "DELAYED"],
            Dialect::Sqlite => &[],
        }
    }

    /// Recognized `DELETE` mode keywords.
    pub fn delete_modes(self) -> &'static [&'static str] {
        match self {
            Dialect::MySql => &["LOW_PRIORITY", "QUICK", "IGNORE"],
            Dialect::Sqlite => &[],
        }
    }

    /// Recognized row lock modes appended to a `SELECT`.
    pub fn lock_modes(self) -> &'static [&'static str] {
        match self {
            Dialect::MySql => &["FOR UPDATE", "LOCK IN SHARE MODE"],
            Dialect::Sqlite => &[],
        }
    }

    /// Whether write statements may carry a `RETURNING` clause.
    pub fn supports_returning(self) -> bool {
        // MariaDB 10.5+ and SQLite 3.35+.
        true
    }

    /// Whether the dialect knows `ON DUPLICATE KEY UPDATE`.
    pub fn supports_on_duplicate_key_update(self) -> bool {
        matches!(self, Dialect::MySql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mysql_delimiters_are_backticks() {
        assert_eq!(Dialect::MySql.identifier_delimiters(), ('`', '`'));
    }

    #[test]
    fn sqlite_delimiters_are_double_quotes() {
        assert_eq!(Dialect::Sqlite.identifier_delimiters(), ('"', '"'));
    }

    #[test]
    fn sqlite_transaction_verbs() {
        assert_eq!(
            Dialect::Sqlite.transaction_statement(TransactionControl::Begin),
            "BEGIN TRANSACTION"
        );
        assert_eq!(
            Dialect::Sqlite.transaction_statement(TransactionControl::Commit),
            "COMMIT TRANSACTION"
        );
        assert_eq!(
            Dialect::Sqlite.transaction_statement(TransactionControl::Rollback),
            "ROLLBACK TRANSACTION"
        );
        assert_eq!(
            Dialect::Sqlite.transaction_statement(TransactionControl::End),
            "END TRANSACTION"
        );
    }

    #[test]
    fn mysql_end_transaction_commits() {
        assert_eq!(
            Dialect::MySql.transaction_statement(TransactionControl::End),
            "COMMIT"
        );
    }

    #[test]
    fn deadlock_codes() {
        assert!(Dialect::MySql.is_deadlock_code(1213));
        assert!(Dialect::MySql.is_deadlock_code(1205));
        assert!(!Dialect::MySql.is_deadlock_code(1064));
        assert!(Dialect::Sqlite.is_deadlock_code(5));
        assert!(Dialect::Sqlite.is_deadlock_code(6));
        assert!(!Dialect::Sqlite.is_deadlock_code(1));
    }

    #[test]
    fn sqlite_has_no_lock_modes() {
        assert!(Dialect::Sqlite.lock_modes().is_empty());
    }
}
