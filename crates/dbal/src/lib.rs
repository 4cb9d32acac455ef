//! # dbal
//!
//! A dialect-aware database abstraction layer for MySQL- and SQLite-family
//! engines.
//!
//! ## Features
//!
//! - **SQL explicit**: statements are assembled as text by fluent builders,
//!   never hidden behind an ORM mapping
//! - **Dialect aware**: one [`Dialect`] value drives identifier delimiting,
//!   mode keyword whitelists, transaction verbs and deadlock detection
//! - **Escaping first**: [`QueryEscaper`] covers identifiers and typed
//!   values; the engine's native string primitive stays on [`Connection`]
//! - **Deferred results**: [`QueryResult`] materializes asynchronous
//!   statements exactly once, on first access
//! - **Retry built in**: [`DatabaseAccessObject`] verifies results, logs
//!   failures once and re-issues deadlocked statements
//!
//! ## Query building
//!
//! ```ignore
//! use dbal::{Dialect, QueryBuilder};
//!
//! let mut qb = QueryBuilder::new(Dialect::MySql);
//! qb.select("col")
//!     .from("table")
//!     .where_clause("a", "=", "1")
//!     .order_by("col", true)
//!     .limit(10, None);
//!
//! assert_eq!(
//!     qb.get_select_query(),
//!     "SELECT col FROM table WHERE a = 1 ORDER BY col ASC LIMIT 10"
//! );
//! ```
//!
//! [`SimpleQueryBuilder`] layers identifier escaping on top, so raw column
//! and table names can be passed directly:
//!
//! ```ignore
//! let mut qb = connection.simple_query_builder();
//! qb.select("id, name").from("people", "p");
//! assert_eq!(qb.get_select_query(), "SELECT `id`, `name` FROM `people` AS `p`");
//! ```

pub mod builder;
pub mod connection;
pub mod dao;
pub mod dialect;
pub mod driver;
pub mod error;
pub mod escape;
pub mod pool;
pub mod result;
pub mod row;
pub mod simple;

pub use builder::QueryBuilder;
pub use connection::Connection;
pub use dao::DatabaseAccessObject;
pub use dialect::{Dialect, TransactionControl};
pub use driver::{Driver, DriverOutcome};
pub use error::{DbalError, DbalResult};
pub use escape::{QueryEscaper, ValueKind};
pub use pool::ConnectionPool;
pub use result::QueryResult;
pub use row::{Row, Value};
pub use simple::SimpleQueryBuilder;
