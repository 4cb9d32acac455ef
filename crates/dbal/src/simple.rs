//! Auto-escaping convenience facade over the query builder.
//!
//! [`SimpleQueryBuilder`] pairs one [`QueryBuilder`] with one
//! [`QueryEscaper`] and accepts raw identifiers, escaping them before
//! delegation. Every method mirrors a builder method 1:1; no SQL semantics
//! are added. Values (as opposed to identifiers) are passed through
//! unchanged, so escape them with the
//! [`QueryEscaper`](crate::QueryEscaper) value helpers or
//! [`Connection::escape_string`](crate::Connection::escape_string) first.

use crate::builder::QueryBuilder;
use crate::escape::QueryEscaper;

/// A query builder that escapes identifier input on the way in.
///
/// The builder and escaper are always a matched dialect pair; construct one
/// via [`Connection::simple_query_builder`](crate::Connection::simple_query_builder)
/// or [`SimpleQueryBuilder::new`] with both halves from the same connection.
#[derive(Debug, Clone)]
pub struct SimpleQueryBuilder {
    builder: QueryBuilder,
    escaper: QueryEscaper,
}

impl SimpleQueryBuilder {
    pub fn new(builder: QueryBuilder, escaper: QueryEscaper) -> Self {
        Self { builder, escaper }
    }

    /// Escape each element of a comma-separated identifier list
    /// independently and rejoin.
    fn escape_list(&self, csv: &str, escape: impl Fn(&QueryEscaper, &str) -> String) -> String {
        csv.split(',')
            .map(|part| escape(&self.escaper, part.trim()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    // ==================== SELECT ====================

    /// Add result columns to select (comma-separated raw column names).
    pub fn select(&mut self, columns: &str) -> &mut Self {
        let columns = self.escape_list(columns, |e, c| e.result_column(c, ""));
        self.builder.select(&columns);
        self
    }

    pub fn select_mode(&mut self, mode: &str) -> &mut Self {
        self.builder.select_mode(mode);
        self
    }

    /// Select from a raw table name, with an optional alias.
    pub fn from(&mut self, table: &str, alias: &str) -> &mut Self {
        let table = self.escaper.table(table, alias);
        self.builder.from(&table);
        self
    }

    /// Join a raw table name.
    pub fn join(&mut self, table: &str, join_type: &str) -> &mut Self {
        let table = self.escaper.table(table, "");
        self.builder.join(&table, join_type);
        self
    }

    /// Add an `ON` condition between two raw column references.
    pub fn on(&mut self, left: &str, operator: &str, right: &str) -> &mut Self {
        let left = self.escaper.column(left, "");
        let right = self.escaper.column(right, "");
        self.builder.on(&left, operator, &right);
        self
    }

    /// Add a `WHERE` condition on a raw column. The right-hand side is
    /// passed through as-is (escape values beforehand).
    pub fn where_clause(&mut self, column: &str, operator: &str, value: &str) -> &mut Self {
        let column = self.escaper.column(column, "");
        self.builder.where_clause(&column, operator, value);
        self
    }

    /// Add a `HAVING` condition on a raw column.
    pub fn having(&mut self, column: &str, operator: &str, value: &str) -> &mut Self {
        let column = self.escaper.column(column, "");
        self.builder.having(&column, operator, value);
        self
    }

    pub fn and(&mut self) -> &mut Self {
        self.builder.and();
        self
    }

    pub fn or(&mut self) -> &mut Self {
        self.builder.or();
        self
    }

    /// Group by a raw column reference.
    pub fn group_by(&mut self, column: &str) -> &mut Self {
        let column = self.escaper.column(column, "");
        self.builder.group_by(&column);
        self
    }

    /// Order by a raw column reference.
    pub fn order_by(&mut self, column: &str, ascending: bool) -> &mut Self {
        let column = self.escaper.column(column, "");
        self.builder.order_by(&column, ascending);
        self
    }

    pub fn limit(&mut self, amount: u64, offset: Option<u64>) -> &mut Self {
        self.builder.limit(amount, offset);
        self
    }

    pub fn lock_mode(&mut self, mode: &str) -> &mut Self {
        self.builder.lock_mode(mode);
        self
    }

    /// Register a common table expression under a raw alias.
    pub fn with(&mut self, alias: &str, sql_query: &str) -> &mut Self {
        let alias = self.escaper.table(alias, "");
        self.builder.with(&alias, sql_query);
        self
    }

    /// Register a recursive common table expression under a raw alias.
    pub fn with_recursive(&mut self, alias: &str, sql_query: &str) -> &mut Self {
        let alias = self.escaper.table(alias, "");
        self.builder.with_recursive(&alias, sql_query);
        self
    }

    /// Append a `UNION` tail; the query is parenthesized automatically.
    pub fn union(&mut self, sql_query: &str, mode: &str) -> &mut Self {
        let query = self.escaper.query_value(sql_query);
        self.builder.union(&query, mode);
        self
    }

    /// Append an `INTERSECT` tail; the query is parenthesized automatically.
    pub fn intersect(&mut self, sql_query: &str, mode: &str) -> &mut Self {
        let query = self.escaper.query_value(sql_query);
        self.builder.intersect(&query, mode);
        self
    }

    /// Append an `EXCEPT` tail; the query is parenthesized automatically.
    pub fn except(&mut self, sql_query: &str, mode: &str) -> &mut Self {
        let query = self.escaper.query_value(sql_query);
        self.builder.except(&query, mode);
        self
    }

    pub fn get_select_query(&self) -> String {
        self.builder.get_select_query()
    }

    // ==================== INSERT / REPLACE ====================

    /// Set the raw table name to write into.
    pub fn into(&mut self, table: &str) -> &mut Self {
        let table = self.escaper.table(table, "");
        (&mut self.builder).into(&table);
        self
    }

    /// Set the column list from raw column names.
    pub fn column_names<S: AsRef<str>>(&mut self, columns: &[S]) -> &mut Self {
        let escaped: Vec<String> = columns
            .iter()
            .map(|c| self.escaper.column(c.as_ref(), ""))
            .collect();
        self.builder.column_names(&escaped);
        self
    }

    /// Append one row of pre-escaped values.
    pub fn values<S: AsRef<str>>(&mut self, values: &[S]) -> &mut Self {
        self.builder.values(values);
        self
    }

    pub fn select_statement(&mut self, sql_query: &str) -> &mut Self {
        self.builder.select_statement(sql_query);
        self
    }

    pub fn insert_mode(&mut self, mode: &str) -> &mut Self {
        self.builder.insert_mode(mode);
        self
    }

    pub fn replace_mode(&mut self, mode: &str) -> &mut Self {
        self.builder.replace_mode(mode);
        self
    }

    pub fn on_duplicate_key_update(&mut self, set: &str) -> &mut Self {
        self.builder.on_duplicate_key_update(set);
        self
    }

    /// Columns to return from a non-SELECT query (comma-separated raw
    /// column names).
    pub fn returning(&mut self, columns: &str) -> &mut Self {
        let columns = self.escape_list(columns, |e, c| e.result_column(c, ""));
        self.builder.returning(&columns);
        self
    }

    pub fn get_insert_query(&self) -> String {
        self.builder.get_insert_query()
    }

    pub fn get_replace_query(&self) -> String {
        self.builder.get_replace_query()
    }

    // ==================== UPDATE ====================

    /// Add raw table names to update (comma-separated).
    pub fn update(&mut self, tables: &str) -> &mut Self {
        let tables = self.escape_list(tables, |e, t| e.table(t, ""));
        self.builder.update(&tables);
        self
    }

    /// Add one `SET` assignment on a raw column. The value is passed
    /// through as-is.
    pub fn set(&mut self, column: &str, value: &str) -> &mut Self {
        let column = self.escaper.column(column, "");
        self.builder.set(&column, value);
        self
    }

    pub fn update_mode(&mut self, mode: &str) -> &mut Self {
        self.builder.update_mode(mode);
        self
    }

    pub fn get_update_query(&self) -> String {
        self.builder.get_update_query()
    }

    // ==================== DELETE ====================

    /// Name raw tables to delete from in a multi-table delete.
    pub fn delete(&mut self, tables: &str) -> &mut Self {
        let tables = self.escape_list(tables, |e, t| e.table(t, ""));
        self.builder.delete(&tables);
        self
    }

    pub fn delete_mode(&mut self, mode: &str) -> &mut Self {
        self.builder.delete_mode(mode);
        self
    }

    pub fn get_delete_query(&self) -> String {
        self.builder.get_delete_query()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;

    fn simple(dialect: Dialect) -> SimpleQueryBuilder {
        SimpleQueryBuilder::new(QueryBuilder::new(dialect), QueryEscaper::new(dialect))
    }

    #[test]
    fn select_escapes_each_column_in_the_list() {
        let mut qb = simple(Dialect::MySql);
        qb.select("id, name").from("people", "");
        assert_eq!(qb.get_select_query(), "SELECT `id`, `name` FROM `people`");
    }

    #[test]
    fn from_with_alias() {
        let mut qb = simple(Dialect::MySql);
        qb.select("*").from("people", "p");
        assert_eq!(qb.get_select_query(), "SELECT * FROM `people` AS `p`");
    }

    #[test]
    fn where_escapes_column_but_not_value() {
        let mut qb = simple(Dialect::MySql);
        qb.select("*").from("t", "").where_clause("status", "=", "'active'");
        assert_eq!(
            qb.get_select_query(),
            "SELECT * FROM `t` WHERE `status` = 'active'"
        );
    }

    #[test]
    fn join_and_on_escape_identifiers() {
        let mut qb = simple(Dialect::MySql);
        qb.select("*")
            .from("t1", "")
            .join("t2", "INNER")
            .on("t1.id", "=", "t2.id");
        assert_eq!(
            qb.get_select_query(),
            "SELECT * FROM `t1` INNER JOIN `t2` ON `t1`.`id` = `t2`.`id`"
        );
    }

    #[test]
    fn union_parenthesizes_the_tail_query() {
        let mut qb = simple(Dialect::MySql);
        qb.select("col").from("t", "").union("SELECT col2 FROM t2", "");
        assert_eq!(
            qb.get_select_query(),
            "(SELECT `col` FROM `t`) UNION (SELECT col2 FROM t2)"
        );
    }

    #[test]
    fn insert_escapes_table_and_columns() {
        let mut qb = simple(Dialect::MySql);
        (&mut qb).into("people").column_names(&["id", "name"]).values(&["1", "'ada'"]);
        assert_eq!(
            qb.get_insert_query(),
            "INSERT INTO `people` (`id`, `name`) VALUES (1, 'ada')"
        );
    }

    #[test]
    fn returning_escapes_each_column() {
        let mut qb = simple(Dialect::Sqlite);
        (&mut qb).into("people").values(&["1"]).returning("id, name");
        assert_eq!(
            qb.get_insert_query(),
            "INSERT INTO \"people\" VALUES (1) RETURNING \"id\", \"name\""
        );
    }

    #[test]
    fn update_escapes_tables_and_set_columns() {
        let mut qb = simple(Dialect::MySql);
        qb.update("people").set("name", "'ada'").where_clause("id", "=", "1");
        assert_eq!(
            qb.get_update_query(),
            "UPDATE `people` SET `name` = 'ada' WHERE `id` = 1"
        );
    }

    #[test]
    fn delete_multi_table_escapes_each_table() {
        let mut qb = simple(Dialect::MySql);
        qb.delete("t1, t2").from("t1", "").join("t2", "INNER").on("t1.id", "=", "t2.id");
        assert_eq!(
            qb.get_delete_query(),
            "DELETE `t1`, `t2` FROM `t1` INNER JOIN `t2` ON `t1`.`id` = `t2`.`id`"
        );
    }

    #[test]
    fn mode_setters_delegate_with_whitelisting() {
        let mut qb = simple(Dialect::MySql);
        qb.update("t").update_mode("LOW_PRIORITY").update_mode("BOGUS").set("a", "1");
        assert_eq!(qb.get_update_query(), "UPDATE LOW_PRIORITY `t` SET `a` = 1");
    }
}
