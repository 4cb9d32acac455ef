//! Dialect-aware DML statement assembly.
//!
//! A [`QueryBuilder`] accumulates already-escaped clause fragments through
//! fluent setters and renders the final statement at `get_*_query()` time.
//! Setters may be called in any order; rendering decides clause order and
//! omits empty clauses. There is no reset: a new statement means a new
//! builder instance.
//!
//! Identifiers and values must be escaped before they reach the builder,
//! either by hand via [`QueryEscaper`](crate::QueryEscaper) or through the
//! [`SimpleQueryBuilder`](crate::SimpleQueryBuilder) facade.

mod delete;
mod insert;
mod select;
mod update;


use crate::dialect::Dialect;

/// Mutable statement assembly object holding pre-escaped clause fragments.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    dialect: Dialect,

    // SELECT clause buffers
    pub(crate) select: String,
    pub(crate) select_mode: Vec<&'static str>,
    pub(crate) from: String,
    pub(crate) join: String,
    pub(crate) where_clause: String,
    pub(crate) join_needs_on: bool,
    pub(crate) group_by: String,
    pub(crate) having: String,
    pub(crate) order_by: String,
    pub(crate) limit: String,
    pub(crate) lock_mode: String,
    pub(crate) with: String,
    pub(crate) is_recursive: bool,
    pub(crate) compound: String,

    // Write statement buffers
    pub(crate) into: String,
    pub(crate) column_names: String,
    pub(crate) values: String,
    pub(crate) select_statement: String,
    pub(crate) set: String,
    pub(crate) update: String,
    pub(crate) delete: String,
    pub(crate) returning: String,
    pub(crate) duplicate_key_update: String,
    pub(crate) update_mode: Vec<&'static str>,
    pub(crate) insert_mode: Vec<&'static str>,
    pub(crate) replace_mode: Vec<&'static str>,
    pub(crate) delete_mode: Vec<&'static str>,

    // Connector for the next condition, set by `and()`/`or()`
    pub(crate) connector: Option<&'static str>,
}

impl QueryBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            select: String::new(),
            select_mode: Vec::new(),
            from: String::new(),
            join: String::new(),
            where_clause: String::new(),
            join_needs_on: false,
            group_by: String::new(),
            having: String::new(),
            order_by: String::new(),
            limit: String::new(),
            lock_mode: String::new(),
            with: String::new(),
            is_recursive: false,
            compound: String::new(),
            into: String::new(),
            column_names: String::new(),
            values: String::new(),
            select_statement: String::new(),
            set: String::new(),
            update: String::new(),
            delete: String::new(),
            returning: String::new(),
            duplicate_key_update: String::new(),
            update_mode: Vec::new(),
            insert_mode: Vec::new(),
            replace_mode: Vec::new(),
            delete_mode: Vec::new(),
            connector: None,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Connect the next condition with `AND`.
    pub fn and(&mut self) -> &mut Self {
        self.connector = Some("AND");
        self
    }

    /// Connect the next condition with `OR`.
    pub fn or(&mut self) -> &mut Self {
        self.connector = Some("OR");
        self
    }

    /// Add a `WHERE` condition. Further conditions are joined with the
    /// pending connector (`AND` unless [`or()`](Self::or) was called).
    pub fn where_clause(&mut self, left: &str, operator: &str, right: &str) -> &mut Self {
        let connector = self.take_connector();
        append_condition(&mut self.where_clause, "WHERE", connector, left, operator, right);
        self
    }

    /// Add a `HAVING` condition.
    pub fn having(&mut self, left: &str, operator: &str, right: &str) -> &mut Self {
        let connector = self.take_connector();
        append_condition(&mut self.having, "HAVING", connector, left, operator, right);
        self
    }

    /// Add an `ON` condition to the last registered join.
    ///
    /// Does nothing when no join has been registered yet.
    pub fn on(&mut self, left: &str, operator: &str, right: &str) -> &mut Self {
        let connector = self.take_connector();
        if self.join_needs_on {
            self.join.push_str(&format!(" ON {left} {operator} {right}"));
            self.join_needs_on = false;
        } else if !self.join.is_empty() {
            self.join.push_str(&format!(" {connector} {left} {operator} {right}"));
        }
        self
    }

    /// Add a `GROUP BY` expression.
    pub fn group_by(&mut self, expression: &str) -> &mut Self {
        if self.group_by.is_empty() {
            self.group_by = format!("GROUP BY {expression}");
        } else {
            self.group_by.push_str(", ");
            self.group_by.push_str(expression);
        }
        self
    }

    /// Add an `ORDER BY` expression.
    pub fn order_by(&mut self, expression: &str, ascending: bool) -> &mut Self {
        let direction = if ascending { "ASC" } else { "DESC" };
        if self.order_by.is_empty() {
            self.order_by = format!("ORDER BY {expression} {direction}");
        } else {
            self.order_by.push_str(&format!(", {expression} {direction}"));
        }
        self
    }

    /// Set the `LIMIT`, with an optional `OFFSET`.
    pub fn limit(&mut self, amount: u64, offset: Option<u64>) -> &mut Self {
        self.limit = match offset {
            Some(offset) => format!("LIMIT {amount} OFFSET {offset}"),
            None => format!("LIMIT {amount}"),
        };
        self
    }

    /// Columns returned by a non-SELECT statement (`RETURNING` clause).
    ///
    /// Ignored when the dialect does not support `RETURNING`.
    pub fn returning(&mut self, columns: &str) -> &mut Self {
        if self.dialect.supports_returning() {
            self.returning = format!("RETURNING {columns}");
        }
        self
    }

    fn take_connector(&mut self) -> &'static str {
        self.connector.take().unwrap_or("AND")
    }

    /// Whitelist a mode keyword: returns the canonical keyword if the dialect
    /// recognizes it, `None` otherwise. Unknown keywords are dropped
    /// silently so forward-compatible callers keep working.
    pub(crate) fn whitelisted(
        mode: &str,
        allowed: &'static [&'static str],
    ) -> Option<&'static str> {
        let mode = mode.trim().to_uppercase();
        allowed.iter().find(|allowed| **allowed == mode).copied()
    }

    /// Append a whitelisted mode keyword to an ordered mode set, dropping
    /// duplicates.
    pub(crate) fn push_mode(modes: &mut Vec<&'static str>, keyword: &'static str) {
        if !modes.contains(&keyword) {
            modes.push(keyword);
        }
    }

    /// Render one named clause buffer.
    fn component_sql(&self, component: &str) -> String {
        match component {
            "select_mode" => self.select_mode.join(" "),
            "update_mode" => self.update_mode.join(" "),
            "insert_mode" => self.insert_mode.join(" "),
            "replace_mode" => self.replace_mode.join(" "),
            "delete_mode" => self.delete_mode.join(" "),
            "select" => self.select.clone(),
            "from" => self.from.clone(),
            "join" => self.join.clone(),
            "where" => self.where_clause.clone(),
            "group_by" => self.group_by.clone(),
            "having" => self.having.clone(),
            "order_by" => self.order_by.clone(),
            "limit" => self.limit.clone(),
            "lock_mode" => self.lock_mode.clone(),
            "into" => self.into.clone(),
            "column_names" => self.column_names.clone(),
            "values" => self.values.clone(),
            "select_statement" => self.select_statement.clone(),
            "set" => self.set.clone(),
            "update" => self.update.clone(),
            "delete" => self.delete.clone(),
            "returning" => self.returning.clone(),
            "duplicate_key_update" => self.duplicate_key_update.clone(),
            _ => String::new(),
        }
    }

    /// Join the named clause buffers with single spaces, skipping empty
    /// ones. An empty `select` buffer renders as `*`.
    pub(crate) fn implode_query(&self, components: &[&str]) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(components.len());

        for component in components {
            let sql = self.component_sql(component);
            if !sql.is_empty() {
                parts.push(sql);
            } else if *component == "select" {
                parts.push("*".to_string());
            }
        }

        parts.join(" ")
    }
}

/// Append one condition to a clause buffer, opening it with `keyword` when
/// empty and otherwise joining with the given connector.
fn append_condition(
    buffer: &mut String,
    keyword: &str,
    connector: &str,
    left: &str,
    operator: &str,
    right: &str,
) {
    if buffer.is_empty() {
        *buffer = format!("{keyword} {left} {operator} {right}");
    } else {
        buffer.push_str(&format!(" {connector} {left} {operator} {right}"));
    }
}
