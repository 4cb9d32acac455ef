//! SELECT clause setters and rendering.

use super::QueryBuilder;

impl QueryBuilder {
    /// Add result columns to select.
    pub fn select(&mut self, columns: &str) -> &mut Self {
        if self.select.is_empty() {
            self.select = columns.to_string();
        } else {
            self.select.push_str(", ");
            self.select.push_str(columns);
        }
        self
    }

    /// Add a `SELECT` mode keyword (e.g. `DISTINCT`). Keywords the dialect
    /// does not recognize are dropped.
    pub fn select_mode(&mut self, mode: &str) -> &mut Self {
        if let Some(keyword) = Self::whitelisted(mode, self.dialect().select_modes()) {
            Self::push_mode(&mut self.select_mode, keyword);
        }
        self
    }

    /// Add a table reference to select from.
    pub fn from(&mut self, table_reference: &str) -> &mut Self {
        if self.from.is_empty() {
            self.from = format!("FROM {table_reference}");
        } else {
            self.from.push_str(", ");
            self.from.push_str(table_reference);
        }
        self
    }

    /// Register a join. `join_type` may be a bare keyword (`INNER`, `LEFT`)
    /// or a full `... JOIN` phrase (`STRAIGHT_JOIN`).
    pub fn join(&mut self, table_reference: &str, join_type: &str) -> &mut Self {
        let join_type = join_type.trim().to_uppercase();
        let clause = if join_type.contains("JOIN") {
            format!("{join_type} {table_reference}")
        } else {
            format!("{join_type} JOIN {table_reference}")
        };

        if self.join.is_empty() {
            self.join = clause;
        } else {
            self.join.push(' ');
            self.join.push_str(&clause);
        }
        self.join_needs_on = true;
        self
    }

    /// Set the row lock mode appended after all other clauses. Modes the
    /// dialect does not recognize are dropped.
    pub fn lock_mode(&mut self, mode: &str) -> &mut Self {
        if let Some(keyword) = Self::whitelisted(mode, self.dialect().lock_modes()) {
            self.lock_mode = keyword.to_string();
        }
        self
    }

    /// Register a common table expression.
    pub fn with(&mut self, alias: &str, sql_query: &str) -> &mut Self {
        let cte = format!("{alias} AS ( {sql_query} )");
        if self.with.is_empty() {
            self.with = cte;
        } else {
            self.with.push_str(", ");
            self.with.push_str(&cte);
        }
        self
    }

    /// Register a recursive common table expression.
    pub fn with_recursive(&mut self, alias: &str, sql_query: &str) -> &mut Self {
        self.is_recursive = true;
        self.with(alias, sql_query)
    }

    /// Append a `UNION` tail. `mode` may be `ALL` or `DISTINCT`; anything
    /// else renders a plain `UNION`. The query is expected parenthesized.
    pub fn union(&mut self, sql_query: &str, mode: &str) -> &mut Self {
        self.compound("UNION", sql_query, mode)
    }

    /// Append an `INTERSECT` tail.
    pub fn intersect(&mut self, sql_query: &str, mode: &str) -> &mut Self {
        self.compound("INTERSECT", sql_query, mode)
    }

    /// Append an `EXCEPT` tail.
    pub fn except(&mut self, sql_query: &str, mode: &str) -> &mut Self {
        self.compound("EXCEPT", sql_query, mode)
    }

    fn compound(&mut self, connector: &str, sql_query: &str, mode: &str) -> &mut Self {
        let mode = mode.trim().to_uppercase();
        self.compound = match mode.as_str() {
            "ALL" | "DISTINCT" => format!("{connector} {mode} {sql_query}"),
            _ => format!("{connector} {sql_query}"),
        };
        self
    }

    /// Render the assembled `SELECT` statement.
    pub fn get_select_query(&self) -> String {
        let components = [
            "select_mode",
            "select",
            "from",
            "join",
            "where",
            "group_by",
            "having",
            "order_by",
            "limit",
            "lock_mode",
        ];

        let mut sql = format!("SELECT {}", self.implode_query(&components));

        if !self.compound.is_empty() {
            sql = format!("({sql}) {}", self.compound);
        }

        if !self.with.is_empty() {
            let keyword = if self.is_recursive { "WITH RECURSIVE" } else { "WITH" };
            sql = format!("{keyword} {} {sql}", self.with);
        }

        sql
    }
}
