//! INSERT/REPLACE clause setters and rendering.

use super::QueryBuilder;

impl QueryBuilder {
    /// Set the table to write into.
    pub fn into(&mut self, table: &str) -> &mut Self {
        self.into = format!("INTO {table}");
        self
    }

    /// Set the column list for the values or select statement being written.
    pub fn column_names<S: AsRef<str>>(&mut self, columns: &[S]) -> &mut Self {
        let csv = columns
            .iter()
            .map(|c| c.as_ref())
            .collect::<Vec<_>>()
            .join(", ");
        self.column_names = format!("({csv})");
        self
    }

    /// Append one row of values. Call repeatedly for multi-row inserts.
    pub fn values<S: AsRef<str>>(&mut self, values: &[S]) -> &mut Self {
        if values.is_empty() {
            return self;
        }

        let csv = values
            .iter()
            .map(|v| v.as_ref())
            .collect::<Vec<_>>()
            .join(", ");

        if self.values.is_empty() {
            self.values = format!("VALUES ({csv})");
        } else {
            self.values.push_str(&format!(", ({csv})"));
        }
        self
    }

    /// Use a SELECT statement as the data source (`INSERT INTO ... SELECT`).
    ///
    /// Input not starting with `SELECT` is ignored.
    pub fn select_statement(&mut self, sql_query: &str) -> &mut Self {
        if sql_query.trim_start().to_uppercase().starts_with("SELECT") {
            self.select_statement = sql_query.to_string();
        }
        self
    }

    /// Add an `INSERT` mode keyword. Keywords the dialect does not recognize
    /// are dropped.
    pub fn insert_mode(&mut self, mode: &str) -> &mut Self {
        if let Some(keyword) = Self::whitelisted(mode, self.dialect().insert_modes()) {
            Self::push_mode(&mut self.insert_mode, keyword);
        }
        self
    }

    /// Add a `REPLACE` mode keyword. Keywords the dialect does not recognize
    /// are dropped.
    pub fn replace_mode(&mut self, mode: &str) -> &mut Self {
        if let Some(keyword) = Self::whitelisted(mode, self.dialect().replace_modes()) {
            Self::push_mode(&mut self.replace_mode, keyword);
        }
        self
    }

    /// Set the `ON DUPLICATE KEY UPDATE` assignment list.
    ///
    /// Ignored on dialects without duplicate-key handling.
    pub fn on_duplicate_key_update(&mut self, set: &str) -> &mut Self {
        if self.dialect().supports_on_duplicate_key_update() {
            self.duplicate_key_update = format!("ON DUPLICATE KEY UPDATE {set}");
        }
        self
    }

    /// Render the assembled `INSERT` statement. Yields an empty string when
    /// no target table was set.
    pub fn get_insert_query(&self) -> String {
        if self.into.is_empty() {
            return String::new();
        }

        let components: &[&str] = if self.select_statement.is_empty() {
            &[
                "insert_mode",
                "into",
                "column_names",
                "values",
                "duplicate_key_update",
                "returning",
            ]
        } else {
            &[
                "insert_mode",
                "into",
                "column_names",
                "select_statement",
                "duplicate_key_update",
                "returning",
            ]
        };

        format!("INSERT {}", self.implode_query(components))
    }

    /// Render the assembled `REPLACE` statement. Yields an empty string when
    /// no target table was set.
    pub fn get_replace_query(&self) -> String {
        if self.into.is_empty() {
            return String::new();
        }

        let components: &[&str] = if self.select_statement.is_empty() {
            &["replace_mode", "into", "column_names", "values", "returning"]
        } else {
            &["replace_mode", "into", "column_names", "select_statement", "returning"]
        };

        format!("REPLACE {}", self.implode_query(components))
    }
}
