//! UPDATE clause setters and rendering.

use super::QueryBuilder;

impl QueryBuilder {
    /// Add a table reference to update.
    pub fn update(&mut self, table_reference: &str) -> &mut Self {
        if self.update.is_empty() {
            self.update = table_reference.to_string();
        } else {
            self.update.push_str(", ");
            self.update.push_str(table_reference);
        }
        self
    }

    /// Add one `SET` assignment.
    pub fn set(&mut self, column: &str, value: &str) -> &mut Self {
        if self.set.is_empty() {
            self.set = format!("SET {column} = {value}");
        } else {
            self.set.push_str(&format!(", {column} = {value}"));
        }
        self
    }

    /// Add an `UPDATE` mode keyword. Keywords the dialect does not recognize
    /// are dropped.
    pub fn update_mode(&mut self, mode: &str) -> &mut Self {
        if let Some(keyword) = Self::whitelisted(mode, self.dialect().update_modes()) {
            Self::push_mode(&mut self.update_mode, keyword);
        }
        self
    }

    /// Render the assembled `UPDATE` statement. Yields an empty string when
    /// no target table was set.
    pub fn get_update_query(&self) -> String {
        if self.update.is_empty() {
            return String::new();
        }

        let components = ["update_mode", "update", "set", "where", "order_by", "limit"];

        format!("UPDATE {}", self.implode_query(&components))
    }
}
