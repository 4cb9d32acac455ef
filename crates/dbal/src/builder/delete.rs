//! DELETE clause setters and rendering.

use super::QueryBuilder;

impl QueryBuilder {
    /// Name tables to delete rows from in a multi-table delete
    /// (`DELETE t1, t2 FROM ...`). Not needed for single-table deletes.
    pub fn delete(&mut self, table_reference: &str) -> &mut Self {
        if self.delete.is_empty() {
            self.delete = table_reference.to_string();
        } else {
            self.delete.push_str(", ");
            self.delete.push_str(table_reference);
        }
        self
    }

    /// Add a `DELETE` mode keyword. Keywords the dialect does not recognize
    /// are dropped.
    pub fn delete_mode(&mut self, mode: &str) -> &mut Self {
        if let Some(keyword) = Self::whitelisted(mode, self.dialect().delete_modes()) {
            Self::push_mode(&mut self.delete_mode, keyword);
        }
        self
    }

    /// Render the assembled `DELETE` statement. Yields an empty string when
    /// no `FROM` clause was set.
    pub fn get_delete_query(&self) -> String {
        if self.from.is_empty() {
            return String::new();
        }

        let components = [
            "delete_mode",
            "delete",
            "from",
            "join",
            "where",
            "order_by",
            "limit",
            "returning",
        ];

        format!("DELETE {}", self.implode_query(&components))
    }
}
