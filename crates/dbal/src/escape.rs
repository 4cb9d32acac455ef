//! Dialect-safe escaping of identifiers and values.
//!
//! These are formatting helpers, not validators: malformed input degrades to
//! an empty or zero result instead of erroring, and NULL propagation is
//! handled centrally by [`QueryEscaper::null_or_value`].

use crate::dialect::Dialect;

/// Which escaping function a `null_or` call dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Float,
    Query,
}

/// Produces dialect-safe SQL fragments from raw identifiers and values.
///
/// Escaped output is fed to a [`QueryBuilder`](crate::QueryBuilder), which
/// never re-escapes.
#[derive(Debug, Clone, Copy)]
pub struct QueryEscaper {
    dialect: Dialect,
}

impl QueryEscaper {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Escape input as a column reference, with an optional collation.
    ///
    /// Dotted references (`db.table.column`) are escaped part by part; a bare
    /// `*` part passes through unescaped.
    pub fn column(&self, name: &str, collation: &str) -> String {
        self.collate(&self.escape_location_reference(name), collation)
            .trim()
            .to_string()
    }

    /// Escape input as a result column, with an optional alias.
    ///
    /// No alias is attached when the column resolves to `*` or the alias is
    /// empty.
    pub fn result_column(&self, column: &str, alias: &str) -> String {
        let column = self.escape_location_reference(column);

        if alias.is_empty() || column == "*" {
            column
        } else {
            format!("{column} AS {}", self.delimit(alias))
        }
    }

    /// Escape input as a result column whose value is rendered hexadecimal.
    ///
    /// Always aliased; the alias defaults to the raw column name.
    pub fn hex_result_column(&self, column: &str, alias: &str) -> String {
        let alias = if alias.is_empty() { column } else { alias };

        format!(
            "HEX({}) AS {}",
            self.escape_location_reference(column),
            self.delimit(alias)
        )
    }

    /// Escape input as a table reference, with an optional alias.
    pub fn table(&self, table: &str, alias: &str) -> String {
        let table = self.escape_location_reference(table);

        if alias.is_empty() {
            table
        } else {
            format!("{table} AS {}", self.delimit(alias))
        }
    }

    /// Coerce input to an integer value, `intval`-style.
    ///
    /// Takes the leading numeric prefix and defaults to `0`; no range
    /// validation is performed.
    pub fn intvalue(&self, value: &str) -> String {
        coerce_int(value).to_string()
    }

    /// Coerce input to a floating point value.
    ///
    /// Takes the leading numeric prefix and defaults to `0`; no range
    /// validation is performed.
    pub fn floatvalue(&self, value: &str) -> String {
        coerce_float(value).to_string()
    }

    /// Wrap a subquery in parentheses; empty input yields an empty string.
    pub fn query_value(&self, value: &str) -> String {
        if value.is_empty() {
            String::new()
        } else {
            format!("({value})")
        }
    }

    /// Render pre-escaped values as a parenthesized comma-separated list.
    ///
    /// An empty sequence yields an empty string.
    pub fn list_value<S: AsRef<str>>(&self, values: &[S]) -> String {
        if values.is_empty() {
            return String::new();
        }

        let csv = values
            .iter()
            .map(|v| v.as_ref())
            .collect::<Vec<_>>()
            .join(",");

        format!("({csv})")
    }

    /// NULL-propagating value escape: `None` renders the literal `NULL`,
    /// anything else dispatches to the escaping function named by `kind`.
    pub fn null_or_value(&self, kind: ValueKind, value: Option<&str>) -> String {
        match value {
            None => "NULL".to_string(),
            Some(value) => match kind {
                ValueKind::Int => self.intvalue(value),
                ValueKind::Float => self.floatvalue(value),
                ValueKind::Query => self.query_value(value),
            },
        }
    }

    /// NULL-propagating list escape.
    pub fn null_or_list_value<S: AsRef<str>>(&self, values: Option<&[S]>) -> String {
        match values {
            None => "NULL".to_string(),
            Some(values) => self.list_value(values),
        }
    }

    /// Append a `COLLATE` suffix when a collation is given.
    fn collate(&self, value: &str, collation: &str) -> String {
        if collation.is_empty() {
            value.to_string()
        } else {
            format!("{value} COLLATE {}", collation.trim())
        }
    }

    /// Wrap a single identifier part in the dialect's delimiters.
    fn delimit(&self, part: &str) -> String {
        let (left, right) = self.dialect.identifier_delimiters();
        format!("{left}{part}{right}")
    }

    /// Escape a location reference (database, table, column).
    ///
    /// Splits on `.`, trims each part and delimits everything except a bare
    /// `*`.
    fn escape_location_reference(&self, reference: &str) -> String {
        reference
            .split('.')
            .map(|part| {
                let part = part.trim();
                if part == "*" {
                    part.to_string()
                } else {
                    self.delimit(part)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Leading-prefix integer coercion: optional sign followed by digits.
fn coerce_int(value: &str) -> i64 {
    let value = value.trim_start();
    let mut end = 0;
    for (i, c) in value.char_indices() {
        if i == 0 && (c == '+' || c == '-') {
            end = i + c.len_utf8();
        } else if c.is_ascii_digit() {
            end = i + 1;
        } else {
            break;
        }
    }
    value[..end].parse().unwrap_or(0)
}

/// Leading-prefix float coercion: longest prefix that parses as a float.
fn coerce_float(value: &str) -> f64 {
    let value = value.trim_start();
    let mut end = 0;
    for (i, c) in value.char_indices() {
        let is_numeric = c.is_ascii_digit()
            || c == '.'
            || (i == 0 && (c == '+' || c == '-'))
            || ((c == 'e' || c == 'E') && end > 0)
            || ((c == '+' || c == '-') && value[..i].ends_with(['e', 'E']));
        if !is_numeric {
            break;
        }
        end = i + c.len_utf8();
    }

    // Back off trailing characters that make the prefix unparseable,
    // e.g. "1.2e" or "3.".
    while end > 0 {
        if let Ok(parsed) = value[..end].parse() {
            return parsed;
        }
        end -= 1;
    }

    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mysql() -> QueryEscaper {
        QueryEscaper::new(Dialect::MySql)
    }

    fn sqlite() -> QueryEscaper {
        QueryEscaper::new(Dialect::Sqlite)
    }

    #[test]
    fn column_escapes_every_dotted_part() {
        assert_eq!(mysql().column("db.table.col", ""), "`db`.`table`.`col`");
        assert_eq!(sqlite().column("db.table.col", ""), "\"db\".\"table\".\"col\"");
    }

    #[test]
    fn column_passes_star_through() {
        assert_eq!(mysql().column("*", ""), "*");
        assert_eq!(mysql().column("table.*", ""), "`table`.*");
    }

    #[test]
    fn column_trims_parts() {
        assert_eq!(mysql().column(" table . col ", ""), "`table`.`col`");
    }

    #[test]
    fn column_appends_collation() {
        assert_eq!(
            mysql().column("col", "utf8_general_ci"),
            "`col` COLLATE utf8_general_ci"
        );
    }

    #[test]
    fn table_with_alias() {
        assert_eq!(mysql().table("people", ""), "`people`");
        assert_eq!(mysql().table("people", "p"), "`people` AS `p`");
    }

    #[test]
    fn result_column_skips_alias_for_star_or_empty() {
        assert_eq!(mysql().result_column("*", "everything"), "*");
        assert_eq!(mysql().result_column("col", ""), "`col`");
        assert_eq!(mysql().result_column("col", "c"), "`col` AS `c`");
    }

    #[test]
    fn hex_result_column_defaults_alias_to_column() {
        assert_eq!(mysql().hex_result_column("uuid", ""), "HEX(`uuid`) AS `uuid`");
        assert_eq!(mysql().hex_result_column("uuid", "id"), "HEX(`uuid`) AS `id`");
    }

    #[test]
    fn intvalue_coerces_leniently() {
        assert_eq!(mysql().intvalue("42"), "42");
        assert_eq!(mysql().intvalue("-17"), "-17");
        assert_eq!(mysql().intvalue("12abc"), "12");
        assert_eq!(mysql().intvalue("3.9"), "3");
        assert_eq!(mysql().intvalue("abc"), "0");
    }

    #[test]
    fn floatvalue_coerces_leniently() {
        assert_eq!(mysql().floatvalue("3.5"), "3.5");
        assert_eq!(mysql().floatvalue("-1.25e2"), "-125");
        assert_eq!(mysql().floatvalue("7kg"), "7");
        assert_eq!(mysql().floatvalue("x"), "0");
    }

    #[test]
    fn query_value_wraps_nonempty_input() {
        assert_eq!(mysql().query_value(""), "");
        assert_eq!(mysql().query_value("SELECT 1"), "(SELECT 1)");
    }

    #[test]
    fn list_value_renders_csv_or_empty() {
        assert_eq!(mysql().list_value::<&str>(&[]), "");
        assert_eq!(mysql().list_value(&["1", "2"]), "(1,2)");
    }

    #[test]
    fn null_or_value_short_circuits_null() {
        let escaper = mysql();
        assert_eq!(escaper.null_or_value(ValueKind::Int, None), "NULL");
        assert_eq!(escaper.null_or_value(ValueKind::Float, None), "NULL");
        assert_eq!(escaper.null_or_value(ValueKind::Query, None), "NULL");
    }

    #[test]
    fn null_or_value_delegates_like_the_plain_method() {
        let escaper = mysql();
        assert_eq!(
            escaper.null_or_value(ValueKind::Int, Some("5")),
            escaper.intvalue("5")
        );
        assert_eq!(
            escaper.null_or_value(ValueKind::Query, Some("SELECT 1")),
            escaper.query_value("SELECT 1")
        );
    }

    #[test]
    fn null_or_list_value() {
        let escaper = mysql();
        assert_eq!(escaper.null_or_list_value::<&str>(None), "NULL");
        assert_eq!(escaper.null_or_list_value(Some(&["1", "2"][..])), "(1,2)");
    }
}
