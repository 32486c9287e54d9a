//! SQL dialect trait for multi-database support
//!
//! This trait defines the interface for generating database-specific SQL syntax.

/// SQL dialect trait for generating database-specific SQL
///
/// Query fragments are written with `?` placeholders; the dialect decides
/// how each one is spelled once the full statement is assembled.
pub trait SqlDialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Generate a parameter placeholder for the given index (1-based)
    ///
    /// - SQLite: Always returns "?"
    /// - PostgreSQL: Returns "$1", "$2", etc.
    fn placeholder(&self, index: usize) -> String;

    /// Generate LIMIT/OFFSET clause
    fn limit_offset(&self, limit: i64, offset: i64) -> String {
        format!("LIMIT {} OFFSET {}", limit, offset)
    }

    /// Wrap a statement so it returns its row count
    ///
    /// Counting over a derived table keeps GROUP BY queries correct.
    fn count_wrapper(&self, inner: &str) -> String {
        format!("SELECT COUNT(*) FROM ({}) AS counted", inner)
    }

    /// Replace every `?` in `sql` with this dialect's placeholder, in order
    fn number_placeholders(&self, sql: &str) -> String {
        let mut out = String::with_capacity(sql.len() + 8);
        let mut index = 0;
        for ch in sql.chars() {
            if ch == '?' {
                index += 1;
                out.push_str(&self.placeholder(index));
            } else {
                out.push(ch);
            }
        }
        out
    }
}
