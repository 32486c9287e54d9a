//! SQLite SQL dialect implementation

use super::SqlDialect;

/// SQLite SQL dialect
pub struct SqliteDialect;

impl SqlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.placeholder(1), "?");
        assert_eq!(dialect.placeholder(5), "?");
    }

    #[test]
    fn test_number_placeholders_is_identity() {
        let dialect = SqliteDialect;
        let sql = "SELECT a FROM t WHERE (b = ?) AND (c BETWEEN ? AND ?)";
        assert_eq!(dialect.number_placeholders(sql), sql);
    }

    #[test]
    fn test_limit_offset() {
        let dialect = SqliteDialect;
        assert_eq!(dialect.limit_offset(30000, 60000), "LIMIT 30000 OFFSET 60000");
    }

    #[test]
    fn test_count_wrapper() {
        let dialect = SqliteDialect;
        assert_eq!(
            dialect.count_wrapper("SELECT a FROM t GROUP BY a"),
            "SELECT COUNT(*) FROM (SELECT a FROM t GROUP BY a) AS counted"
        );
    }
}
