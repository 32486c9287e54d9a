//! SELECT statement assembly
//!
//! Conditions are stored with `?` placeholders in the order their values are
//! bound. The dialect renumbers placeholders only when the final text is
//! rendered, so one query serves the count, the page fetch and the
//! diagnostic statement.

use serde::Serialize;

use crate::data::SqlValue;
use crate::data::sql::SqlDialect;

/// One conjunct of the WHERE clause
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Limit {
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectQuery {
    pub table: String,
    pub select: String,
    pub joins: Vec<String>,
    pub conditions: Vec<Condition>,
    pub group_by: Option<String>,
    pub order_by: Option<String>,
    pub limit: Option<Limit>,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>, select: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            select: select.into(),
            joins: Vec::new(),
            conditions: Vec::new(),
            group_by: None,
            order_by: None,
            limit: None,
        }
    }

    pub fn filter(&mut self, sql: impl Into<String>, values: Vec<SqlValue>) {
        self.conditions.push(Condition {
            sql: sql.into(),
            values,
        });
    }

    /// Copy of this query bounded to one page
    pub fn paginate(&self, limit: i64, offset: i64) -> SelectQuery {
        SelectQuery {
            limit: Some(Limit { limit, offset }),
            ..self.clone()
        }
    }

    /// Bound values in placeholder order
    pub fn params(&self) -> Vec<SqlValue> {
        self.conditions
            .iter()
            .flat_map(|c| c.values.iter().cloned())
            .collect()
    }

    /// Everything up to and including GROUP BY
    fn body(&self) -> String {
        let mut sql = format!("SELECT {} FROM {}", self.select, self.table);
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        if !self.conditions.is_empty() {
            let clauses: Vec<&str> = self.conditions.iter().map(|c| c.sql.as_str()).collect();
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        if let Some(group_by) = &self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(group_by);
        }
        sql
    }

    /// Full statement with `?` placeholders
    fn template(&self, dialect: &dyn SqlDialect) -> String {
        let mut sql = self.body();
        if let Some(order_by) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        if let Some(Limit { limit, offset }) = self.limit {
            sql.push(' ');
            sql.push_str(&dialect.limit_offset(limit, offset));
        }
        sql
    }

    pub fn to_sql(&self, dialect: &dyn SqlDialect) -> String {
        dialect.number_placeholders(&self.template(dialect))
    }

    /// Row count of the unbounded, unordered query
    pub fn to_count_sql(&self, dialect: &dyn SqlDialect) -> String {
        dialect.number_placeholders(&dialect.count_wrapper(&self.body()))
    }

    /// Statement with every bound value inlined as a literal
    ///
    /// For display only; never executed.
    pub fn to_literal_sql(&self, dialect: &dyn SqlDialect) -> String {
        let template = self.template(dialect);
        let params = self.params();
        let mut values = params.iter();
        let mut out = String::with_capacity(template.len() + params.len() * 8);
        for ch in template.chars() {
            if ch != '?' {
                out.push(ch);
                continue;
            }
            match values.next() {
                Some(value) => out.push_str(&value.to_literal()),
                None => out.push('?'),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sql::{PostgresDialect, SqliteDialect};

    fn sample() -> SelectQuery {
        let mut query = SelectQuery::new("tblWells", "latitude, longitude");
        query.filter("(water_use IN (?, ?))", vec!["Domestic".into(), "O'Neil".into()]);
        query.filter("(recommended_pumping_rate >= ?)", vec![SqlValue::Int(5)]);
        query
    }

    #[test]
    fn test_plain_select() {
        let query = SelectQuery::new("tblWells", "latitude, longitude");
        assert_eq!(
            query.to_sql(&SqliteDialect),
            "SELECT latitude, longitude FROM tblWells"
        );
    }

    #[test]
    fn test_full_statement_sqlite() {
        let mut query = sample();
        query.joins.push("INNER JOIN t ON t.id = tblWells.id".into());
        query.group_by = Some("tblWells.id".into());
        query.order_by = Some("MAX(latitude) DESC".into());
        let query = query.paginate(100, 200);
        assert_eq!(
            query.to_sql(&SqliteDialect),
            "SELECT latitude, longitude FROM tblWells INNER JOIN t ON t.id = tblWells.id \
             WHERE (water_use IN (?, ?)) AND (recommended_pumping_rate >= ?) \
             GROUP BY tblWells.id ORDER BY MAX(latitude) DESC LIMIT 100 OFFSET 200"
        );
        assert_eq!(query.params().len(), 3);
    }

    #[test]
    fn test_postgres_numbering() {
        let query = sample().paginate(10, 0);
        assert_eq!(
            query.to_sql(&PostgresDialect),
            "SELECT latitude, longitude FROM tblWells \
             WHERE (water_use IN ($1, $2)) AND (recommended_pumping_rate >= $3) \
             LIMIT 10 OFFSET 0"
        );
    }

    #[test]
    fn test_count_drops_order_and_limit() {
        let mut query = sample();
        query.order_by = Some("latitude DESC".into());
        let query = query.paginate(10, 10);
        assert_eq!(
            query.to_count_sql(&SqliteDialect),
            "SELECT COUNT(*) FROM (SELECT latitude, longitude FROM tblWells \
             WHERE (water_use IN (?, ?)) AND (recommended_pumping_rate >= ?)) AS counted"
        );
    }

    #[test]
    fn test_literal_statement() {
        let query = sample().paginate(7, 0);
        assert_eq!(
            query.to_literal_sql(&SqliteDialect),
            "SELECT latitude, longitude FROM tblWells \
             WHERE (water_use IN ('Domestic', 'O''Neil')) AND (recommended_pumping_rate >= 5) \
             LIMIT 7 OFFSET 0"
        );
    }
}
