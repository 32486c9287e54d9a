//! Predicate compiler
//!
//! Turns a [`RequestIntent`] into a single column comparison with bound values.
//! List intents pick the shorter side of the include/exclude partition, then
//! fold any NULL sentinel out of the bound values into an `IS NULL` clause.

use serde::Serialize;

use super::intent::{ListIntent, RangeIntent, RequestIntent};
use super::options::placeholders;
use crate::data::SqlValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Equal,
    /// Rendered as `col = ?` and applied negated
    NotEqual,
    GreaterOrEqual,
    LessOrEqual,
    Between,
    In,
    NotIn,
    IsNull,
}

/// Trailing `OR col IS [NOT] NULL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NullClause {
    IsNull,
    IsNotNull,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Predicate {
    pub column: String,
    pub comparison: Comparison,
    pub values: Vec<SqlValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub null_clause: Option<NullClause>,
    /// Applied as `NOT (...)` in the WHERE clause
    pub negated: bool,
}

impl Predicate {
    /// Comparison text with `?` placeholders, unwrapped
    pub fn sql(&self) -> String {
        let column = &self.column;
        let mut sql = match self.comparison {
            Comparison::Equal | Comparison::NotEqual => format!("{} = ?", column),
            Comparison::GreaterOrEqual => format!("{} >= ?", column),
            Comparison::LessOrEqual => format!("{} <= ?", column),
            Comparison::Between => format!("{} BETWEEN ? AND ?", column),
            Comparison::In => format!("{} IN ({})", column, placeholders(self.values.len())),
            Comparison::NotIn => {
                format!("{} NOT IN ({})", column, placeholders(self.values.len()))
            }
            Comparison::IsNull => format!("{} IS NULL", column),
        };
        match self.null_clause {
            Some(NullClause::IsNull) => sql.push_str(&format!(" OR {} IS NULL", column)),
            Some(NullClause::IsNotNull) => sql.push_str(&format!(" OR {} IS NOT NULL", column)),
            None => {}
        }
        sql
    }

    /// Parenthesised form used when conjoining into a WHERE clause
    pub fn where_clause(&self) -> String {
        if self.negated {
            format!("NOT ({})", self.sql())
        } else {
            format!("({})", self.sql())
        }
    }
}

/// Compile an intent against `column`; `None` means the filter is omitted
pub fn compile(column: &str, intent: &RequestIntent) -> Option<Predicate> {
    match intent {
        RequestIntent::Range(range) => Some(compile_range(column, range)),
        RequestIntent::List(list) => compile_list(column, list),
    }
}

fn compile_range(column: &str, range: &RangeIntent) -> Predicate {
    let (comparison, values) = match range {
        RangeIntent::AtLeast(start) => (Comparison::GreaterOrEqual, vec![start.clone()]),
        RangeIntent::AtMost(end) => (Comparison::LessOrEqual, vec![end.clone()]),
        RangeIntent::Between(start, end) => {
            (Comparison::Between, vec![start.clone(), end.clone()])
        }
    };
    Predicate {
        column: column.to_string(),
        comparison,
        values,
        null_clause: None,
        negated: false,
    }
}

/// Selection table over the unpruned lengths, first match wins:
///
/// | include | exclude | result              |
/// |---------|---------|---------------------|
/// | 0       | 0       | none                |
/// | 1       | 0       | `= include[0]`      |
/// | 0       | 1       | `NOT (= exclude[0])`|
/// | >1      | <=1     | `IN include`        |
/// | <=1     | >1      | `NOT IN exclude`    |
/// | >1      | >1, I<X | `IN include`        |
/// | >1      | >1, I>X | `NOT IN exclude`    |
/// | other   |         | none                |
fn compile_list(column: &str, list: &ListIntent) -> Option<Predicate> {
    let include = list.include.len();
    let exclude = list.exclude.len();

    let (comparison, source) = match (include, exclude) {
        (0, 0) => return None,
        (1, 0) => (Comparison::Equal, &list.include),
        (0, 1) => (Comparison::NotEqual, &list.exclude),
        (i, x) if i > 1 && x <= 1 => (Comparison::In, &list.include),
        (i, x) if i <= 1 && x > 1 => (Comparison::NotIn, &list.exclude),
        (i, x) if i < x => (Comparison::In, &list.include),
        (i, x) if i > x => (Comparison::NotIn, &list.exclude),
        _ => return None,
    };

    let negated = comparison == Comparison::NotEqual;
    let mut values = source.clone();
    let saw_null = match values.iter().position(SqlValue::is_null_sentinel) {
        Some(index) => {
            values.remove(index);
            true
        }
        None => false,
    };

    let (comparison, null_clause) = match (saw_null, values.is_empty()) {
        (true, true) => (Comparison::IsNull, None),
        (true, false) if include > exclude => (comparison, Some(NullClause::IsNotNull)),
        (true, false) => (comparison, Some(NullClause::IsNull)),
        (false, _) => (comparison, None),
    };

    Some(Predicate {
        column: column.to_string(),
        comparison,
        values,
        null_clause,
        negated,
    })
}
