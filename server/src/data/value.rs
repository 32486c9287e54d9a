//! Dynamically typed SQL values and decoded rows
//!
//! Category tables mix text, integers and NULL sentinels, and every dataset
//! projects a different set of columns, so bound parameters and result rows
//! are carried as [`SqlValue`] rather than per-dataset structs.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

/// A bound parameter or a decoded column value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    /// An instant with its rendering in the dataset's date layout.
    ///
    /// Backends with a native timestamp type bind `at`; the rest bind `text`.
    Time { at: NaiveDateTime, text: String },
}

impl SqlValue {
    /// Whether this value marks "match rows where the column IS NULL".
    ///
    /// Only the exact spellings `NULL` and `null` count, plus a real NULL.
    pub fn is_null_sentinel(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s == "NULL" || s == "null",
            Self::Int(_) | Self::Float(_) | Self::Time { .. } => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Null | Self::Time { .. } => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Float(f) if f.fract() == 0.0 => Some(*f as i64),
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
            Self::Null | Self::Time { .. } => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Render as an inline SQL literal (diagnostic statements only)
    pub fn to_literal(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) | Self::Time { text: s, .. } => format!("'{}'", s.replace('\'', "''")),
        }
    }
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Text(s) | Self::Time { text: s, .. } => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(s) | Self::Time { text: s, .. } => write!(f, "{}", s),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for SqlValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for SqlValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for SqlValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

/// One result row, columns kept in select order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: Vec<(String, SqlValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(name, value.into());
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: SqlValue) {
        self.columns.push((name.into(), value));
    }

    /// Look up a column by name.
    ///
    /// Matching is case-insensitive: PostgreSQL folds unquoted aliases to
    /// lowercase while SQLite keeps them as written.
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(column, _)| column.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(SqlValue::as_f64)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(SqlValue::as_i64)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sentinel_spellings() {
        assert!(SqlValue::Null.is_null_sentinel());
        assert!(SqlValue::from("NULL").is_null_sentinel());
        assert!(SqlValue::from("null").is_null_sentinel());
        assert!(!SqlValue::from("Null").is_null_sentinel());
        assert!(!SqlValue::from("").is_null_sentinel());
        assert!(!SqlValue::Int(0).is_null_sentinel());
    }

    #[test]
    fn test_to_literal_escapes_quotes() {
        assert_eq!(SqlValue::from("O'Brien").to_literal(), "'O''Brien'");
        assert_eq!(SqlValue::Int(27).to_literal(), "27");
        assert_eq!(SqlValue::Null.to_literal(), "NULL");
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(SqlValue::Int(20).as_f64(), Some(20.0));
        assert_eq!(SqlValue::Float(17.0).as_i64(), Some(17));
        assert_eq!(SqlValue::Float(17.5).as_i64(), None);
        assert_eq!(SqlValue::from(" 42 ").as_i64(), Some(42));
        assert_eq!(SqlValue::Null.as_f64(), None);
    }

    #[test]
    fn test_record_lookup_ignores_case() {
        let record = Record::new()
            .with("Latitude", 53.5)
            .with("Longitude", -113.4);
        assert_eq!(record.get_f64("latitude"), Some(53.5));
        assert_eq!(record.get_f64("LONGITUDE"), Some(-113.4));
        assert!(record.get("depth").is_none());
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_serialize_untagged() {
        let values = vec![
            SqlValue::Null,
            SqlValue::Int(5),
            SqlValue::from("Withdrawal"),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[null,5,"Withdrawal"]"#);
    }

    #[test]
    fn test_time_renders_its_layout_text() {
        let at = chrono::NaiveDate::from_ymd_opt(1999, 12, 31)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let value = SqlValue::Time {
            at,
            text: "1999.12.31".into(),
        };
        assert_eq!(value.to_literal(), "'1999.12.31'");
        assert_eq!(value.to_string(), "1999.12.31");
        assert_eq!(serde_json::to_string(&value).unwrap(), r#""1999.12.31""#);
        assert!(!value.is_null_sentinel());
        assert_eq!(value.as_i64(), None);
    }
}
