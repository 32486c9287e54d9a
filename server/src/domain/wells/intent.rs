//! Request intents: the value-bound meaning of a filter

use thiserror::Error;

use crate::data::SqlValue;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestIntent {
    Range(RangeIntent),
    List(ListIntent),
}

/// Range over one column with at least one bound set
#[derive(Debug, Clone, PartialEq)]
pub enum RangeIntent {
    AtLeast(SqlValue),
    AtMost(SqlValue),
    Between(SqlValue, SqlValue),
}

impl RangeIntent {
    pub fn from_bounds(start: Option<SqlValue>, end: Option<SqlValue>) -> Result<Self, IntentError> {
        match (start, end) {
            (None, None) => Err(IntentError::NoBound),
            (Some(start), None) => Ok(RangeIntent::AtLeast(start)),
            (None, Some(end)) => Ok(RangeIntent::AtMost(end)),
            (Some(start), Some(end)) => Ok(RangeIntent::Between(start, end)),
        }
    }
}

/// Raw values of the selected categories and of every other category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListIntent {
    pub include: Vec<SqlValue>,
    pub exclude: Vec<SqlValue>,
}

/// Reasons a filter contributes nothing to a query
///
/// None of these reach the client; the filter is simply left out.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntentError {
    #[error("no bound specified")]
    NoBound,

    #[error("no category selected")]
    NoSelection,

    #[error("invalid time layout '{0}'")]
    Layout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bounds() {
        assert_eq!(RangeIntent::from_bounds(None, None), Err(IntentError::NoBound));
        assert_eq!(
            RangeIntent::from_bounds(Some(SqlValue::Int(1)), None),
            Ok(RangeIntent::AtLeast(SqlValue::Int(1)))
        );
        assert_eq!(
            RangeIntent::from_bounds(None, Some(SqlValue::Int(9))),
            Ok(RangeIntent::AtMost(SqlValue::Int(9)))
        );
        assert_eq!(
            RangeIntent::from_bounds(Some(SqlValue::Int(1)), Some(SqlValue::Int(9))),
            Ok(RangeIntent::Between(SqlValue::Int(1), SqlValue::Int(9)))
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(IntentError::NoBound.to_string(), "no bound specified");
        assert_eq!(
            IntentError::Layout("%Q".into()).to_string(),
            "invalid time layout '%Q'"
        );
    }
}
