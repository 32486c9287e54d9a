//! Client request decoding
//!
//! Query strings and form bodies arrive as ordered `(key, value)` pairs.
//! Keys name a filter (`rate`, `completed`), a filter bound (`rate.start`),
//! or a pagination hint (`page`, `total`, `chunk`).

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use super::options::{FilterKind, FilterName, FilterOption, FilterValue};
use super::retriever::Retriever;

/// Decoded per-request values for one dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientRequest {
    pub filters: BTreeMap<FilterName, FilterValue>,
    /// 1-based; absent or 0 means the first page
    pub page: Option<i64>,
    /// Known row count, skips the count query when non-zero
    pub total: Option<i64>,
    pub chunk: Option<i64>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unknown category '{category}' for filter '{filter}' in dataset '{dataset}'")]
    UnknownCategory {
        dataset: String,
        filter: FilterName,
        category: String,
    },

    #[error("Filter '{filter}' is not supported by dataset '{dataset}'")]
    UnsupportedFilter { dataset: String, filter: FilterName },

    #[error("Unknown parameter '{0}'")]
    UnknownParameter(String),
}

impl DecodeError {
    /// Machine-readable code for the error envelope
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::InvalidValue { .. } => "INVALID_FILTER_VALUE",
            DecodeError::UnknownCategory { .. } => "UNKNOWN_CATEGORY",
            DecodeError::UnsupportedFilter { .. } => "UNSUPPORTED_FILTER",
            DecodeError::UnknownParameter(_) => "UNKNOWN_PARAMETER",
        }
    }

    fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        DecodeError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Both,
    Start,
    End,
}

impl ClientRequest {
    /// Decode raw pairs against the filters `retriever` supports
    pub fn decode<K, V>(pairs: &[(K, V)], retriever: &Retriever) -> Result<Self, DecodeError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = ClientRequest::default();
        for (key, value) in pairs {
            request.apply(key.as_ref(), value.as_ref().trim(), retriever)?;
        }
        Ok(request)
    }

    fn apply(&mut self, key: &str, value: &str, retriever: &Retriever) -> Result<(), DecodeError> {
        match key {
            "page" => {
                self.page = Some(parse_count(key, value)?);
                return Ok(());
            }
            "total" => {
                self.total = Some(parse_count(key, value)?);
                return Ok(());
            }
            "chunk" => {
                self.chunk = Some(parse_count(key, value)?);
                return Ok(());
            }
            _ => {}
        }

        let (base, bound) = match key.rsplit_once('.') {
            Some((base, "start")) => (base, Bound::Start),
            Some((base, "end")) => (base, Bound::End),
            Some(_) => return Err(DecodeError::UnknownParameter(key.to_string())),
            None => (key, Bound::Both),
        };
        let name: FilterName = base
            .parse()
            .map_err(|_| DecodeError::UnknownParameter(key.to_string()))?;
        let option = retriever
            .option(name)
            .ok_or_else(|| DecodeError::UnsupportedFilter {
                dataset: retriever.name().to_string(),
                filter: name,
            })?;
        if name.kind() == FilterKind::Categorical && bound != Bound::Both {
            return Err(DecodeError::UnknownParameter(key.to_string()));
        }

        let entry = self
            .filters
            .entry(name)
            .or_insert_with(|| FilterValue::empty(name.kind()));

        match entry {
            FilterValue::Time { start, end } => {
                let (low, high) = split_bounds(value, "..", bound);
                if let Some(text) = low {
                    *start = parse_instant(key, text)?;
                }
                if let Some(text) = high {
                    *end = parse_instant(key, text)?;
                }
            }
            FilterValue::Numeric { start, end } => {
                let (low, high) = split_bounds(value, ":", bound);
                if let Some(text) = low {
                    *start = parse_number(key, text)?;
                }
                if let Some(text) = high {
                    *end = parse_number(key, text)?;
                }
            }
            FilterValue::Categories(selected) => {
                let FilterOption::Categorical(option) = option else {
                    return Err(DecodeError::UnsupportedFilter {
                        dataset: retriever.name().to_string(),
                        filter: name,
                    });
                };
                for category in value.split(',').map(str::trim).filter(|c| !c.is_empty()) {
                    if !option.has_category(category) {
                        return Err(DecodeError::UnknownCategory {
                            dataset: retriever.name().to_string(),
                            filter: name,
                            category: category.to_string(),
                        });
                    }
                    selected.push(category.to_string());
                }
            }
        }
        Ok(())
    }
}

/// Which sides of a range a value sets; `None` leaves that side alone
fn split_bounds<'a>(value: &'a str, separator: &str, bound: Bound) -> (Option<&'a str>, Option<&'a str>) {
    match bound {
        Bound::Start => (Some(value), None),
        Bound::End => (None, Some(value)),
        Bound::Both => match value.split_once(separator) {
            Some((low, high)) => (Some(low.trim()), Some(high.trim())),
            None => (Some(value), None),
        },
    }
}

fn parse_count(key: &str, value: &str) -> Result<i64, DecodeError> {
    value
        .parse::<u32>()
        .map(i64::from)
        .map_err(|_| DecodeError::invalid(key, value, "expected a non-negative integer"))
}

fn parse_number(key: &str, value: &str) -> Result<i64, DecodeError> {
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse::<i64>()
        .map_err(|_| DecodeError::invalid(key, value, "expected an integer"))
}

/// `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` or RFC 3339; empty means unset
fn parse_instant(key: &str, value: &str) -> Result<Option<NaiveDateTime>, DecodeError> {
    if value.is_empty() {
        return Ok(None);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(instant.naive_local()));
    }
    if let Ok(instant) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Some(instant));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| Some(date.and_time(NaiveTime::MIN)))
        .map_err(|_| DecodeError::invalid(key, value, "expected a date such as 2004-06-30"))
}
