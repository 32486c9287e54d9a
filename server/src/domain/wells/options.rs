//! Filter options: per-column descriptors declared once per dataset
//!
//! A dataset maps each recognised [`FilterName`] to a [`FilterOption`]
//! template. Requests never mutate the template; they [`merge`](FilterOption::merge)
//! a [`FilterValue`] onto it, which keeps the column, constraints, joins and
//! layout and swaps in the client's bounds or category selection.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::intent::{IntentError, ListIntent, RangeIntent, RequestIntent};
use super::joins::JoinSpec;
use crate::data::SqlValue;

// ============================================================================
// Filter names
// ============================================================================

/// Recognised client filter names, in the order predicates are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterName {
    Completed,
    Abandoned,
    Status,
    Use,
    Colour,
    Taste,
    Odour,
    Rate,
    Depth,
    Bedrock,
}

/// Shape of the value a filter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Time,
    Numeric,
    Categorical,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Time => "time",
            FilterKind::Numeric => "numeric",
            FilterKind::Categorical => "categorical",
        }
    }
}

impl FilterName {
    pub const ALL: [FilterName; 10] = [
        FilterName::Completed,
        FilterName::Abandoned,
        FilterName::Status,
        FilterName::Use,
        FilterName::Colour,
        FilterName::Taste,
        FilterName::Odour,
        FilterName::Rate,
        FilterName::Depth,
        FilterName::Bedrock,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterName::Completed => "completed",
            FilterName::Abandoned => "abandoned",
            FilterName::Status => "status",
            FilterName::Use => "use",
            FilterName::Colour => "colour",
            FilterName::Taste => "taste",
            FilterName::Odour => "odour",
            FilterName::Rate => "rate",
            FilterName::Depth => "depth",
            FilterName::Bedrock => "bedrock",
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            FilterName::Completed | FilterName::Abandoned => FilterKind::Time,
            FilterName::Rate | FilterName::Depth | FilterName::Bedrock => FilterKind::Numeric,
            FilterName::Status
            | FilterName::Use
            | FilterName::Colour
            | FilterName::Taste
            | FilterName::Odour => FilterKind::Categorical,
        }
    }
}

impl fmt::Display for FilterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown filter '{}'", s))
    }
}

// ============================================================================
// Building blocks
// ============================================================================

/// Mandatory comparison applied alongside a filter's own predicate
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    Equals { column: String, value: SqlValue },
    OneOf { column: String, values: Vec<SqlValue> },
}

impl Constraint {
    pub fn equals(column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        Self::Equals {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn one_of<V: Into<SqlValue>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::OneOf {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// SQL fragment with `?` placeholders
    pub fn sql(&self) -> String {
        match self {
            Self::Equals { column, .. } => format!("{} = ?", column),
            Self::OneOf { column, values } => {
                format!("{} IN ({})", column, placeholders(values.len()))
            }
        }
    }

    pub fn values(&self) -> Vec<SqlValue> {
        match self {
            Self::Equals { value, .. } => vec![value.clone()],
            Self::OneOf { values, .. } => values.clone(),
        }
    }
}

/// `?, ?, ?` for `count` values
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// A symbolic category and the raw column values it stands for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub name: String,
    pub values: Vec<SqlValue>,
}

impl Category {
    pub fn new<V: Into<SqlValue>>(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Filter option variants
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TimeRangeOption {
    pub column: String,
    /// chrono `strftime` layout used to bind both bounds as text
    pub layout: String,
    pub constraints: Vec<Constraint>,
    pub joins: Vec<JoinSpec>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl TimeRangeOption {
    pub fn new(column: impl Into<String>, layout: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            layout: layout.into(),
            constraints: Vec::new(),
            joins: Vec::new(),
            start: None,
            end: None,
        }
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn join(mut self, join: JoinSpec) -> Self {
        self.joins.push(join);
        self
    }

    fn format(&self, instant: Option<NaiveDateTime>) -> Result<Option<SqlValue>, IntentError> {
        let Some(instant) = instant else {
            return Ok(None);
        };
        let mut text = String::new();
        write!(text, "{}", instant.format(&self.layout))
            .map_err(|_| IntentError::Layout(self.layout.clone()))?;
        Ok(Some(SqlValue::Time { at: instant, text }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericRangeOption {
    pub column: String,
    pub constraints: Vec<Constraint>,
    pub joins: Vec<JoinSpec>,
    /// 0 means unset
    pub start: i64,
    /// 0 means unset
    pub end: i64,
}

impl NumericRangeOption {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            constraints: Vec::new(),
            joins: Vec::new(),
            start: 0,
            end: 0,
        }
    }

    pub fn join(mut self, join: JoinSpec) -> Self {
        self.joins.push(join);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalListOption {
    pub column: String,
    pub constraints: Vec<Constraint>,
    pub joins: Vec<JoinSpec>,
    /// Declaration order is resolution order
    pub categories: Vec<Category>,
    pub multiple: bool,
    pub selected: Vec<String>,
}

impl CategoricalListOption {
    pub fn new(column: impl Into<String>, categories: Vec<Category>) -> Self {
        Self {
            column: column.into(),
            constraints: Vec::new(),
            joins: Vec::new(),
            categories,
            multiple: true,
            selected: Vec::new(),
        }
    }

    pub fn single(mut self) -> Self {
        self.multiple = false;
        self
    }

    pub fn join(mut self, join: JoinSpec) -> Self {
        self.joins.push(join);
        self
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Partition category values into the selected side and the rest
    ///
    /// Without `multiple`, only the first selected category in declaration
    /// order is included and every other category lands on the exclude side.
    fn resolve(&self) -> Result<ListIntent, IntentError> {
        if self.selected.is_empty() {
            return Err(IntentError::NoSelection);
        }
        let mut intent = ListIntent::default();
        let mut matched = false;
        for category in &self.categories {
            let chosen = self.selected.iter().any(|s| *s == category.name);
            if chosen && (self.multiple || !matched) {
                intent.include.extend(category.values.iter().cloned());
                matched = true;
            } else {
                intent.exclude.extend(category.values.iter().cloned());
            }
        }
        Ok(intent)
    }
}

// ============================================================================
// FilterOption
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum FilterOption {
    Time(TimeRangeOption),
    Numeric(NumericRangeOption),
    Categorical(CategoricalListOption),
}

/// Per-request values supplied by a client for one filter
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Time {
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    },
    Numeric {
        start: i64,
        end: i64,
    },
    Categories(Vec<String>),
}

impl FilterValue {
    /// A value of the given shape with nothing set
    pub fn empty(kind: FilterKind) -> Self {
        match kind {
            FilterKind::Time => FilterValue::Time {
                start: None,
                end: None,
            },
            FilterKind::Numeric => FilterValue::Numeric { start: 0, end: 0 },
            FilterKind::Categorical => FilterValue::Categories(Vec::new()),
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            FilterValue::Time { .. } => FilterKind::Time,
            FilterValue::Numeric { .. } => FilterKind::Numeric,
            FilterValue::Categories(_) => FilterKind::Categorical,
        }
    }
}

impl FilterOption {
    pub fn kind(&self) -> FilterKind {
        match self {
            FilterOption::Time(_) => FilterKind::Time,
            FilterOption::Numeric(_) => FilterKind::Numeric,
            FilterOption::Categorical(_) => FilterKind::Categorical,
        }
    }

    pub fn column(&self) -> &str {
        match self {
            FilterOption::Time(o) => &o.column,
            FilterOption::Numeric(o) => &o.column,
            FilterOption::Categorical(o) => &o.column,
        }
    }

    pub fn constraints(&self) -> &[Constraint] {
        match self {
            FilterOption::Time(o) => &o.constraints,
            FilterOption::Numeric(o) => &o.constraints,
            FilterOption::Categorical(o) => &o.constraints,
        }
    }

    pub fn joins(&self) -> &[JoinSpec] {
        match self {
            FilterOption::Time(o) => &o.joins,
            FilterOption::Numeric(o) => &o.joins,
            FilterOption::Categorical(o) => &o.joins,
        }
    }

    /// Copy of this template carrying the client's values
    ///
    /// A value of the wrong shape leaves the template's own values in place.
    pub fn merge(&self, value: &FilterValue) -> FilterOption {
        match (self, value) {
            (FilterOption::Time(base), FilterValue::Time { start, end }) => {
                FilterOption::Time(TimeRangeOption {
                    start: *start,
                    end: *end,
                    ..base.clone()
                })
            }
            (FilterOption::Numeric(base), FilterValue::Numeric { start, end }) => {
                FilterOption::Numeric(NumericRangeOption {
                    start: *start,
                    end: *end,
                    ..base.clone()
                })
            }
            (FilterOption::Categorical(base), FilterValue::Categories(selected)) => {
                FilterOption::Categorical(CategoricalListOption {
                    selected: selected.clone(),
                    ..base.clone()
                })
            }
            (base, value) => {
                tracing::warn!(
                    column = base.column(),
                    expected = ?base.kind(),
                    got = ?value.kind(),
                    "Ignoring filter value of the wrong shape"
                );
                base.clone()
            }
        }
    }

    /// Resolve the current values into a request intent
    pub fn intent(&self) -> Result<RequestIntent, IntentError> {
        match self {
            FilterOption::Time(o) => {
                RangeIntent::from_bounds(o.format(o.start)?, o.format(o.end)?).map(RequestIntent::Range)
            }
            FilterOption::Numeric(o) => {
                let bound = |v: i64| (v != 0).then_some(SqlValue::Int(v));
                RangeIntent::from_bounds(bound(o.start), bound(o.end)).map(RequestIntent::Range)
            }
            FilterOption::Categorical(o) => o.resolve().map(RequestIntent::List),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn status_option() -> CategoricalListOption {
        CategoricalListOption::new(
            "status",
            vec![
                Category::new("a", ["X", "Y"]),
                Category::new("b", ["Z"]),
                Category::new("c", ["W"]),
            ],
        )
    }

    #[test]
    fn test_filter_name_parse_and_kind() {
        assert_eq!("colour".parse::<FilterName>(), Ok(FilterName::Colour));
        assert!("color".parse::<FilterName>().is_err());
        assert_eq!(FilterName::Abandoned.kind(), FilterKind::Time);
        assert_eq!(FilterName::Bedrock.kind(), FilterKind::Numeric);
        assert_eq!(FilterName::Odour.kind(), FilterKind::Categorical);
        assert!(FilterName::Completed < FilterName::Bedrock);
    }

    #[test]
    fn test_constraint_sql() {
        let c = Constraint::equals("well_status_code", "ABANDONED");
        assert_eq!(c.sql(), "well_status_code = ?");
        assert_eq!(c.values(), vec![SqlValue::from("ABANDONED")]);

        let c = Constraint::one_of("FinalStatusOfWellL", [5, 6, 7]);
        assert_eq!(c.sql(), "FinalStatusOfWellL IN (?, ?, ?)");
        assert_eq!(c.values().len(), 3);
    }

    #[test]
    fn test_single_selection_excludes_every_other_category() {
        let mut option = status_option().single();
        option.selected = vec!["b".into(), "c".into()];
        let intent = option.resolve().unwrap();
        assert_eq!(intent.include, vec![SqlValue::from("Z")]);
        assert_eq!(
            intent.exclude,
            vec![SqlValue::from("X"), SqlValue::from("Y"), SqlValue::from("W")]
        );
    }

    #[test]
    fn test_multiple_selection_includes_all_chosen() {
        let mut option = status_option();
        option.selected = vec!["c".into(), "a".into()];
        let intent = option.resolve().unwrap();
        assert_eq!(
            intent.include,
            vec![SqlValue::from("X"), SqlValue::from("Y"), SqlValue::from("W")]
        );
        assert_eq!(intent.exclude, vec![SqlValue::from("Z")]);
    }

    #[test]
    fn test_empty_selection_is_inactive() {
        let option = FilterOption::Categorical(status_option());
        assert_eq!(option.intent(), Err(IntentError::NoSelection));
    }

    #[test]
    fn test_numeric_bounds() {
        let base = FilterOption::Numeric(NumericRangeOption::new("wyRate"));
        let merged = base.merge(&FilterValue::Numeric { start: 5, end: 0 });
        assert_eq!(
            merged.intent(),
            Ok(RequestIntent::Range(RangeIntent::AtLeast(SqlValue::Int(5))))
        );
        let merged = base.merge(&FilterValue::Numeric { start: 0, end: 20 });
        assert_eq!(
            merged.intent(),
            Ok(RequestIntent::Range(RangeIntent::AtMost(SqlValue::Int(20))))
        );
        assert_eq!(base.intent(), Err(IntentError::NoBound));
    }

    #[test]
    fn test_time_bounds_use_layout() {
        let base = FilterOption::Time(TimeRangeOption::new(
            "Drilling_End_Date",
            "%Y-%m-%d %-I:%M:00.000 %p",
        ));
        let merged = base.merge(&FilterValue::Time {
            start: Some(at(2001, 3, 4, 0)),
            end: Some(at(2001, 3, 4, 15)),
        });
        assert_eq!(
            merged.intent(),
            Ok(RequestIntent::Range(RangeIntent::Between(
                SqlValue::Time {
                    at: at(2001, 3, 4, 0),
                    text: "2001-03-04 12:00:00.000 AM".into(),
                },
                SqlValue::Time {
                    at: at(2001, 3, 4, 15),
                    text: "2001-03-04 3:00:00.000 PM".into(),
                },
            )))
        );

        let dotted = FilterOption::Time(TimeRangeOption::new("completed", "%Y.%m.%d"));
        let merged = dotted.merge(&FilterValue::Time {
            start: None,
            end: Some(at(1999, 12, 31, 0)),
        });
        assert_eq!(
            merged.intent(),
            Ok(RequestIntent::Range(RangeIntent::AtMost(SqlValue::Time {
                at: at(1999, 12, 31, 0),
                text: "1999.12.31".into(),
            })))
        );
    }

    #[test]
    fn test_merge_keeps_template() {
        let template = FilterOption::Time(
            TimeRangeOption::new("construction_end_date", "%Y-%m-%d")
                .constraint(Constraint::equals("well_status_code", "ABANDONED"))
                .join(JoinSpec::inner(("well", "id"), ("lithology", "id"))),
        );
        let merged = template.merge(&FilterValue::empty(FilterKind::Time));
        assert_eq!(merged, template);

        let merged = template.merge(&FilterValue::Time {
            start: Some(at(2010, 1, 1, 0)),
            end: None,
        });
        assert_eq!(merged.column(), "construction_end_date");
        assert_eq!(merged.constraints(), template.constraints());
        assert_eq!(merged.joins(), template.joins());
    }

    fn own_value(option: &FilterOption) -> FilterValue {
        match option {
            FilterOption::Time(o) => FilterValue::Time {
                start: o.start,
                end: o.end,
            },
            FilterOption::Numeric(o) => FilterValue::Numeric {
                start: o.start,
                end: o.end,
            },
            FilterOption::Categorical(o) => FilterValue::Categories(o.selected.clone()),
        }
    }

    #[test]
    fn test_merge_with_own_values_is_identity() {
        let registry = crate::domain::DatasetRegistry::standard();
        let mut kinds = Vec::new();
        for retriever in registry.iter() {
            for (name, option) in retriever.filters() {
                let merged = option.merge(&own_value(option));
                assert_eq!(&merged, option, "{} {}", retriever.name(), name);
                kinds.push(option.kind());
            }
        }
        assert!(kinds.contains(&FilterKind::Time));
        assert!(kinds.contains(&FilterKind::Numeric));
        assert!(kinds.contains(&FilterKind::Categorical));

        let numeric = FilterOption::Numeric(NumericRangeOption {
            start: 5,
            end: 90,
            ..NumericRangeOption::new("wyRate")
        });
        assert_eq!(numeric.merge(&own_value(&numeric)), numeric);

        let time = FilterOption::Time(TimeRangeOption {
            start: Some(at(2001, 1, 1, 0)),
            end: Some(at(2005, 1, 1, 0)),
            ..TimeRangeOption::new("completed", "%Y.%m.%d")
        });
        assert_eq!(time.merge(&own_value(&time)), time);
    }

    #[test]
    fn test_merge_keeps_single_selection_and_category_order() {
        let mut list = status_option().single();
        list.selected = vec!["c".into()];
        let option = FilterOption::Categorical(list);
        assert_eq!(option.merge(&own_value(&option)), option);

        let FilterOption::Categorical(merged) =
            option.merge(&FilterValue::Categories(vec!["a".into(), "b".into()]))
        else {
            panic!("categorical template merged into another kind");
        };
        assert!(!merged.multiple);
        assert_eq!(merged.category_names(), vec!["a", "b", "c"]);
        assert_eq!(merged.selected, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_merge_ignores_wrong_shape() {
        let template = FilterOption::Categorical(status_option());
        let merged = template.merge(&FilterValue::Numeric { start: 1, end: 2 });
        assert_eq!(merged, template);
    }
}
