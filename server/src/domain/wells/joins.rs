//! Join declarations and the per-request join registry
//!
//! Datasets and filters both declare the lookup tables they need. For one
//! request every contributed join is collected, duplicates collapse by
//! correlation name, and the survivors are emitted in a stable order. Only the
//! first join in that order drives the projection, grouping and ordering of
//! the final statement.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    Plain,
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinKind::Plain => "JOIN",
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One side of a join: a table and the key column used in the `ON` clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinTable {
    pub name: String,
    pub key: String,
}

impl JoinTable {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

/// Declarative join requirement
///
/// `group_by`, `order_by` and `select` are only honoured when this join ends
/// up first in the emitted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinSpec {
    pub kind: JoinKind,
    pub left: JoinTable,
    pub right: JoinTable,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,
}

impl JoinSpec {
    pub fn new(kind: JoinKind, left: JoinTable, right: JoinTable) -> Self {
        Self {
            kind,
            left,
            right,
            group_by: None,
            order_by: None,
            select: None,
        }
    }

    /// `INNER JOIN right ON right.key = left.key`
    pub fn inner(left: (&str, &str), right: (&str, &str)) -> Self {
        Self::new(
            JoinKind::Inner,
            JoinTable::new(left.0, left.1),
            JoinTable::new(right.0, right.1),
        )
    }

    pub fn group_by(mut self, clause: impl Into<String>) -> Self {
        self.group_by = Some(clause.into());
        self
    }

    pub fn order_by(mut self, clause: impl Into<String>) -> Self {
        self.order_by = Some(clause.into());
        self
    }

    pub fn select(mut self, clause: impl Into<String>) -> Self {
        self.select = Some(clause.into());
        self
    }

    /// Deterministic name built from the four join identifiers
    ///
    /// `wells`/`Well_ID` joined to `reports`/`Well_ID` gives
    /// `wellsWell_IDReportsWell_ID`.
    pub fn correlation_name(&self) -> String {
        format!(
            "{}{}{}{}",
            self.left.name.to_lowercase(),
            capitalise(&self.left.key),
            capitalise(&self.right.name),
            capitalise(&self.right.key),
        )
    }

    /// Render the join clause, aliasing the right table as `name` when it differs
    pub fn statement(&self, name: &str) -> String {
        let target = if name.is_empty() {
            self.right.name.as_str()
        } else {
            name
        };
        let alias = if !name.is_empty() && name != self.right.name {
            format!(" AS {}", name)
        } else {
            String::new()
        };
        format!(
            "{} {}{} ON {}.{} = {}.{}",
            self.kind,
            self.right.name,
            alias,
            target,
            self.right.key,
            self.left.name,
            self.left.key
        )
    }
}

fn capitalise(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Joins resolved for a single request, in emission order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinPlan {
    pub clauses: Vec<String>,
    pub select: Option<String>,
    pub group_by: Option<String>,
    pub order_by: Option<String>,
}

impl JoinPlan {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Deduplicate and order the joins contributed to one request
///
/// The first join against a right-hand table registers under
/// `"{position}*{table}"`. A later join against the same table with a
/// different correlation name registers under `"{position}*{correlation}"` and
/// is aliased by it. Any join whose correlation name is already registered is
/// dropped. Keys sort as strings, and the first key becomes the primary join.
pub fn plan_joins<'a, I>(joins: I) -> JoinPlan
where
    I: IntoIterator<Item = &'a JoinSpec>,
{
    let mut by_table: HashMap<&str, String> = HashMap::new();
    let mut registered: HashSet<String> = HashSet::new();
    let mut keyed: BTreeMap<String, (String, &JoinSpec)> = BTreeMap::new();

    for (position, join) in joins.into_iter().enumerate() {
        let correlation = join.correlation_name();
        if registered.contains(&correlation) {
            continue;
        }
        match by_table.get(join.right.name.as_str()) {
            None => {
                by_table.insert(&join.right.name, correlation.clone());
                keyed.insert(
                    format!("{}*{}", position, join.right.name),
                    (join.right.name.clone(), join),
                );
            }
            Some(first) if *first != correlation => {
                keyed.insert(
                    format!("{}*{}", position, correlation),
                    (correlation.clone(), join),
                );
            }
            Some(_) => {}
        }
        registered.insert(correlation);
    }

    let mut plan = JoinPlan::default();
    for (index, (name, join)) in keyed.values().enumerate() {
        plan.clauses.push(join.statement(name));
        if index == 0 {
            plan.select = join.select.clone().filter(|s| !s.trim().is_empty());
            plan.group_by = join.group_by.clone().filter(|s| !s.trim().is_empty());
            plan.order_by = join
                .order_by
                .as_ref()
                .filter(|s| !s.trim().is_empty())
                .map(|s| format!("{} DESC", s));
        }
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reports_join() -> JoinSpec {
        JoinSpec::inner(("Wells", "Well_ID"), ("Well_Reports", "Well_ID"))
            .group_by("Wells.Well_ID")
            .order_by("MAX(Latitude)")
            .select("MAX(Latitude) as Latitude, MAX(Longitude) as Longitude")
    }

    #[test]
    fn test_correlation_name() {
        let join = JoinSpec::inner(("lname", "lkey"), ("rname", "rkey"));
        assert_eq!(join.correlation_name(), "lnameLkeyRnameRkey");

        let join = JoinSpec::inner(("Wells", "GIC_Well_ID"), ("Lithologies", "GIC_Well_ID"));
        assert_eq!(join.correlation_name(), "wellsGIC_Well_IDLithologiesGIC_Well_ID");
    }

    #[test]
    fn test_statement_without_alias() {
        let join = JoinSpec::inner(("lname", "lkey"), ("rname", "rkey"));
        assert_eq!(
            join.statement("rname"),
            "INNER JOIN rname ON rname.rkey = lname.lkey"
        );
        assert_eq!(join.statement(""), "INNER JOIN rname ON rname.rkey = lname.lkey");
    }

    #[test]
    fn test_statement_with_alias() {
        let join = JoinSpec::new(
            JoinKind::Left,
            JoinTable::new("lname", "lkey"),
            JoinTable::new("rname", "rkey"),
        );
        assert_eq!(
            join.statement("colname"),
            "LEFT JOIN rname AS colname ON colname.rkey = lname.lkey"
        );
    }

    #[test]
    fn test_identical_joins_collapse() {
        let joins = [reports_join(), reports_join(), reports_join()];
        let plan = plan_joins(&joins);
        assert_eq!(
            plan.clauses,
            vec!["INNER JOIN Well_Reports ON Well_Reports.Well_ID = Wells.Well_ID"]
        );
        assert_eq!(plan.group_by.as_deref(), Some("Wells.Well_ID"));
        assert_eq!(plan.order_by.as_deref(), Some("MAX(Latitude) DESC"));
    }

    #[test]
    fn test_same_table_different_correlation_is_kept() {
        let first = JoinSpec::inner(("a", "id"), ("lookup", "id")).select("a.x, a.y");
        let second = JoinSpec::inner(("b", "ref"), ("lookup", "id")).select("ignored");
        let plan = plan_joins(&[first, second]);
        assert_eq!(
            plan.clauses,
            vec![
                "INNER JOIN lookup ON lookup.id = a.id",
                "INNER JOIN lookup AS bRefLookupId ON bRefLookupId.id = b.ref",
            ]
        );
        assert_eq!(plan.select.as_deref(), Some("a.x, a.y"));
        assert!(plan.group_by.is_none());
    }

    #[test]
    fn test_keys_sort_as_strings() {
        // "10*t10" sorts before "2*t2"
        let mut joins: Vec<JoinSpec> = (0..11)
            .map(|i| JoinSpec::inner(("base", "id"), (&format!("t{}", i), "id")))
            .collect();
        joins[10] = joins[10].clone().select("primary");
        let plan = plan_joins(&joins);
        assert_eq!(plan.clauses.len(), 11);
        assert_eq!(plan.clauses[0], "INNER JOIN t0 ON t0.id = base.id");
        assert_eq!(plan.clauses[1], "INNER JOIN t1 ON t1.id = base.id");
        assert_eq!(plan.clauses[2], "INNER JOIN t10 ON t10.id = base.id");
        assert!(plan.select.is_none());
    }

    #[test]
    fn test_empty_projection_falls_through() {
        let join = JoinSpec::inner(("a", "id"), ("b", "id")).select("  ");
        let plan = plan_joins(&[join]);
        assert!(plan.select.is_none());
        assert!(!plan.is_empty());
        assert!(plan_joins(std::iter::empty()).is_empty());
    }
}
