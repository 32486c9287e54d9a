//! Per-dataset query orchestration
//!
//! A [`Retriever`] is the static description of one dataset: its table,
//! default columns, joins, filter templates, page bands and coordinate
//! projection. It is built once at startup and shared across requests. All
//! per-request state (merged filters, collected joins, page plan) is built as
//! local values inside [`Retriever::build`] and [`Retriever::retrieve`].

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;
use utoipa::ToSchema;

use super::joins::{JoinSpec, plan_joins};
use super::options::{FilterKind, FilterName, FilterOption};
use super::pagination::{PageBands, PagePlan, plan_pages};
use super::predicate::{Predicate, compile};
use super::projection::Projection;
use super::query::SelectQuery;
use super::request::ClientRequest;
use super::response::WellsResponse;
use crate::data::{DataError, WellRepository};

#[derive(Debug, Clone)]
pub struct Retriever {
    name: String,
    table: String,
    columns: Vec<String>,
    joins: Vec<JoinSpec>,
    filters: BTreeMap<FilterName, FilterOption>,
    bands: PageBands,
    projection: Projection,
}

/// A predicate that made it into the WHERE clause
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedFilter {
    pub name: FilterName,
    pub predicate: Predicate,
}

/// Output of [`Retriever::build`]: the unbounded query and what shaped it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryPlan {
    pub query: SelectQuery,
    pub filters: Vec<AppliedFilter>,
}

impl Retriever {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            columns: Vec::new(),
            joins: Vec::new(),
            filters: BTreeMap::new(),
            bands: PageBands::default(),
            projection: Projection::lat_lng("latitude", "longitude"),
        }
    }

    pub fn columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn join(mut self, join: JoinSpec) -> Self {
        self.joins.push(join);
        self
    }

    pub fn filter(mut self, name: FilterName, option: FilterOption) -> Self {
        self.filters.insert(name, option);
        self
    }

    pub fn bands(mut self, bands: PageBands) -> Self {
        self.bands = bands;
        self
    }

    pub fn projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn option(&self, name: FilterName) -> Option<&FilterOption> {
        self.filters.get(&name)
    }

    pub fn filters(&self) -> impl Iterator<Item = (&FilterName, &FilterOption)> {
        self.filters.iter()
    }

    /// Merge the request onto the filter templates and assemble the query
    ///
    /// Filters are applied in [`FilterName`] order. Each active filter adds its
    /// predicate, then its mandatory constraints, then its joins.
    pub fn build(&self, request: &ClientRequest) -> QueryPlan {
        let mut query = SelectQuery::new(&self.table, self.columns.join(", "));
        let mut joins: Vec<&JoinSpec> = self.joins.iter().collect();
        let mut applied = Vec::new();

        for (name, template) in &self.filters {
            let option = match request.filters.get(name) {
                Some(value) => template.merge(value),
                None => continue,
            };
            let intent = match option.intent() {
                Ok(intent) => intent,
                Err(e) => {
                    tracing::trace!(dataset = %self.name, filter = %name, reason = %e, "Filter omitted");
                    continue;
                }
            };
            let Some(predicate) = compile(option.column(), &intent) else {
                tracing::trace!(dataset = %self.name, filter = %name, "Filter produced no predicate");
                continue;
            };

            query.filter(predicate.where_clause(), predicate.values.clone());
            for constraint in template.constraints() {
                query.filter(format!("({})", constraint.sql()), constraint.values());
            }
            joins.extend(template.joins());
            applied.push(AppliedFilter {
                name: *name,
                predicate,
            });
        }

        let plan = plan_joins(joins);
        tracing::trace!(dataset = %self.name, joins = plan.clauses.len(), "Joins planned");
        if let Some(select) = plan.select {
            query.select = select;
        }
        query.joins = plan.clauses;
        query.group_by = plan.group_by;
        query.order_by = plan.order_by;

        QueryPlan {
            query,
            filters: applied,
        }
    }

    /// Page layout for `total` rows; an empty result keeps the client's chunk
    pub fn plan_pages(&self, total: i64, chunk: Option<i64>) -> PagePlan {
        if total > 0 {
            plan_pages(total, &self.bands)
        } else {
            PagePlan {
                chunk: chunk.unwrap_or(0),
                page_count: 0,
            }
        }
    }

    /// Count, paginate, fetch and project one page of wells
    pub async fn retrieve(
        &self,
        repository: &dyn WellRepository,
        request: &ClientRequest,
    ) -> Result<WellsResponse, DataError> {
        let started = Instant::now();
        let plan = self.build(request);
        let page = request.page.filter(|p| *p > 0).unwrap_or(1);

        let total = match request.total.filter(|t| *t > 0) {
            Some(total) => total,
            None => repository.count(&plan.query).await?,
        };
        let pages = self.plan_pages(total, request.chunk);
        tracing::debug!(
            dataset = %self.name,
            total,
            chunk = pages.chunk,
            page,
            page_count = pages.page_count,
            "Page planned"
        );

        // An empty result still runs the data query, bounded to no rows
        let bounded = if total > 0 {
            plan.query.paginate(pages.chunk, pages.offset(page))
        } else {
            plan.query.paginate(0, 0)
        };
        let statement = bounded.to_literal_sql(repository.backend().dialect());
        tracing::debug!(dataset = %self.name, %statement, "Executing");

        let rows = repository.fetch(&bounded).await?;
        let data = self.projection.project_all(&rows);
        tracing::debug!(
            dataset = %self.name,
            rows = rows.len(),
            points = data.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Retrieved"
        );

        Ok(WellsResponse {
            statement,
            total,
            chunk: pages.chunk,
            page,
            page_count: pages.page_count,
            data,
        })
    }

    /// Filters and categories this dataset supports
    pub fn describe(&self) -> DatasetDescription {
        DatasetDescription {
            name: self.name.clone(),
            table: self.table.clone(),
            filters: self
                .filters
                .iter()
                .map(|(name, option)| FilterDescription {
                    name: *name,
                    kind: option.kind(),
                    column: option.column().to_string(),
                    categories: match option {
                        FilterOption::Categorical(o) => {
                            o.category_names().into_iter().map(String::from).collect()
                        }
                        FilterOption::Time(_) | FilterOption::Numeric(_) => Vec::new(),
                    },
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DatasetDescription {
    pub name: String,
    pub table: String,
    pub filters: Vec<FilterDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FilterDescription {
    #[schema(value_type = String)]
    pub name: FilterName,
    #[schema(value_type = String)]
    pub kind: FilterKind,
    pub column: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}
