//! Wells query engine
//!
//! - `options` - Filter templates declared per dataset
//! - `intent` - Value-bound meaning of a filter
//! - `predicate` - Intent to SQL comparison compiler
//! - `joins` - Join declarations and the per-request registry
//! - `pagination` - Adaptive page sizing
//! - `query` - SELECT assembly and dialect rendering
//! - `projection` - Row to `[lat, lng]` conversion
//! - `request` - Client parameter decoding
//! - `retriever` - Per-dataset orchestration

pub mod intent;
pub mod joins;
pub mod options;
pub mod pagination;
pub mod predicate;
pub mod projection;
pub mod query;
pub mod request;
pub mod response;
pub mod retriever;

pub use intent::{IntentError, ListIntent, RangeIntent, RequestIntent};
pub use joins::{JoinKind, JoinPlan, JoinSpec, JoinTable, plan_joins};
pub use options::{
    CategoricalListOption, Category, Constraint, FilterKind, FilterName, FilterOption,
    FilterValue, NumericRangeOption, TimeRangeOption,
};
pub use pagination::{PageBands, PagePlan, plan_pages};
pub use predicate::{Comparison, NullClause, Predicate, compile};
pub use projection::{Projection, UtmZone};
pub use query::SelectQuery;
pub use request::{ClientRequest, DecodeError};
pub use response::WellsResponse;
pub use retriever::{AppliedFilter, DatasetDescription, FilterDescription, QueryPlan, Retriever};
