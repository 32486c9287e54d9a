//! Repository trait for dataset backends
//!
//! Every jurisdiction lives in its own database. The query engine only ever
//! counts and fetches rows of an assembled [`SelectQuery`], so that is the
//! whole interface each backend (SQLite, PostgreSQL) implements.

use async_trait::async_trait;

use crate::data::error::DataError;
use crate::data::sql::Backend;
use crate::data::value::Record;
use crate::domain::wells::SelectQuery;

/// Read-only access to one dataset's tables
#[async_trait]
pub trait WellRepository: Send + Sync {
    /// Backend used to render placeholders and LIMIT clauses
    fn backend(&self) -> Backend;

    /// Number of rows the query would return without LIMIT/OFFSET
    async fn count(&self, query: &SelectQuery) -> Result<i64, DataError>;

    /// Execute the query and decode every row generically
    async fn fetch(&self, query: &SelectQuery) -> Result<Vec<Record>, DataError>;
}
