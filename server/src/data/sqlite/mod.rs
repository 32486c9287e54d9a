//! SQLite dataset store
//!
//! Each jurisdiction can ship as a single read-only SQLite file. The pool is
//! opened lazily so the server starts even when a dataset file is missing;
//! the first query against it reports the connection error instead.

pub use sqlx::SqlitePool;

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, ConnectOptions, Row, Sqlite};
use tracing::log::LevelFilter;

use crate::core::config::DatabaseConfig;
use crate::data::error::DataError;
use crate::data::sql::Backend;
use crate::data::traits::WellRepository;
use crate::data::value::{Record, SqlValue};
use crate::domain::wells::SelectQuery;

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// SQLite-backed dataset
pub struct SqliteService {
    pool: SqlitePool,
}

impl SqliteService {
    /// Open a lazy, read-only pool for `url` (`sqlite://path/to/file.db`)
    pub fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, DataError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| DataError::Config(format!("Invalid SQLite URL {}: {}", url, e)))?
            .read_only(true)
            .busy_timeout(Duration::from_secs(config.statement_timeout_secs))
            .log_statements(LevelFilter::Trace);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy_with(options);

        tracing::debug!(url, max_connections = config.max_connections, "SqliteService opened");
        Ok(Self { pool })
    }

    /// Single-connection in-memory database for tests
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, DataError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(DataError::from_sqlite)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("SQLite pool closed");
    }
}

fn bind_all<'q>(mut query: SqliteQuery<'q>, values: &[SqlValue]) -> SqliteQuery<'q> {
    for value in values {
        query = match value {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Float(f) => query.bind(*f),
            SqlValue::Text(s) | SqlValue::Time { text: s, .. } => query.bind(s.clone()),
        };
    }
    query
}

/// Decode a row by probing the runtime storage class of each value
fn decode_row(row: &SqliteRow) -> Record {
    let mut record = Record::new();
    for (index, column) in row.columns().iter().enumerate() {
        let value = if let Ok(Some(i)) = row.try_get::<Option<i64>, _>(index) {
            SqlValue::Int(i)
        } else if let Ok(Some(f)) = row.try_get::<Option<f64>, _>(index) {
            SqlValue::Float(f)
        } else if let Ok(Some(s)) = row.try_get::<Option<String>, _>(index) {
            SqlValue::Text(s)
        } else {
            SqlValue::Null
        };
        record.push(column.name(), value);
    }
    record
}

#[async_trait]
impl WellRepository for SqliteService {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    async fn count(&self, query: &SelectQuery) -> Result<i64, DataError> {
        let sql = query.to_count_sql(Backend::Sqlite.dialect());
        let params = query.params();
        let row = bind_all(sqlx::query(&sql), &params)
            .fetch_one(&self.pool)
            .await
            .map_err(DataError::from_sqlite)?;
        row.try_get::<i64, _>(0).map_err(DataError::from_sqlite)
    }

    async fn fetch(&self, query: &SelectQuery) -> Result<Vec<Record>, DataError> {
        let sql = query.to_sql(Backend::Sqlite.dialect());
        let params = query.params();
        let rows = bind_all(sqlx::query(&sql), &params)
            .fetch_all(&self.pool)
            .await
            .map_err(DataError::from_sqlite)?;
        Ok(rows.iter().map(decode_row).collect())
    }
}
