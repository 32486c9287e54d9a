//! Data storage layer
//!
//! Provides the per-dataset stores the query engine reads from:
//! - `sqlite` - Read-only SQLite files (default, embedded)
//! - `postgres` - PostgreSQL databases
//! - `sql` - Dialect abstraction for placeholders and LIMIT clauses
//! - `value` - Dynamically typed parameters and rows
//! - `traits` - Repository trait implemented by every backend
//! - `error` - Unified error type for all backends
//!
//! Each jurisdiction gets its own [`WellStore`], chosen by the scheme of its
//! connection URL.

pub mod error;
pub mod postgres;
pub mod sql;
pub mod sqlite;
pub mod traits;
pub mod value;

pub use error::DataError;
pub use postgres::PostgresService;
pub use sqlite::SqliteService;
pub use traits::WellRepository;
pub use value::{Record, SqlValue};

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::config::DatabaseConfig;
use sql::Backend;

/// Dataset store enum
///
/// Wraps the underlying backend-specific service (SQLite or PostgreSQL).
/// Services are stored as Arc so handlers can hold them across awaits.
#[derive(Clone)]
pub enum WellStore {
    Sqlite(Arc<SqliteService>),
    Postgres(Arc<PostgresService>),
}

impl WellStore {
    /// Open the store the URL scheme selects
    pub fn open(url: &str, config: &DatabaseConfig) -> Result<Self, DataError> {
        match Backend::from_url(url) {
            Some(Backend::Sqlite) => Ok(Self::Sqlite(Arc::new(SqliteService::connect(
                url, config,
            )?))),
            Some(Backend::Postgres) => Ok(Self::Postgres(Arc::new(PostgresService::connect(
                url, config,
            )?))),
            None => Err(DataError::UnsupportedUrl(url.to_string())),
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            Self::Sqlite(_) => Backend::Sqlite,
            Self::Postgres(_) => Backend::Postgres,
        }
    }

    /// Get the repository trait object for queries
    pub fn repository(&self) -> &dyn WellRepository {
        match self {
            Self::Sqlite(s) => s.as_ref(),
            Self::Postgres(p) => p.as_ref(),
        }
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        match self {
            Self::Sqlite(s) => s.close().await,
            Self::Postgres(p) => p.close().await,
        }
    }
}

/// One store per dataset slug
#[derive(Clone, Default)]
pub struct WellStores {
    stores: BTreeMap<String, WellStore>,
}

impl WellStores {
    /// Open a store for every `(slug, url)` pair
    pub fn open<I, S, U>(urls: I, config: &DatabaseConfig) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = (S, U)>,
        S: Into<String>,
        U: AsRef<str>,
    {
        let mut stores = BTreeMap::new();
        for (slug, url) in urls {
            let slug = slug.into();
            let store = WellStore::open(url.as_ref(), config)?;
            tracing::debug!(dataset = %slug, backend = %store.backend(), "Dataset store opened");
            stores.insert(slug, store);
        }
        Ok(Self { stores })
    }

    pub fn insert(&mut self, slug: impl Into<String>, store: WellStore) {
        self.stores.insert(slug.into(), store);
    }

    pub fn get(&self, slug: &str) -> Option<&WellStore> {
        self.stores.get(slug)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WellStore)> {
        self.stores.iter().map(|(slug, store)| (slug.as_str(), store))
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Close every pool
    pub async fn close_all(&self) {
        for store in self.stores.values() {
            store.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_unknown_scheme() {
        let err = WellStore::open("mysql://localhost/wells", &DatabaseConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, DataError::UnsupportedUrl(_)));
    }

    #[tokio::test]
    async fn test_open_all_picks_backend_by_scheme() {
        let stores = WellStores::open(
            [
                ("alberta", "sqlite://alberta.db"),
                ("ontario", "postgres://wells@localhost/ontario"),
            ],
            &DatabaseConfig::default(),
        )
        .unwrap();
        assert_eq!(stores.len(), 2);
        assert_eq!(stores.get("alberta").unwrap().backend(), Backend::Sqlite);
        assert_eq!(stores.get("ontario").unwrap().backend(), Backend::Postgres);
        assert!(stores.get("nova-scotia").is_none());
        assert_eq!(
            stores.get("ontario").unwrap().repository().backend(),
            Backend::Postgres
        );
    }

    #[tokio::test]
    async fn test_insert_wraps_existing_service() {
        let mut stores = WellStores::default();
        assert!(stores.is_empty());
        let service = SqliteService::in_memory().await.unwrap();
        stores.insert("test", WellStore::Sqlite(Arc::new(service)));
        assert_eq!(stores.get("test").unwrap().backend(), Backend::Sqlite);
        stores.close_all().await;
    }
}
