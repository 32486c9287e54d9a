//! Unified error type for data layer
//!
//! This module provides a unified error type that can represent errors from
//! every dataset backend (SQLite, PostgreSQL).

use thiserror::Error;

/// Unified error type for data layer operations
///
/// This error type wraps backend-specific errors while preserving context
/// about which backend generated the error.
#[derive(Error, Debug)]
pub enum DataError {
    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(sqlx::Error),

    /// PostgreSQL database error
    #[error("PostgreSQL error: {0}")]
    Postgres(sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection URL names a scheme no backend handles
    #[error("Unsupported database URL scheme: {0}")]
    UnsupportedUrl(String),

    /// Query timeout
    #[error("Query timeout after {timeout_secs}s on {backend}")]
    Timeout {
        backend: &'static str,
        timeout_secs: u64,
    },

    /// Connection pool exhausted
    #[error("Connection pool exhausted on {backend}")]
    PoolExhausted { backend: &'static str },
}

impl DataError {
    /// Create a SQLite error with preserved context
    pub fn from_sqlite(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut => Self::pool_exhausted("sqlite"),
            other => Self::Sqlite(other),
        }
    }

    /// Create a PostgreSQL error with preserved context
    ///
    /// `57014` is `query_canceled`, raised when `statement_timeout` fires.
    pub fn from_postgres(e: sqlx::Error, statement_timeout_secs: u64) -> Self {
        if let sqlx::Error::Database(ref db) = e
            && db.code().as_deref() == Some("57014")
        {
            return Self::timeout("postgres", statement_timeout_secs);
        }
        match e {
            sqlx::Error::PoolTimedOut => Self::pool_exhausted("postgres"),
            other => Self::Postgres(other),
        }
    }

    /// Create a timeout error
    pub fn timeout(backend: &'static str, timeout_secs: u64) -> Self {
        Self::Timeout {
            backend,
            timeout_secs,
        }
    }

    /// Create a pool exhausted error
    pub fn pool_exhausted(backend: &'static str) -> Self {
        Self::PoolExhausted { backend }
    }

    /// Check if this is a connection-related error that might be transient
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::PoolExhausted { .. } => true,
            Self::Sqlite(e) | Self::Postgres(e) => {
                matches!(
                    e,
                    sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
                )
            }
            Self::Config(_) | Self::UnsupportedUrl(_) => false,
        }
    }

    /// Get the backend name that generated this error
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Postgres(_) => "postgres",
            Self::Timeout { backend, .. } => backend,
            Self::PoolExhausted { backend } => backend,
            Self::Config(_) | Self::UnsupportedUrl(_) => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_error_display() {
        let err = DataError::timeout("postgres", 30);
        assert_eq!(err.to_string(), "Query timeout after 30s on postgres");
    }

    #[test]
    fn test_pool_exhausted_error_display() {
        let err = DataError::pool_exhausted("sqlite");
        assert_eq!(err.to_string(), "Connection pool exhausted on sqlite");
    }

    #[test]
    fn test_unsupported_url_display() {
        let err = DataError::UnsupportedUrl("sqlserver".into());
        assert_eq!(err.to_string(), "Unsupported database URL scheme: sqlserver");
    }

    #[test]
    fn test_pool_timeout_maps_to_exhausted() {
        let err = DataError::from_sqlite(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DataError::PoolExhausted { backend: "sqlite" }));
        let err = DataError::from_postgres(sqlx::Error::PoolTimedOut, 30);
        assert!(matches!(err, DataError::PoolExhausted { backend: "postgres" }));
    }

    #[test]
    fn test_backend_method() {
        assert_eq!(DataError::timeout("postgres", 30).backend(), "postgres");
        assert_eq!(DataError::from_sqlite(sqlx::Error::RowNotFound).backend(), "sqlite");
        assert_eq!(DataError::Config("x".into()).backend(), "unknown");
    }

    #[test]
    fn test_is_transient() {
        assert!(DataError::timeout("postgres", 30).is_transient());
        assert!(DataError::pool_exhausted("sqlite").is_transient());
        assert!(DataError::Sqlite(sqlx::Error::PoolClosed).is_transient());
        assert!(!DataError::Sqlite(sqlx::Error::RowNotFound).is_transient());
        assert!(!DataError::Config("bad config".into()).is_transient());
    }
}
