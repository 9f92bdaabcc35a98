//! Structured error types for studentctl-core.
//!
//! Uses `thiserror` so the CLI can tell connection failures from statement
//! failures when it reports them. The binary wraps everything else in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by [`crate::StudentStore`] operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Connection acquisition failed; no statement was attempted.
    #[error("could not connect to PostgreSQL: {0}")]
    Connect(#[source] sqlx::Error),

    /// A statement, commit or rollback failed.
    #[error("{0}")]
    Query(#[from] sqlx::Error),

    /// The unique index on `students.number` rejected the write.
    #[error("a student with number '{0}' already exists")]
    DuplicateNumber(String),

    /// A row came back in a shape the store cannot read.
    #[error("unexpected students table layout: {reason}")]
    Schema { reason: String },
}

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Postgres SQLSTATE for `unique_violation`.
pub(crate) const UNIQUE_VIOLATION: &str = "23505";

impl StoreError {
    /// Classify a statement error, lifting unique violations on `number`.
    pub(crate) fn from_write(err: sqlx::Error, number: &str) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return Self::DuplicateNumber(number.to_owned());
            }
        }
        Self::Query(err)
    }

    /// Classify a read error, lifting decode failures to [`StoreError::Schema`].
    pub(crate) fn from_read(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { index, source } => {
                Self::schema(format!("column {index}: {source}"))
            }
            sqlx::Error::ColumnNotFound(column) => {
                Self::schema(format!("missing column '{column}'"))
            }
            other => Self::Query(other),
        }
    }

    /// Create a schema error
    pub fn schema(reason: impl Into<String>) -> Self {
        Self::Schema {
            reason: reason.into(),
        }
    }

    /// True when the failure happened before any statement ran.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Connect(_))
    }
}

/// Errors raised while loading or validating [`crate::DatabaseConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid database URL: {0}")]
    Url(#[source] sqlx::Error),

    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
