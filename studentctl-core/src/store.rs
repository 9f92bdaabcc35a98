//! Student records accessor
//!
//! Each method opens its own connection, runs its statements and closes the
//! connection before returning, whether the statements succeeded or not.

use sqlx::postgres::PgConnectOptions;
use tracing::{info, instrument};

use crate::config::DatabaseConfig;
use crate::db::{self, queries, schema};
use crate::error::{ConfigError, StoreResult};
use crate::models::{FieldUpdate, NewStudent, Student, StudentInfo, StudentNumber};

pub use crate::db::schema::SchemaStatus;

/// Entry point for every operation on the `students` table.
#[derive(Debug, Clone)]
pub struct StudentStore {
    options: PgConnectOptions,
}

impl StudentStore {
    /// Validate `config` and prepare connection options.
    pub fn new(config: &DatabaseConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_options(config.connect_options()?))
    }

    pub fn from_options(options: PgConnectOptions) -> Self {
        Self { options }
    }

    /// Create the table and unique index if they do not exist.
    #[instrument(skip_all)]
    pub async fn initialize_schema(&self) -> StoreResult<SchemaStatus> {
        let mut conn = db::connect(&self.options).await?;
        let result = schema::initialize(&mut conn).await;
        db::release(conn).await;

        if let Ok(status) = &result {
            info!(?status, "students table ready");
        }
        result
    }

    /// Insert the built-in sample record.
    pub async fn insert_fixed_record(&self) -> StoreResult<i32> {
        self.insert_record(&NewStudent::fixture()).await
    }

    /// Insert a record, returning its generated `student_id`.
    #[instrument(skip_all, fields(number = %student.number))]
    pub async fn insert_record(&self, student: &NewStudent) -> StoreResult<i32> {
        let mut conn = db::connect(&self.options).await?;
        let result = queries::insert(&mut conn, student).await;
        db::release(conn).await;

        if let Ok(id) = &result {
            info!(student_id = id, "student inserted");
        }
        result
    }

    /// First record with `number`, or `None`.
    #[instrument(skip_all, fields(number = %number))]
    pub async fn find_by_number(&self, number: &StudentNumber) -> StoreResult<Option<StudentInfo>> {
        let mut conn = db::connect(&self.options).await?;
        let result = queries::find_by_number(&mut conn, number).await;
        db::release(conn).await;
        result
    }

    /// Replace all four mutable fields; returns rows affected (0 is not an error).
    #[instrument(skip_all, fields(number = %number))]
    pub async fn update_all_fields(
        &self,
        number: &StudentNumber,
        student: &NewStudent,
    ) -> StoreResult<u64> {
        let mut conn = db::connect(&self.options).await?;
        let result = queries::update_all(&mut conn, number, student).await;
        db::release(conn).await;

        if let Ok(rows) = &result {
            info!(rows, "update applied");
        }
        result
    }

    /// Replace one column; returns rows affected (0 is not an error).
    #[instrument(skip_all, fields(number = %number, field = update.field().column()))]
    pub async fn update_single_field(
        &self,
        number: &StudentNumber,
        update: &FieldUpdate,
    ) -> StoreResult<u64> {
        let mut conn = db::connect(&self.options).await?;
        let result = queries::update_field(&mut conn, number, update).await;
        db::release(conn).await;

        if let Ok(rows) = &result {
            info!(rows, "update applied");
        }
        result
    }

    /// Delete every record with `number` atomically, returning the removed rows.
    ///
    /// `preview` is called with each matching row before the delete runs.
    #[instrument(skip_all, fields(number = %number))]
    pub async fn delete_by_number(
        &self,
        number: &StudentNumber,
        preview: impl FnMut(&Student),
    ) -> StoreResult<Vec<Student>> {
        let mut conn = db::connect(&self.options).await?;
        let result = queries::delete_by_number(&mut conn, number, preview).await;
        db::release(conn).await;

        if let Ok(removed) = &result {
            info!(rows = removed.len(), "delete applied");
        }
        result
    }
}
