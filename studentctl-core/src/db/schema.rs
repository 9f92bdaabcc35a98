//! Schema for the `students` table

use sqlx::postgres::PgConnection;

use crate::error::{StoreResult, UNIQUE_VIOLATION};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS students (
        student_id SERIAL PRIMARY KEY,
        name TEXT,
        address TEXT,
        age INT,
        number TEXT
    )
"#;

const CREATE_NUMBER_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS students_number_key ON students (number)";

/// Outcome of [`initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    /// Table and unique index on `number` are present.
    Ready,
    /// Table is present but existing rows share numbers, so the unique
    /// index could not be built. Lookups fall back to the lowest id.
    DuplicateNumbers,
}

/// Create the table and the unique index on `number` if absent.
///
/// Each statement commits on its own; running this twice is a no-op.
pub async fn initialize(conn: &mut PgConnection) -> StoreResult<SchemaStatus> {
    sqlx::query(CREATE_TABLE).execute(&mut *conn).await?;

    match sqlx::query(CREATE_NUMBER_INDEX).execute(&mut *conn).await {
        Ok(_) => Ok(SchemaStatus::Ready),
        Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            tracing::warn!(
                "students.number has duplicate values; unique index not created"
            );
            Ok(SchemaStatus::DuplicateNumbers)
        }
        Err(e) => Err(e.into()),
    }
}
