//! Statements against the `students` table
//!
//! Every function takes an open connection so callers decide its lifetime.
//! `number` is not guaranteed unique on legacy tables: reads pick the lowest
//! `student_id`, writes affect every match and report the count.

use sqlx::postgres::PgConnection;
use sqlx::Connection;

use crate::error::{StoreError, StoreResult};
use crate::models::{FieldUpdate, NewStudent, Student, StudentInfo, StudentNumber};

/// Insert a record, returning the generated `student_id`.
pub async fn insert(conn: &mut PgConnection, student: &NewStudent) -> StoreResult<i32> {
    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO students (name, address, age, number)
        VALUES ($1, $2, $3, $4)
        RETURNING student_id
        "#,
    )
    .bind(&student.name)
    .bind(&student.address)
    .bind(student.age.get())
    .bind(student.number.as_str())
    .fetch_one(conn)
    .await
    .map_err(|e| StoreError::from_write(e, student.number.as_str()))?;

    Ok(id)
}

/// Look up the four mutable fields of the first record with `number`.
pub async fn find_by_number(
    conn: &mut PgConnection,
    number: &StudentNumber,
) -> StoreResult<Option<StudentInfo>> {
    sqlx::query_as::<_, StudentInfo>(
        r#"
        SELECT name, address, age, number
        FROM students
        WHERE number = $1
        ORDER BY student_id
        LIMIT 1
        "#,
    )
    .bind(number.as_str())
    .fetch_optional(conn)
    .await
    .map_err(StoreError::from_read)
}

/// Overwrite name, address, age and number of every record with `number`.
pub async fn update_all(
    conn: &mut PgConnection,
    number: &StudentNumber,
    student: &NewStudent,
) -> StoreResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE students
        SET name = $1, address = $2, age = $3, number = $4
        WHERE number = $5
        "#,
    )
    .bind(&student.name)
    .bind(&student.address)
    .bind(student.age.get())
    .bind(student.number.as_str())
    .bind(number.as_str())
    .execute(conn)
    .await
    .map_err(|e| StoreError::from_write(e, student.number.as_str()))?;

    Ok(result.rows_affected())
}

/// Set one column of every record with `number`.
pub async fn update_field(
    conn: &mut PgConnection,
    number: &StudentNumber,
    update: &FieldUpdate,
) -> StoreResult<u64> {
    let sql = format!(
        "UPDATE students SET {} = $1 WHERE number = $2",
        update.field().column()
    );

    let query = sqlx::query(&sql);
    let query = match update {
        FieldUpdate::Name(value) | FieldUpdate::Address(value) => query.bind(value.as_str()),
        FieldUpdate::Age(age) => query.bind(age.get()),
    };

    let result = query.bind(number.as_str()).execute(conn).await?;
    Ok(result.rows_affected())
}

/// Delete every record with `number`, returning what was removed.
///
/// The preview read and the delete share one transaction and the rows are
/// locked, so nothing can change them in between. `preview` sees each locked
/// row before the delete runs. An empty result means nothing matched and
/// nothing was written.
pub async fn delete_by_number(
    conn: &mut PgConnection,
    number: &StudentNumber,
    mut preview: impl FnMut(&Student),
) -> StoreResult<Vec<Student>> {
    let mut tx = conn.begin().await?;

    let doomed: Vec<Student> = sqlx::query_as(
        r#"
        SELECT student_id, name, address, age, number
        FROM students
        WHERE number = $1
        ORDER BY student_id
        FOR UPDATE
        "#,
    )
    .bind(number.as_str())
    .fetch_all(&mut *tx)
    .await
    .map_err(StoreError::from_read)?;

    if doomed.is_empty() {
        tx.rollback().await?;
        return Ok(doomed);
    }

    doomed.iter().for_each(&mut preview);

    let result = sqlx::query("DELETE FROM students WHERE number = $1")
        .bind(number.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    if result.rows_affected() != doomed.len() as u64 {
        tracing::warn!(
            previewed = doomed.len(),
            deleted = result.rows_affected(),
            "delete count differs from preview"
        );
    }

    Ok(doomed)
}
