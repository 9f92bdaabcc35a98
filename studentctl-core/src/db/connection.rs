//! Connection acquisition and release
//!
//! There is deliberately no pool: every store operation opens a connection,
//! runs its statements and hands the connection to [`release`].

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

use crate::error::{StoreError, StoreResult};

/// Open a single connection.
///
/// # Errors
///
/// Returns [`StoreError::Connect`] if the server is unreachable or rejects
/// the credentials.
pub async fn connect(options: &PgConnectOptions) -> StoreResult<PgConnection> {
    let conn = PgConnection::connect_with(options)
        .await
        .map_err(StoreError::Connect)?;

    tracing::debug!(
        host = options.get_host(),
        port = options.get_port(),
        database = options.get_database().unwrap_or_default(),
        "connection to the database established"
    );
    Ok(conn)
}

/// Close a connection, logging instead of failing if the goodbye is lost.
pub async fn release(conn: PgConnection) {
    match conn.close().await {
        Ok(()) => tracing::debug!("database connection closed"),
        Err(e) => tracing::warn!(error = %e, "database connection did not close cleanly"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Port 1 on loopback refuses immediately; no database needed.
    fn unreachable() -> PgConnectOptions {
        PgConnectOptions::new()
            .host("127.0.0.1")
            .port(1)
            .username("nobody")
            .database("nothing")
    }

    #[tokio::test]
    async fn refused_connection_is_connect_error() {
        let err = connect(&unreachable()).await.unwrap_err();
        assert!(err.is_connect(), "expected connect error, got {err:?}");
    }

    #[sqlx::test(migrations = false)]
    #[ignore = "requires database"]
    async fn connect_and_release(_pool_opts: sqlx::postgres::PgPoolOptions, opts: PgConnectOptions) {
        let mut conn = connect(&opts).await.expect("connect failed");
        let one: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&mut conn)
            .await
            .expect("query failed");
        assert_eq!(one.0, 1);
        release(conn).await;
    }
}
