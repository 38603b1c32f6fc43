use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::path::Path;

/// Establishes a connection pool to the PostgreSQL-compatible database.
///
/// The URL comes from the settings, falling back to `DATABASE_URL`.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let database_url = settings.database_url()?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout())
        .connect(&database_url)
        .await?;

    tracing::debug!(max_connections = settings.max_connections, "Database pool ready.");
    Ok(pool)
}

/// Reads the DDL file and executes it verbatim as a single batch.
///
/// A missing file or malformed SQL is returned to the caller unchanged.
pub async fn create_tables(pool: &PgPool, ddl_path: &Path) -> Result<(), DbError> {
    let ddl = tokio::fs::read_to_string(ddl_path)
        .await
        .map_err(|source| DbError::SchemaFileError {
            path: ddl_path.to_path_buf(),
            source,
        })?;

    tracing::debug!(path = %ddl_path.display(), bytes = ddl.len(), "Executing schema batch.");
    sqlx::raw_sql(&ddl).execute(pool).await?;
    Ok(())
}
