use sqlx::PgPool;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// How long a request waits for a free pooled connection before giving up
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(2);

/// Opens a connection pool to the database at `url`
pub async fn connect_sqlx(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(url)
        .await
}

/// Brings the schema up to date with the files in "migrations/"
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!().run(pool).await
}
