use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tinnilog_core::error::CoreError;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Default upper bound on pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// Default time to wait for a free connection before failing.
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// PostgreSQL SQLSTATE for a serializable-isolation conflict.
const SQLSTATE_SERIALIZATION_FAILURE: &str = "40001";
/// PostgreSQL SQLSTATE for a detected deadlock.
const SQLSTATE_DEADLOCK_DETECTED: &str = "40P01";

/// Connection pool sizing.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        }
    }
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, config: &PoolConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Error returned by multi-step store operations.
///
/// `Core` errors are detected before any write and leave the store untouched.
/// `Persistence` wraps a store or transaction failure; the transaction has
/// been rolled back, so retrying the whole operation is safe.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl StoreError {
    /// Whether the failure was a serialization conflict or deadlock that a
    /// plain retry can resolve.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Persistence(err) => is_retryable_error(err),
            StoreError::Core(_) => false,
        }
    }
}

/// Whether a sqlx error is a serialization failure or deadlock. The
/// transaction has been rolled back and can be rerun unchanged.
pub fn is_retryable_error(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => matches!(
            db_err.code().as_deref(),
            Some(SQLSTATE_SERIALIZATION_FAILURE) | Some(SQLSTATE_DEADLOCK_DETECTED)
        ),
        _ => false,
    }
}
