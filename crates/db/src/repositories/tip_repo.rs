//! Repository for the `tips` table.

use sqlx::PgPool;
use tinnilog_core::types::DbId;

use crate::models::tip::Tip;

const COLUMNS: &str = "id, title, flavour, text, created_at, updated_at";

/// Read access to the tips catalogue.
pub struct TipRepo;

impl TipRepo {
    /// List all tips in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Tip>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tips ORDER BY id");
        sqlx::query_as::<_, Tip>(&query).fetch_all(pool).await
    }

    /// Find a tip by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tip>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tips WHERE id = $1");
        sqlx::query_as::<_, Tip>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
