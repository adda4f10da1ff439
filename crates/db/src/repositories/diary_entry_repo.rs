//! Repository for the `diary_entries` table.
//!
//! Entries are keyed by `(user_id, entry_id)` with a client-chosen
//! `entry_id`, so a retried create becomes an update instead of a duplicate.

use sqlx::{FromRow, PgPool};
use tinnilog_core::diary::{validate_activities, validate_diary_key, DiaryOutcome};
use tinnilog_core::error::CoreError;
use tinnilog_core::types::DbId;

use crate::models::diary_entry::{DiaryEntry, DiaryEntryRequest, DiaryReconciliation};
use crate::StoreError;

/// Column list for `diary_entries` queries.
const COLUMNS: &str = "user_id, entry_id, entry_date, entry_time, food_category, information, \
                       notes, stress_level, activities, created_at, updated_at";

/// Row returned by the upsert: the entry plus whether it was freshly inserted.
#[derive(FromRow)]
struct UpsertedEntry {
    #[sqlx(flatten)]
    entry: DiaryEntry,
    inserted: bool,
}

/// Provides upsert-or-delete and reads for diary entries.
pub struct DiaryEntryRepo;

impl DiaryEntryRepo {
    /// Create, fully replace, or delete one entry.
    ///
    /// - `deleted` set: remove the row, or fail with `NotFound` if there is none.
    /// - otherwise: insert, or overwrite every mutable field of the existing row.
    ///
    /// Each branch is a single statement, so the store decides create versus
    /// update atomically (`xmax = 0` holds only for a freshly inserted tuple).
    pub async fn upsert_or_delete(
        pool: &PgPool,
        user_id: DbId,
        input: &DiaryEntryRequest,
    ) -> Result<DiaryReconciliation, StoreError> {
        let key = validate_diary_key(input.entry_id, input.date.as_deref(), input.time.as_deref())?;

        if input.deleted {
            let result =
                sqlx::query("DELETE FROM diary_entries WHERE user_id = $1 AND entry_id = $2")
                    .bind(user_id)
                    .bind(key.entry_id)
                    .execute(pool)
                    .await?;
            if result.rows_affected() == 0 {
                return Err(CoreError::NotFound {
                    entity: "DiaryEntry",
                    id: key.entry_id,
                }
                .into());
            }
            tracing::info!(user_id, entry_id = key.entry_id, "Diary entry deleted");
            return Ok(DiaryReconciliation {
                outcome: DiaryOutcome::Deleted,
                entry: None,
            });
        }

        validate_activities(input.activities.as_ref())?;

        let query = format!(
            "INSERT INTO diary_entries
                (user_id, entry_id, entry_date, entry_time, food_category,
                 information, notes, stress_level, activities)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (user_id, entry_id) DO UPDATE SET
                entry_date = EXCLUDED.entry_date,
                entry_time = EXCLUDED.entry_time,
                food_category = EXCLUDED.food_category,
                information = EXCLUDED.information,
                notes = EXCLUDED.notes,
                stress_level = EXCLUDED.stress_level,
                activities = EXCLUDED.activities
             RETURNING {COLUMNS}, (xmax = 0) AS inserted"
        );
        let upserted = sqlx::query_as::<_, UpsertedEntry>(&query)
            .bind(user_id)
            .bind(key.entry_id)
            .bind(key.date)
            .bind(&key.time)
            .bind(&input.food_category)
            .bind(&input.information)
            .bind(&input.notes)
            .bind(&input.stress_level)
            .bind(&input.activities)
            .fetch_one(pool)
            .await?;

        let outcome = if upserted.inserted {
            DiaryOutcome::Created
        } else {
            DiaryOutcome::Updated
        };
        tracing::info!(user_id, entry_id = key.entry_id, ?outcome, "Diary entry saved");

        Ok(DiaryReconciliation {
            outcome,
            entry: Some(upserted.entry),
        })
    }

    /// Find one entry of a user.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        entry_id: DbId,
    ) -> Result<Option<DiaryEntry>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM diary_entries WHERE user_id = $1 AND entry_id = $2");
        sqlx::query_as::<_, DiaryEntry>(&query)
            .bind(user_id)
            .bind(entry_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's entries, oldest first by date then time.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<DiaryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM diary_entries
             WHERE user_id = $1
             ORDER BY entry_date, entry_time, entry_id"
        );
        sqlx::query_as::<_, DiaryEntry>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
