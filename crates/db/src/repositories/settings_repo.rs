//! Repository for the `user_settings` table.
//!
//! One row per user holding an opaque JSON object. Saves replace the whole
//! object; nothing is merged field by field.

use sqlx::{FromRow, PgConnection, PgPool};
use tinnilog_core::error::CoreError;
use tinnilog_core::settings::{validate_settings, SettingsOutcome};
use tinnilog_core::types::DbId;

use crate::models::settings::UserSettings;
use crate::StoreError;

/// Column list for `user_settings` queries.
const COLUMNS: &str = "id, user_id, settings, created_at, updated_at";

/// Row returned by the save upsert: the settings plus whether it was inserted.
#[derive(FromRow)]
struct SavedSettings {
    #[sqlx(flatten)]
    settings: UserSettings,
    inserted: bool,
}

/// Provides data access for user settings.
pub struct SettingsRepo;

impl SettingsRepo {
    /// Get the settings for a user.
    ///
    /// Fails with `NotFound` when no row exists; registration is expected to
    /// have created one.
    pub async fn get(pool: &PgPool, user_id: DbId) -> Result<UserSettings, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM user_settings WHERE user_id = $1");
        sqlx::query_as::<_, UserSettings>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .ok_or(StoreError::Core(CoreError::NotFound {
                entity: "Settings",
                id: user_id,
            }))
    }

    /// Replace a user's settings wholesale, creating the row if absent.
    ///
    /// Insert-or-replace is a single `ON CONFLICT` statement, so concurrent
    /// saves for the same user never produce two rows. `xmax = 0` holds only
    /// for a freshly inserted tuple, which tells create from update.
    pub async fn save(
        pool: &PgPool,
        user_id: DbId,
        blob: &serde_json::Value,
    ) -> Result<(SettingsOutcome, UserSettings), StoreError> {
        validate_settings(blob)?;

        let query = format!(
            "INSERT INTO user_settings (user_id, settings) \
             VALUES ($1, $2) \
             ON CONFLICT (user_id) DO UPDATE SET settings = EXCLUDED.settings \
             RETURNING {COLUMNS}, (xmax = 0) AS inserted"
        );
        let saved = sqlx::query_as::<_, SavedSettings>(&query)
            .bind(user_id)
            .bind(blob)
            .fetch_one(pool)
            .await?;

        let outcome = if saved.inserted {
            SettingsOutcome::Created
        } else {
            SettingsOutcome::Updated
        };
        Ok((outcome, saved.settings))
    }

    /// Insert a settings row on the caller's connection (used inside the
    /// registration transaction).
    pub async fn insert_with(
        conn: &mut PgConnection,
        user_id: DbId,
        blob: &serde_json::Value,
    ) -> Result<UserSettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_settings (user_id, settings) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSettings>(&query)
            .bind(user_id)
            .bind(blob)
            .fetch_one(conn)
            .await
    }
}
