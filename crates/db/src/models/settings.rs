//! Per-user settings row.

use serde::Serialize;
use sqlx::FromRow;
use tinnilog_core::types::{DbId, Timestamp};

/// A row from the `user_settings` table. `settings` is an opaque JSON object.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub id: DbId,
    pub user_id: DbId,
    pub settings: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
