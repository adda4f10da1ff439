//! Diary entry model and request DTO.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tinnilog_core::diary::DiaryOutcome;
use tinnilog_core::types::{DbId, Timestamp};

/// A row from the `diary_entries` table, keyed by `(user_id, entry_id)`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub user_id: DbId,
    /// Client-allocated identifier, stable across retries.
    pub entry_id: DbId,
    #[serde(rename = "date")]
    pub entry_date: NaiveDate,
    #[serde(rename = "time")]
    pub entry_time: String,
    pub food_category: Option<String>,
    pub information: Option<String>,
    pub notes: Option<String>,
    pub stress_level: Option<String>,
    pub activities: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Upsert-or-delete request for one diary entry.
///
/// `entry_id`, `date` and `time` are optional here so that their absence is
/// reported as a validation failure rather than a body-parsing failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntryRequest {
    pub entry_id: Option<DbId>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub food_category: Option<String>,
    pub information: Option<String>,
    pub notes: Option<String>,
    pub stress_level: Option<String>,
    pub activities: Option<serde_json::Value>,
    #[serde(default)]
    pub deleted: bool,
}

/// What an upsert-or-delete did, with the resulting row unless it was deleted.
#[derive(Debug, Clone, Serialize)]
pub struct DiaryReconciliation {
    pub outcome: DiaryOutcome,
    pub entry: Option<DiaryEntry>,
}
