//! Diary entry validation and reconciliation outcomes.
//!
//! Diary entries are keyed by `(user_id, entry_id)` where `entry_id` is
//! allocated by the client, so a retried create lands on the same row.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Wire format of the `date` field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Result of a diary upsert-or-delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiaryOutcome {
    Created,
    Updated,
    Deleted,
}

/// The required identity and timing fields of a diary request, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiaryKey {
    pub entry_id: DbId,
    pub date: NaiveDate,
    pub time: String,
}

/// Check that `entry_id`, `date` and `time` are present and well-formed.
///
/// Required on every request, including deletes.
pub fn validate_diary_key(
    entry_id: Option<DbId>,
    date: Option<&str>,
    time: Option<&str>,
) -> Result<DiaryKey, CoreError> {
    let entry_id =
        entry_id.ok_or_else(|| CoreError::Validation("entryId is required".to_string()))?;
    if entry_id <= 0 {
        return Err(CoreError::Validation(format!(
            "entryId must be positive, got {entry_id}"
        )));
    }

    let raw_date = date
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| CoreError::Validation("date is required".to_string()))?;
    let date = NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|_| {
        CoreError::Validation(format!("date '{raw_date}' must be formatted as YYYY-MM-DD"))
    })?;

    let time = time
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| CoreError::Validation("time is required".to_string()))?
        .to_string();

    Ok(DiaryKey {
        entry_id,
        date,
        time,
    })
}

/// Activities must be a JSON array (ordered tags) or object (keyed tags).
pub fn validate_activities(activities: Option<&serde_json::Value>) -> Result<(), CoreError> {
    match activities {
        None | Some(serde_json::Value::Null) => Ok(()),
        Some(serde_json::Value::Array(_)) | Some(serde_json::Value::Object(_)) => Ok(()),
        Some(_) => Err(CoreError::Validation(
            "activities must be an array or an object".to_string(),
        )),
    }
}
