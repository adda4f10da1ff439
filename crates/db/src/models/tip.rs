//! Tip entity model.

use serde::Serialize;
use sqlx::FromRow;
use tinnilog_core::types::{DbId, Timestamp};

/// A row from the `tips` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tip {
    pub id: DbId,
    pub title: String,
    pub flavour: String,
    pub text: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
