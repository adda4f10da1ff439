use crate::types::DbId;

/// Domain errors detected before any write begins.
///
/// `Validation` is the caller-input failure (missing or malformed fields);
/// `NotFound` covers absent surveys, users, diary entries and settings rows.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
