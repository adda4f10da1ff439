//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and request payloads

pub mod diary_entry;
pub mod settings;
pub mod survey;
pub mod survey_response;
pub mod tip;
pub mod user;
