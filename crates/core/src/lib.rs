//! Pure domain logic for the tinnilog backend.
//!
//! Nothing in this crate touches the database. The repository layer in
//! `tinnilog_db` fetches rows and hands them to the functions here for
//! validation and shaping.

pub mod assembly;
pub mod diary;
pub mod error;
pub mod settings;
pub mod survey;
pub mod types;
