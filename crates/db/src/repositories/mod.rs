//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async operations that
//! accept `&PgPool` as the first argument. Multi-step writes open their own
//! transaction and either commit everything or nothing.

pub mod diary_entry_repo;
pub mod settings_repo;
pub mod survey_repo;
pub mod survey_response_repo;
pub mod tip_repo;
pub mod user_repo;

pub use diary_entry_repo::DiaryEntryRepo;
pub use settings_repo::SettingsRepo;
pub use survey_repo::SurveyRepo;
pub use survey_response_repo::SurveyResponseRepo;
pub use tip_repo::TipRepo;
pub use user_repo::UserRepo;
