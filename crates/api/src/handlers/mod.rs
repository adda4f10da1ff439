pub mod auth;
pub mod diary;
pub mod settings;
pub mod surveys;
pub mod tips;
pub mod users;
