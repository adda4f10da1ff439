//! Per-user settings blob.
//!
//! Settings are replaced wholesale on every save; there is no field-level
//! merge. Registration seeds [`default_settings`].

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::CoreError;

/// Result of a settings save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsOutcome {
    Created,
    Updated,
}

/// The blob written for a freshly registered user.
pub fn default_settings() -> Value {
    json!({
        "darkMode": false,
        "dataSharing": false,
    })
}

/// A settings blob must be a JSON object.
pub fn validate_settings(blob: &Value) -> Result<(), CoreError> {
    if !blob.is_object() {
        return Err(CoreError::Validation(
            "settings must be a JSON object".to_string(),
        ));
    }
    Ok(())
}
