use serde::{Deserialize, Serialize};

/// User preferences persisted alongside the data collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    /// Theme preset name, resolved by the theme loader.
    pub theme: Option<String>,
    /// Whether alert notifications are surfaced in the status bar.
    pub notifications: bool,
}
