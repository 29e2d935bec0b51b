//! User preference model and payloads

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Per-user display and behavior preferences
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserPreferences {
    pub theme: String,
    pub currency: String,
    pub notifications: bool,
    pub language: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            currency: "USD".to_string(),
            notifications: true,
            language: "en".to_string(),
        }
    }
}

impl UserPreferences {
    /// Apply a partial update on top of the current preferences
    pub fn merge(&self, update: &UpdatePreferencesRequest) -> Self {
        Self {
            theme: update.theme.clone().unwrap_or_else(|| self.theme.clone()),
            currency: update
                .currency
                .clone()
                .unwrap_or_else(|| self.currency.clone()),
            notifications: update.notifications.unwrap_or(self.notifications),
            language: update
                .language
                .clone()
                .unwrap_or_else(|| self.language.clone()),
        }
    }
}

/// Partial preference update; unknown fields are rejected
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePreferencesRequest {
    pub theme: Option<String>,
    pub currency: Option<String>,
    pub notifications: Option<bool>,
    pub language: Option<String>,
}
