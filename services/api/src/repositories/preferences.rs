//! User preferences repository for database operations

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::UserPreferences;

/// User preferences repository
#[derive(Clone)]
pub struct PreferencesRepository {
    pool: PgPool,
}

impl PreferencesRepository {
    /// Create a new preferences repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's stored preferences, if any
    pub async fn get(&self, user_id: Uuid) -> Result<Option<UserPreferences>, sqlx::Error> {
        sqlx::query_as::<_, UserPreferences>(
            r#"
            SELECT theme, currency, notifications, language
            FROM user_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Store a user's preferences, replacing any previous row
    pub async fn upsert(
        &self,
        user_id: Uuid,
        preferences: &UserPreferences,
    ) -> Result<UserPreferences, sqlx::Error> {
        sqlx::query_as::<_, UserPreferences>(
            r#"
            INSERT INTO user_preferences (user_id, theme, currency, notifications, language)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET theme = EXCLUDED.theme,
                currency = EXCLUDED.currency,
                notifications = EXCLUDED.notifications,
                language = EXCLUDED.language,
                updated_at = now()
            RETURNING theme, currency, notifications, language
            "#,
        )
        .bind(user_id)
        .bind(&preferences.theme)
        .bind(&preferences.currency)
        .bind(preferences.notifications)
        .bind(&preferences.language)
        .fetch_one(&self.pool)
        .await
    }
}
