//! User preference repository (one row per user).

use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use omnimind_core::{new_v7, Error, Result, UpdatePreferencesRequest, UserPreferences};

/// PostgreSQL repository for per-user preference blobs.
pub struct PgPreferenceRepository {
    pool: Pool<Postgres>,
}

impl PgPreferenceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Fetch a user's preferences, falling back to the defaults when no row
    /// has been created yet.
    pub async fn get_or_default(&self, user_id: Uuid) -> Result<UserPreferences> {
        let row = sqlx::query(
            "SELECT notification_settings, ai_preferences, theme
             FROM user_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(match row {
            Some(row) => UserPreferences {
                notification_settings: row.get("notification_settings"),
                ai_preferences: row.get("ai_preferences"),
                theme: row.get("theme"),
            },
            None => UserPreferences::default(),
        })
    }

    /// Upsert preferences; absent blobs keep their stored (or default)
    /// value.
    pub async fn upsert(
        &self,
        user_id: Uuid,
        update: &UpdatePreferencesRequest,
    ) -> Result<UserPreferences> {
        let defaults = UserPreferences::default();
        let id = new_v7();

        let row = sqlx::query(
            "INSERT INTO user_preferences (id, user_id, notification_settings, ai_preferences, theme)
             VALUES ($1, $2, COALESCE($3, $5::jsonb), COALESCE($4, $6::jsonb), COALESCE($7, $8))
             ON CONFLICT (user_id)
             DO UPDATE SET
               notification_settings = COALESCE($3, user_preferences.notification_settings),
               ai_preferences = COALESCE($4, user_preferences.ai_preferences),
               theme = COALESCE($7, user_preferences.theme),
               updated_at = NOW()
             RETURNING notification_settings, ai_preferences, theme",
        )
        .bind(id)
        .bind(user_id)
        .bind(&update.notification_settings)
        .bind(&update.ai_preferences)
        .bind(&defaults.notification_settings)
        .bind(&defaults.ai_preferences)
        .bind(&update.theme)
        .bind(&defaults.theme)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(UserPreferences {
            notification_settings: row.get("notification_settings"),
            ai_preferences: row.get("ai_preferences"),
            theme: row.get("theme"),
        })
    }
}
