//! User account repository.

use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use omnimind_core::{new_v7, Error, Result, UpdateProfileRequest, User};

/// PostgreSQL repository for user accounts.
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

const USER_COLUMNS: &str = "id, email, name, password_hash, avatar_url, timezone, role, \
     settings, last_login, created_at, updated_at";

impl PgUserRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_user_row(row: sqlx::postgres::PgRow) -> User {
        User {
            id: row.get("id"),
            email: row.get("email"),
            name: row.get("name"),
            password_hash: row.get("password_hash"),
            avatar_url: row.get("avatar_url"),
            timezone: row.get("timezone"),
            role: row.get("role"),
            settings: row.get("settings"),
            last_login: row.get("last_login"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    /// Insert a new user account.
    ///
    /// A duplicate email surfaces as [`Error::Conflict`].
    pub async fn create(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        timezone: &str,
    ) -> Result<User> {
        let id = new_v7();
        let now = Utc::now();

        let query = format!(
            "INSERT INTO users (id, email, name, password_hash, timezone, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(email)
            .bind(name)
            .bind(password_hash)
            .bind(timezone)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    Error::Conflict("Email already registered".to_string())
                }
                _ => Error::Database(e),
            })?;

        Ok(Self::parse_user_row(row))
    }

    /// Look up a user by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(Self::parse_user_row))
    }

    /// Look up a user by id.
    pub async fn get(&self, user_id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(Self::parse_user_row))
    }

    /// Update profile fields; absent fields keep their stored value.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: &UpdateProfileRequest,
    ) -> Result<User> {
        let query = format!(
            "UPDATE users
             SET name = COALESCE($1, name),
                 timezone = COALESCE($2, timezone),
                 avatar_url = COALESCE($3, avatar_url),
                 updated_at = NOW()
             WHERE id = $4
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(&update.name)
            .bind(&update.timezone)
            .bind(&update.avatar_url)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.map(Self::parse_user_row)
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    /// Stamp the last successful login time.
    pub async fn record_login(&self, user_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}
