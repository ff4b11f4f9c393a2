//! Meeting repository.

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use omnimind_core::{new_v7, Error, Meeting, Result};

/// PostgreSQL repository for meetings.
pub struct PgMeetingRepository {
    pool: Pool<Postgres>,
}

fn parse_meeting_row(row: &sqlx::postgres::PgRow) -> Meeting {
    Meeting {
        id: row.get("id"),
        user_id: row.get("user_id"),
        title: row.get("title"),
        description: row.get("description"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        source: row.get("source"),
        transcript: row.get("transcript"),
        summary: row.get("summary"),
        action_items: row.get("action_items"),
        participants: row.get("participants"),
        location: row.get("location"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl PgMeetingRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a meeting row.
    pub async fn insert(
        &self,
        user_id: Uuid,
        title: &str,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        transcript: Option<&str>,
        participants: &[String],
    ) -> Result<Meeting> {
        let id = new_v7();

        let row = sqlx::query(
            "INSERT INTO meetings (id, user_id, title, start_time, end_time, transcript, participants)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(title)
        .bind(start_time)
        .bind(end_time)
        .bind(transcript)
        .bind(participants)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(parse_meeting_row(&row))
    }

    /// Get one meeting, owner-scoped.
    pub async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<Meeting>> {
        let row = sqlx::query("SELECT * FROM meetings WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.as_ref().map(parse_meeting_row))
    }

    /// Persist the AI-derived summary and action items onto a meeting.
    pub async fn store_summary(
        &self,
        id: Uuid,
        user_id: Uuid,
        summary: &str,
        action_items: &JsonValue,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE meetings SET summary = $1, action_items = $2
             WHERE id = $3 AND user_id = $4",
        )
        .bind(summary)
        .bind(action_items)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Meeting not found".to_string()));
        }
        Ok(())
    }

    /// Meetings starting within the next 7 days, for conflict analysis.
    pub async fn upcoming_week(&self, user_id: Uuid) -> Result<Vec<JsonValue>> {
        let rows = sqlx::query(
            "SELECT id, title, start_time, end_time
             FROM meetings
             WHERE user_id = $1
               AND start_time BETWEEN NOW() AND NOW() + INTERVAL '7 days'",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                serde_json::json!({
                    "id": row.get::<Uuid, _>("id"),
                    "title": row.get::<String, _>("title"),
                    "start_time": row.get::<DateTime<Utc>, _>("start_time"),
                    "end_time": row.get::<DateTime<Utc>, _>("end_time"),
                })
            })
            .collect())
    }
}
