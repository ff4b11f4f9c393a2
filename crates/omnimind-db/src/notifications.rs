//! Notification repository.

use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use omnimind_core::{
    defaults, new_v7, CreateNotificationRequest, Error, Notification, NotificationKind, Result,
    TaskPriority,
};

/// PostgreSQL repository for notifications.
pub struct PgNotificationRepository {
    pool: Pool<Postgres>,
}

fn parse_notification_row(row: &sqlx::postgres::PgRow) -> Notification {
    let kind: String = row.get("type");
    let priority: String = row.get("priority");
    Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kind: NotificationKind::parse(&kind).unwrap_or(NotificationKind::Info),
        title: row.get("title"),
        message: row.get("message"),
        priority: TaskPriority::parse(&priority).unwrap_or(TaskPriority::Medium),
        read: row.get("read"),
        action_url: row.get("action_url"),
        metadata: row.get("metadata"),
        scheduled_for: row.get("scheduled_for"),
        sent_at: row.get("sent_at"),
        created_at: row.get("created_at"),
    }
}

impl PgNotificationRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List a user's notifications, newest first, with the unread total.
    pub async fn list(
        &self,
        user_id: Uuid,
        read: Option<bool>,
        kind: Option<NotificationKind>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<(Vec<Notification>, i64)> {
        let limit = limit
            .unwrap_or(defaults::LIST_LIMIT)
            .clamp(1, defaults::LIST_LIMIT_MAX);
        let offset = offset.unwrap_or(0).max(0);

        let mut query = String::from("SELECT * FROM notifications WHERE user_id = $1 ");
        let mut idx = 2;

        if read.is_some() {
            query.push_str(&format!("AND read = ${idx} "));
            idx += 1;
        }
        if kind.is_some() {
            query.push_str(&format!("AND type = ${idx} "));
            idx += 1;
        }
        query.push_str(&format!(
            "ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            idx,
            idx + 1
        ));

        let mut q = sqlx::query(&query).bind(user_id);
        if let Some(v) = read {
            q = q.bind(v);
        }
        if let Some(v) = kind {
            q = q.bind(v.as_str());
        }
        q = q.bind(limit).bind(offset);

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;
        let notifications = rows.iter().map(parse_notification_row).collect();

        let unread: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok((notifications, unread))
    }

    /// Insert a notification.
    pub async fn insert(
        &self,
        user_id: Uuid,
        req: &CreateNotificationRequest,
    ) -> Result<Notification> {
        let id = new_v7();

        let row = sqlx::query(
            "INSERT INTO notifications (
                id, user_id, type, title, message, priority,
                action_url, metadata, scheduled_for
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(req.kind.as_str())
        .bind(&req.title)
        .bind(&req.message)
        .bind(req.priority.as_str())
        .bind(&req.action_url)
        .bind(&req.metadata)
        .bind(req.scheduled_for)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(parse_notification_row(&row))
    }

    /// Mark one notification read, owner-scoped.
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<Notification> {
        let row = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref()
            .map(parse_notification_row)
            .ok_or_else(|| Error::NotFound("Notification not found".to_string()))
    }

    /// Mark all of a user's unread notifications read.
    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(result.rows_affected())
    }

    /// Delete one notification, owner-scoped.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Notification not found".to_string()));
        }
        Ok(())
    }

    /// Delete all of a user's notifications.
    pub async fn delete_all(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected())
    }
}
