//! Task repository.
//!
//! The update path owns the `completed_at` invariant: it is set exactly
//! when the task's status becomes `completed` and cleared on any other
//! status change.

use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use omnimind_core::{
    defaults, new_v7, CreateTaskRequest, Error, Pagination, Result, Task, TaskListFilter,
    TaskListPage, TaskPriority, TaskStatus, TaskWithProject, UpdateTaskRequest,
};

/// PostgreSQL repository for tasks.
pub struct PgTaskRepository {
    pool: Pool<Postgres>,
}

fn sort_column(sort: Option<&str>) -> &'static str {
    match sort {
        Some("created_at") => "t.created_at",
        Some("updated_at") => "t.updated_at",
        Some("title") => "t.title",
        Some("priority") => "t.priority",
        _ => "t.due_date",
    }
}

fn sort_order(order: Option<&str>) -> &'static str {
    match order.map(str::to_ascii_lowercase).as_deref() {
        Some("desc") => "DESC",
        _ => "ASC",
    }
}

fn parse_task_row(row: &sqlx::postgres::PgRow) -> Task {
    let status: String = row.get("status");
    let priority: String = row.get("priority");
    Task {
        id: row.get("id"),
        user_id: row.get("user_id"),
        project_id: row.get("project_id"),
        title: row.get("title"),
        description: row.get("description"),
        status: TaskStatus::parse(&status).unwrap_or(TaskStatus::Todo),
        priority: TaskPriority::parse(&priority).unwrap_or(TaskPriority::Medium),
        due_date: row.get("due_date"),
        completed_at: row.get("completed_at"),
        estimated_duration: row.get("estimated_duration"),
        actual_duration: row.get("actual_duration"),
        tags: row.get("tags"),
        metadata: row.get("metadata"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl PgTaskRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List a user's tasks with optional filters, joined project display
    /// fields, and page/limit pagination.
    pub async fn list(&self, user_id: Uuid, filter: &TaskListFilter) -> Result<TaskListPage> {
        let limit = filter
            .limit
            .unwrap_or(defaults::LIST_LIMIT)
            .clamp(1, defaults::LIST_LIMIT_MAX);
        let page = filter.page.unwrap_or(1).max(1);
        let offset = (page - 1) * limit;

        let mut query = String::from(
            "SELECT t.*, p.name AS project_name, p.color AS project_color
             FROM tasks t
             LEFT JOIN projects p ON t.project_id = p.id
             WHERE t.user_id = $1 ",
        );
        let mut idx = 2;

        if filter.project_id.is_some() {
            query.push_str(&format!("AND t.project_id = ${idx} "));
            idx += 1;
        }
        if filter.status.is_some() {
            query.push_str(&format!("AND t.status = ${idx} "));
            idx += 1;
        }
        if filter.priority.is_some() {
            query.push_str(&format!("AND t.priority = ${idx} "));
            idx += 1;
        }
        if filter.due_date_from.is_some() {
            query.push_str(&format!("AND t.due_date >= ${idx} "));
            idx += 1;
        }
        if filter.due_date_to.is_some() {
            query.push_str(&format!("AND t.due_date <= ${idx} "));
            idx += 1;
        }

        query.push_str(&format!(
            "ORDER BY {} {} NULLS LAST LIMIT ${} OFFSET ${}",
            sort_column(filter.sort.as_deref()),
            sort_order(filter.order.as_deref()),
            idx,
            idx + 1
        ));

        let mut q = sqlx::query(&query).bind(user_id);
        if let Some(v) = filter.project_id {
            q = q.bind(v);
        }
        if let Some(v) = filter.status {
            q = q.bind(v.as_str());
        }
        if let Some(v) = filter.priority {
            q = q.bind(v.as_str());
        }
        if let Some(v) = filter.due_date_from {
            q = q.bind(v);
        }
        if let Some(v) = filter.due_date_to {
            q = q.bind(v);
        }
        q = q.bind(limit).bind(offset);

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;
        let tasks = rows
            .into_iter()
            .map(|row| TaskWithProject {
                project_name: row.get("project_name"),
                project_color: row.get("project_color"),
                task: parse_task_row(&row),
            })
            .collect();

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(TaskListPage {
            tasks,
            pagination: Pagination {
                page,
                limit,
                total,
                pages: (total + limit - 1) / limit,
            },
        })
    }

    /// Insert a new task. Project ownership must be verified by the caller
    /// (see [`Self::project_owned_by`]).
    pub async fn insert(&self, user_id: Uuid, req: &CreateTaskRequest) -> Result<Task> {
        let id = new_v7();

        let row = sqlx::query(
            "INSERT INTO tasks (
                id, user_id, project_id, title, description,
                status, priority, due_date, estimated_duration, tags
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(req.project_id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.status.as_str())
        .bind(req.priority.as_str())
        .bind(req.due_date)
        .bind(req.estimated_duration)
        .bind(&req.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(parse_task_row(&row))
    }

    /// Check that a project exists and belongs to the user.
    pub async fn project_owned_by(&self, project_id: Uuid, user_id: Uuid) -> Result<bool> {
        let row: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(Error::Database)?;
        Ok(row.is_some())
    }

    /// Get one task, owner-scoped.
    pub async fn get(&self, id: Uuid, user_id: Uuid) -> Result<Option<Task>> {
        let row = sqlx::query("SELECT * FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.as_ref().map(parse_task_row))
    }

    /// Apply an allow-listed update, stamping or clearing `completed_at`
    /// whenever the status changes.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        update: &UpdateTaskRequest,
    ) -> Result<Task> {
        let mut sets: Vec<String> = Vec::new();
        let mut idx = 1;

        for present in [
            update.project_id.is_some().then_some("project_id"),
            update.title.is_some().then_some("title"),
            update.description.is_some().then_some("description"),
            update.status.is_some().then_some("status"),
            update.priority.is_some().then_some("priority"),
            update.due_date.is_some().then_some("due_date"),
            update
                .estimated_duration
                .is_some()
                .then_some("estimated_duration"),
            update.actual_duration.is_some().then_some("actual_duration"),
            update.tags.is_some().then_some("tags"),
        ]
        .into_iter()
        .flatten()
        {
            sets.push(format!("{present} = ${idx}"));
            idx += 1;
        }

        if sets.is_empty() {
            return Err(Error::InvalidInput("No valid fields to update".to_string()));
        }

        match update.status {
            Some(TaskStatus::Completed) => sets.push("completed_at = NOW()".to_string()),
            Some(_) => sets.push("completed_at = NULL".to_string()),
            None => {}
        }

        let query = format!(
            "UPDATE tasks SET {} WHERE id = ${} AND user_id = ${} RETURNING *",
            sets.join(", "),
            idx,
            idx + 1
        );

        let mut q = sqlx::query(&query);
        if let Some(v) = update.project_id {
            q = q.bind(v);
        }
        if let Some(v) = &update.title {
            q = q.bind(v);
        }
        if let Some(v) = &update.description {
            q = q.bind(v);
        }
        if let Some(v) = update.status {
            q = q.bind(v.as_str());
        }
        if let Some(v) = update.priority {
            q = q.bind(v.as_str());
        }
        if let Some(v) = update.due_date {
            q = q.bind(v);
        }
        if let Some(v) = update.estimated_duration {
            q = q.bind(v);
        }
        if let Some(v) = update.actual_duration {
            q = q.bind(v);
        }
        if let Some(v) = &update.tags {
            q = q.bind(v);
        }
        q = q.bind(id).bind(user_id);

        let row = q.fetch_optional(&self.pool).await.map_err(Error::Database)?;
        row.as_ref()
            .map(parse_task_row)
            .ok_or_else(|| Error::NotFound("Task not found".to_string()))
    }

    /// Delete a task, owner-scoped.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Task not found".to_string()));
        }
        Ok(())
    }

    /// Shortcut: mark a task completed now.
    pub async fn complete(&self, id: Uuid, user_id: Uuid) -> Result<Task> {
        let row = sqlx::query(
            "UPDATE tasks
             SET status = 'completed', completed_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref()
            .map(parse_task_row)
            .ok_or_else(|| Error::NotFound("Task not found".to_string()))
    }

    /// Open tasks due within the next `days` days, soonest first.
    pub async fn upcoming(&self, user_id: Uuid, days: i64) -> Result<Vec<TaskWithProject>> {
        let rows = sqlx::query(
            "SELECT t.*, p.name AS project_name, p.color AS project_color
             FROM tasks t
             LEFT JOIN projects p ON t.project_id = p.id
             WHERE t.user_id = $1
               AND t.status NOT IN ('completed', 'cancelled')
               AND t.due_date BETWEEN NOW() AND NOW() + make_interval(days => $2)
             ORDER BY t.due_date ASC
             LIMIT $3",
        )
        .bind(user_id)
        .bind(days as i32)
        .bind(defaults::UPCOMING_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| TaskWithProject {
                project_name: row.get("project_name"),
                project_color: row.get("project_color"),
                task: parse_task_row(&row),
            })
            .collect())
    }

    /// Historical task rows for productivity analysis.
    pub async fn history_for_analysis(
        &self,
        user_id: Uuid,
        days: i64,
    ) -> Result<Vec<serde_json::Value>> {
        let rows = sqlx::query(
            "SELECT DATE(created_at)::text AS date,
                    status,
                    priority,
                    estimated_duration,
                    actual_duration,
                    EXTRACT(DOW FROM created_at)::int AS day_of_week
             FROM tasks
             WHERE user_id = $1 AND created_at > NOW() - make_interval(days => $2)
             ORDER BY created_at",
        )
        .bind(user_id)
        .bind(days as i32)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                serde_json::json!({
                    "date": row.get::<String, _>("date"),
                    "status": row.get::<String, _>("status"),
                    "priority": row.get::<String, _>("priority"),
                    "estimated_duration": row.get::<Option<i32>, _>("estimated_duration"),
                    "actual_duration": row.get::<Option<i32>, _>("actual_duration"),
                    "day_of_week": row.get::<i32, _>("day_of_week"),
                })
            })
            .collect())
    }

    /// Open tasks with a due date in the next 7 days, for conflict analysis.
    pub async fn due_within_week(&self, user_id: Uuid) -> Result<Vec<serde_json::Value>> {
        let rows = sqlx::query(
            "SELECT id, title, due_date, priority, estimated_duration
             FROM tasks
             WHERE user_id = $1
               AND status != 'completed'
               AND due_date BETWEEN NOW() AND NOW() + INTERVAL '7 days'",
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
                    "due_date": row.get::<Option<chrono::DateTime<chrono::Utc>>, _>("due_date"),
                    "priority": row.get::<String, _>("priority"),
                    "estimated_duration": row.get::<Option<i32>, _>("estimated_duration"),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_whitelist() {
        assert_eq!(sort_column(Some("created_at")), "t.created_at");
        assert_eq!(sort_column(Some("title")), "t.title");
        assert_eq!(sort_column(Some("user_id")), "t.due_date");
        assert_eq!(sort_column(None), "t.due_date");
    }

    #[test]
    fn test_sort_order_defaults_ascending() {
        // Task lists default to soonest-due-first.
        assert_eq!(sort_order(None), "ASC");
        assert_eq!(sort_order(Some("desc")), "DESC");
        assert_eq!(sort_order(Some("garbage")), "ASC");
    }
}
