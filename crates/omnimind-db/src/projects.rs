//! Project repository.

use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use omnimind_core::{
    new_v7, CreateProjectRequest, Error, Project, ProjectDetail, ProjectStatus,
    ProjectStatusStats, ProjectSummary, Result, TaskBrief, TaskPriority, TaskStatus,
    UpdateProjectRequest,
};

/// PostgreSQL repository for projects.
pub struct PgProjectRepository {
    pool: Pool<Postgres>,
}

/// Validate a client-supplied sort column against the whitelist.
fn sort_column(sort: Option<&str>) -> &'static str {
    match sort {
        Some("name") => "p.name",
        Some("due_date") => "p.due_date",
        Some("updated_at") => "p.updated_at",
        _ => "p.created_at",
    }
}

fn sort_order(order: Option<&str>) -> &'static str {
    match order.map(str::to_ascii_lowercase).as_deref() {
        Some("asc") => "ASC",
        _ => "DESC",
    }
}

fn parse_project_row(row: &sqlx::postgres::PgRow) -> Project {
    let status: String = row.get("status");
    Project {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        description: row.get("description"),
        status: ProjectStatus::parse(&status).unwrap_or(ProjectStatus::Active),
        color: row.get("color"),
        icon: row.get("icon"),
        due_date: row.get("due_date"),
        metadata: row.get("metadata"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl PgProjectRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List a user's projects with task-count aggregates.
    pub async fn list(
        &self,
        user_id: Uuid,
        status: Option<ProjectStatus>,
        sort: Option<&str>,
        order: Option<&str>,
    ) -> Result<Vec<ProjectSummary>> {
        let mut query = String::from(
            "SELECT p.*,
                    COUNT(t.id) AS task_count,
                    COUNT(t.id) FILTER (WHERE t.status = 'completed') AS completed_tasks
             FROM projects p
             LEFT JOIN tasks t ON p.id = t.project_id
             WHERE p.user_id = $1 ",
        );
        if status.is_some() {
            query.push_str("AND p.status = $2 ");
        }
        query.push_str(&format!(
            "GROUP BY p.id ORDER BY {} {}",
            sort_column(sort),
            sort_order(order)
        ));

        let mut q = sqlx::query(&query).bind(user_id);
        if let Some(s) = status {
            q = q.bind(s.as_str());
        }

        let rows = q.fetch_all(&self.pool).await.map_err(Error::Database)?;
        Ok(rows
            .into_iter()
            .map(|row| ProjectSummary {
                task_count: row.get("task_count"),
                completed_tasks: row.get("completed_tasks"),
                project: parse_project_row(&row),
            })
            .collect())
    }

    /// Get one project with its task summaries. Returns None when the row
    /// does not exist or belongs to another user.
    pub async fn get_detail(&self, id: Uuid, user_id: Uuid) -> Result<Option<ProjectDetail>> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let project = parse_project_row(&row);

        let task_rows = sqlx::query(
            "SELECT id, title, status, priority, due_date
             FROM tasks WHERE project_id = $1
             ORDER BY created_at ASC",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let tasks = task_rows
            .into_iter()
            .map(|r| {
                let status: String = r.get("status");
                let priority: String = r.get("priority");
                TaskBrief {
                    id: r.get("id"),
                    title: r.get("title"),
                    status: TaskStatus::parse(&status).unwrap_or(TaskStatus::Todo),
                    priority: TaskPriority::parse(&priority).unwrap_or(TaskPriority::Medium),
                    due_date: r.get("due_date"),
                }
            })
            .collect();

        Ok(Some(ProjectDetail { project, tasks }))
    }

    /// Insert a new project.
    pub async fn insert(&self, user_id: Uuid, req: &CreateProjectRequest) -> Result<Project> {
        let id = new_v7();

        let row = sqlx::query(
            "INSERT INTO projects (id, user_id, name, description, color, icon, due_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.color)
        .bind(&req.icon)
        .bind(req.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(parse_project_row(&row))
    }

    /// Apply an allow-listed update. Only fields present in the request are
    /// written; `updated_at` is stamped by the table trigger.
    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        update: &UpdateProjectRequest,
    ) -> Result<Project> {
        let mut sets: Vec<String> = Vec::new();
        let mut idx = 1;

        for present in [
            update.name.is_some().then_some("name"),
            update.description.is_some().then_some("description"),
            update.status.is_some().then_some("status"),
            update.color.is_some().then_some("color"),
            update.icon.is_some().then_some("icon"),
            update.due_date.is_some().then_some("due_date"),
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

        let query = format!(
            "UPDATE projects SET {} WHERE id = ${} AND user_id = ${} RETURNING *",
            sets.join(", "),
            idx,
            idx + 1
        );

        let mut q = sqlx::query(&query);
        if let Some(v) = &update.name {
            q = q.bind(v);
        }
        if let Some(v) = &update.description {
            q = q.bind(v);
        }
        if let Some(v) = update.status {
            q = q.bind(v.as_str());
        }
        if let Some(v) = &update.color {
            q = q.bind(v);
        }
        if let Some(v) = &update.icon {
            q = q.bind(v);
        }
        if let Some(v) = update.due_date {
            q = q.bind(v);
        }
        q = q.bind(id).bind(user_id);

        let row = q.fetch_optional(&self.pool).await.map_err(Error::Database)?;
        row.map(|r| parse_project_row(&r))
            .ok_or_else(|| Error::NotFound("Project not found".to_string()))
    }

    /// Delete a project; tasks cascade at the database level.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Project not found".to_string()));
        }
        Ok(())
    }

    /// Per-status counts plus overdue counts.
    pub async fn stats(&self, user_id: Uuid) -> Result<Vec<ProjectStatusStats>> {
        let rows = sqlx::query(
            "SELECT status,
                    COUNT(*) AS count,
                    COUNT(*) FILTER (WHERE due_date < NOW()) AS overdue
             FROM projects
             WHERE user_id = $1
             GROUP BY status",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let status: String = row.get("status");
                ProjectStatusStats {
                    status: ProjectStatus::parse(&status).unwrap_or(ProjectStatus::Active),
                    count: row.get("count"),
                    overdue: row.get("overdue"),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_column_whitelist() {
        assert_eq!(sort_column(Some("name")), "p.name");
        assert_eq!(sort_column(Some("due_date")), "p.due_date");
        // Unknown columns fall back to created_at rather than interpolating
        // client input into SQL.
        assert_eq!(sort_column(Some("password_hash")), "p.created_at");
        assert_eq!(sort_column(None), "p.created_at");
    }

    #[test]
    fn test_sort_order_whitelist() {
        assert_eq!(sort_order(Some("asc")), "ASC");
        assert_eq!(sort_order(Some("ASC")), "ASC");
        assert_eq!(sort_order(Some("desc")), "DESC");
        assert_eq!(sort_order(Some("; DROP TABLE projects")), "DESC");
        assert_eq!(sort_order(None), "DESC");
    }
}
