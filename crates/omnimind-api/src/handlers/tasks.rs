//! Task HTTP handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use omnimind_core::{defaults, CreateTaskRequest, TaskListFilter, UpdateTaskRequest};

use crate::auth::AuthUser;
use crate::{validate, ApiError, AppState};

/// List the caller's tasks with filters and pagination.
pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<TaskListFilter>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let page = state.db.tasks.list(auth.id, &filter).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "tasks": page.tasks,
        "pagination": page.pagination,
    })))
}

/// Create a task, verifying project ownership when one is referenced.
pub async fn create_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    validate::title(&req.title)?;
    if let Some(description) = &req.description {
        validate::description(description)?;
    }
    if let Some(duration) = req.estimated_duration {
        validate::estimated_duration(duration)?;
    }

    if let Some(project_id) = req.project_id {
        if !state.db.tasks.project_owned_by(project_id, auth.id).await? {
            return Err(ApiError::NotFound("Project not found".to_string()));
        }
    }

    let task = state.db.tasks.insert(auth.id, &req).await?;
    info!(user_id = %auth.id, task_id = %task.id, "Task created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "task": task,
        })),
    ))
}

/// Get one task.
pub async fn get_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let task = state
        .db
        .tasks
        .get(id, auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "task": task,
    })))
}

/// Update a task from an allow-listed field set.
pub async fn update_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if req.is_empty() {
        return Err(ApiError::BadRequest("No valid fields to update".to_string()));
    }
    if let Some(title) = &req.title {
        validate::title(title)?;
    }
    if let Some(description) = &req.description {
        validate::description(description)?;
    }
    if let Some(duration) = req.estimated_duration {
        validate::estimated_duration(duration)?;
    }
    if let Some(project_id) = req.project_id {
        if !state.db.tasks.project_owned_by(project_id, auth.id).await? {
            return Err(ApiError::NotFound("Project not found".to_string()));
        }
    }

    let task = state.db.tasks.update(id, auth.id, &req).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "task": task,
    })))
}

/// Delete a task.
pub async fn delete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.tasks.delete(id, auth.id).await?;
    info!(user_id = %auth.id, task_id = %id, "Task deleted");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Task deleted successfully",
    })))
}

/// Completion shortcut: status `completed`, `completed_at` stamped.
pub async fn complete_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let task = state.db.tasks.complete(id, auth.id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "task": task,
    })))
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub days: Option<i64>,
}

/// Open tasks due within the lookahead window (default 7 days).
pub async fn upcoming_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let days = query.days.unwrap_or(defaults::UPCOMING_DAYS).clamp(1, 365);
    let tasks = state.db.tasks.upcoming(auth.id, days).await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "tasks": tasks,
    })))
}
