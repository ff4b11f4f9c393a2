//! Project HTTP handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use omnimind_core::{CreateProjectRequest, ProjectStatus, UpdateProjectRequest};

use crate::auth::AuthUser;
use crate::{validate, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    pub status: Option<ProjectStatus>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// List the caller's projects with task aggregates.
pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListProjectsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let projects = state
        .db
        .projects
        .list(
            auth.id,
            query.status,
            query.sort.as_deref(),
            query.order.as_deref(),
        )
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "count": projects.len(),
        "projects": projects,
    })))
}

/// Get one project with its tasks.
pub async fn get_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let project = state
        .db
        .projects
        .get_detail(id, auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "project": project,
    })))
}

/// Create a project.
pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    validate::title(&req.name)?;
    if let Some(description) = &req.description {
        validate::description(description)?;
    }
    validate::hex_color(&req.color)?;

    let project = state.db.projects.insert(auth.id, &req).await?;
    info!(user_id = %auth.id, project_id = %project.id, "Project created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "project": project,
        })),
    ))
}

/// Update a project from an allow-listed field set.
pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if req.is_empty() {
        return Err(ApiError::BadRequest("No valid fields to update".to_string()));
    }
    if let Some(name) = &req.name {
        validate::title(name)?;
    }
    if let Some(description) = &req.description {
        validate::description(description)?;
    }
    if let Some(color) = &req.color {
        validate::hex_color(color)?;
    }

    let project = state.db.projects.update(id, auth.id, &req).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "project": project,
    })))
}

/// Delete a project; its tasks cascade.
pub async fn delete_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.projects.delete(id, auth.id).await?;
    info!(user_id = %auth.id, project_id = %id, "Project deleted");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Project deleted successfully",
    })))
}

/// Per-status project statistics.
pub async fn project_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let stats = state.db.projects.stats(auth.id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "stats": stats,
    })))
}
