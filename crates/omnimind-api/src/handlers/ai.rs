//! AI HTTP handlers: the synchronous LLM-backed endpoints and the job
//! queue surface.
//!
//! Upstream failures are logged in full server-side and surfaced to the
//! client as a fixed generic message.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use omnimind_core::{
    defaults, EnqueueJobRequest, ExtractTasksRequest, JobRepository, ScheduleConstraints,
    SummarizeMeetingRequest,
};

use crate::auth::AuthUser;
use crate::{validate, ApiError, AppState};

/// Synchronous task extraction; bypasses the queue and blocks on the model.
pub async fn extract_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ExtractTasksRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate::extraction_text(&req.text)?;

    let tasks = state
        .ai
        .extract_tasks(&req.text, &req.context)
        .await
        .map_err(|e| {
            error!(user_id = %auth.id, error = %e, "Task extraction failed");
            ApiError::Upstream("Failed to extract tasks".to_string())
        })?;

    Ok(Json(serde_json::json!({
        "success": true,
        "tasks": tasks,
    })))
}

/// Synchronous meeting summarization. With a `meeting_id`, the summary and
/// action items are persisted onto the owner's meeting row.
pub async fn summarize_meeting(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SummarizeMeetingRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    validate::transcript(&req.transcript)?;
    validate::meeting_duration(req.duration_minutes)?;

    let summary = state
        .ai
        .summarize_meeting(&req.transcript, req.duration_minutes, &req.participants)
        .await
        .map_err(|e| {
            error!(user_id = %auth.id, error = %e, "Meeting summarization failed");
            ApiError::Upstream("Failed to summarize meeting".to_string())
        })?;

    if let Some(meeting_id) = req.meeting_id {
        let action_items = serde_json::to_value(&summary.action_items)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        state
            .db
            .meetings
            .store_summary(meeting_id, auth.id, &summary.summary, &action_items)
            .await?;
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "summary": summary,
    })))
}

#[derive(Debug, Deserialize)]
pub struct OptimizeScheduleRequest {
    #[serde(default)]
    pub tasks: serde_json::Value,
    #[serde(default)]
    pub constraints: ScheduleConstraints,
}

/// Synchronous schedule optimization.
pub async fn optimize_schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<OptimizeScheduleRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let plan = state
        .ai
        .optimize_schedule(&req.tasks, &req.constraints)
        .await
        .map_err(|e| {
            error!(user_id = %auth.id, error = %e, "Schedule optimization failed");
            ApiError::Upstream("Failed to optimize schedule".to_string())
        })?;

    Ok(Json(serde_json::json!({
        "success": true,
        "schedule": plan,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ProductivityQuery {
    pub days: Option<i64>,
}

/// Productivity insights over the caller's task history.
pub async fn productivity(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ProductivityQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let report = state
        .ai
        .analyze_productivity(auth.id, query.days)
        .await
        .map_err(|e| {
            error!(user_id = %auth.id, error = %e, "Productivity analysis failed");
            ApiError::Upstream("Failed to analyze productivity patterns".to_string())
        })?;

    Ok(Json(serde_json::json!({
        "success": true,
        "report": report,
    })))
}

/// Conflict detection over the caller's upcoming week.
pub async fn conflicts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let report = state.ai.detect_conflicts(auth.id).await.map_err(|e| {
        error!(user_id = %auth.id, error = %e, "Conflict detection failed");
        ApiError::Upstream("Failed to detect conflicts".to_string())
    })?;

    Ok(Json(serde_json::json!({
        "success": true,
        "report": report,
    })))
}

/// Enqueue a deferred AI job. The caller does not wait for completion.
pub async fn enqueue_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<EnqueueJobRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    if !req.input.is_object() {
        return Err(ApiError::BadRequest("input must be a JSON object".to_string()));
    }

    let job = state.db.jobs.enqueue(auth.id, req.job_type, req.input).await?;
    info!(user_id = %auth.id, job_id = %job.id, job_type = ?job.job_type, "AI job queued");

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "success": true,
            "job": job,
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List the caller's jobs, newest first.
pub async fn list_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListJobsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(defaults::LIST_LIMIT)
        .clamp(1, defaults::LIST_LIMIT_MAX);
    let offset = query.offset.unwrap_or(0).max(0);

    let jobs = state.db.jobs.list_for_user(auth.id, limit, offset).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "jobs": jobs,
    })))
}

/// Get one job, owner-scoped.
pub async fn get_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let job = state
        .db
        .jobs
        .get_for_user(id, auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "job": job,
    })))
}

/// Queue-wide statistics.
pub async fn job_stats(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let stats = state.db.jobs.queue_stats().await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "stats": stats,
    })))
}
