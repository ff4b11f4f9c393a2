//! Meeting HTTP handlers.
//!
//! Meetings feed the conflict-detection and summarization flows; only the
//! minimal create/get surface is exposed.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::{validate, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateMeetingRequest {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub transcript: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
}

/// Create a meeting.
pub async fn create_meeting(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateMeetingRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    validate::title(&req.title)?;
    if req.end_time <= req.start_time {
        return Err(ApiError::BadRequest(
            "end_time must be after start_time".to_string(),
        ));
    }

    let meeting = state
        .db
        .meetings
        .insert(
            auth.id,
            req.title.trim(),
            req.start_time,
            req.end_time,
            req.transcript.as_deref(),
            &req.participants,
        )
        .await?;
    info!(user_id = %auth.id, meeting_id = %meeting.id, "Meeting created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "meeting": meeting,
        })),
    ))
}

/// Get one meeting.
pub async fn get_meeting(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let meeting = state
        .db
        .meetings
        .get(id, auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Meeting not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "meeting": meeting,
    })))
}
