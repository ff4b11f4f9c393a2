//! Notification HTTP handlers, including preference management and the
//! test-send endpoint.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use omnimind_core::{
    CreateNotificationRequest, NotificationKind, TaskPriority, UpdatePreferencesRequest,
};
use omnimind_mailer::TASK_REMINDER;

use crate::auth::AuthUser;
use crate::{validate, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    pub read: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<NotificationKind>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List the caller's notifications with the unread total.
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (notifications, unread_count) = state
        .db
        .notifications
        .list(auth.id, query.read, query.kind, query.limit, query.offset)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "notifications": notifications,
        "unreadCount": unread_count,
    })))
}

/// Create a notification.
pub async fn create_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    validate::title(&req.title)?;
    validate::notification_message(&req.message)?;

    let notification = state.db.notifications.insert(auth.id, &req).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "notification": notification,
        })),
    ))
}

/// Mark one notification read.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let notification = state.db.notifications.mark_read(id, auth.id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "notification": notification,
    })))
}

/// Mark every unread notification read.
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.notifications.mark_all_read(auth.id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "All notifications marked as read",
    })))
}

/// Delete one notification.
pub async fn delete_notification(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.notifications.delete(id, auth.id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Notification deleted successfully",
    })))
}

/// Clear all of the caller's notifications.
pub async fn clear_all_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.db.notifications.delete_all(auth.id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "All notifications cleared",
    })))
}

/// Fetch notification preferences, defaults when none stored.
pub async fn get_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let preferences = state.db.preferences.get_or_default(auth.id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "preferences": preferences,
    })))
}

/// Upsert notification preferences.
pub async fn update_preferences(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdatePreferencesRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let preferences = state.db.preferences.upsert(auth.id, &req).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "preferences": preferences,
    })))
}

/// Insert a test notification and attempt a real email when SMTP is
/// configured.
pub async fn send_test_notification(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let req = CreateNotificationRequest {
        kind: NotificationKind::Test,
        title: "Test Notification".to_string(),
        message: "This is a test notification from OmniMind.".to_string(),
        priority: TaskPriority::Medium,
        action_url: Some("/dashboard".to_string()),
        metadata: serde_json::json!({}),
        scheduled_for: None,
    };
    let notification = state.db.notifications.insert(auth.id, &req).await?;

    if state.mailer.is_enabled() {
        let mut vars = std::collections::HashMap::new();
        vars.insert("name", auth.email.clone());
        vars.insert("taskTitle", "Test Notification".to_string());
        vars.insert(
            "taskDescription",
            "This is a test notification from OmniMind.".to_string(),
        );
        vars.insert("taskPriority", "medium".to_string());
        vars.insert("dueDate", "now".to_string());
        vars.insert("taskUrl", format!("{}/dashboard", state.client_url));
        vars.insert("settingsUrl", format!("{}/settings", state.client_url));

        if let Err(e) = state
            .mailer
            .send_template(&auth.email, &TASK_REMINDER, &vars)
            .await
        {
            warn!(user_id = %auth.id, error = %e, "Test email send failed");
            return Err(ApiError::Upstream("Failed to send test notification".to_string()));
        }
    }

    info!(user_id = %auth.id, "Test notification sent");
    Ok(Json(serde_json::json!({
        "success": true,
        "notification": notification,
        "message": "Test notification sent successfully",
    })))
}
