//! Domain models, enums, and request/response DTOs for the OmniMind backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

// =============================================================================
// STATUS / PRIORITY ENUMS
// =============================================================================

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Completed,
    Archived,
    OnHold,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
            ProjectStatus::OnHold => "on_hold",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ProjectStatus::Active),
            "completed" => Some(ProjectStatus::Completed),
            "archived" => Some(ProjectStatus::Archived),
            "on_hold" => Some(ProjectStatus::OnHold),
            _ => None,
        }
    }
}

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
    Blocked,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(TaskStatus::Todo),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            "blocked" => Some(TaskStatus::Blocked),
            "cancelled" => Some(TaskStatus::Cancelled),
            _ => None,
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

/// Kind of notification delivered to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
    Reminder,
    Achievement,
    System,
    Test,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
            NotificationKind::Reminder => "reminder",
            NotificationKind::Achievement => "achievement",
            NotificationKind::System => "system",
            NotificationKind::Test => "test",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "info" => Some(NotificationKind::Info),
            "warning" => Some(NotificationKind::Warning),
            "error" => Some(NotificationKind::Error),
            "reminder" => Some(NotificationKind::Reminder),
            "achievement" => Some(NotificationKind::Achievement),
            "system" => Some(NotificationKind::System),
            "test" => Some(NotificationKind::Test),
            _ => None,
        }
    }
}

// =============================================================================
// USERS
// =============================================================================

/// A user account row. Carries the password hash; never serialize directly
/// into an HTTP response — use [`UserProfile`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub timezone: String,
    pub role: String,
    pub settings: JsonValue,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub timezone: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            name: u.name.clone(),
            avatar_url: u.avatar_url.clone(),
            timezone: u.timezone.clone(),
            role: u.role.clone(),
            created_at: u.created_at,
        }
    }
}

// =============================================================================
// PROJECTS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub metadata: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project row with task aggregates, as returned by list queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,
    pub task_count: i64,
    pub completed_tasks: i64,
}

/// Abbreviated task embedded in a project detail response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskBrief {
    pub id: Uuid,
    pub title: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
}

/// Full project view with its tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub tasks: Vec<TaskBrief>,
}

/// Per-status aggregate row for the project stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectStatusStats {
    pub status: ProjectStatus,
    pub count: i64,
    pub overdue: i64,
}

// =============================================================================
// TASKS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub estimated_duration: Option<i32>,
    pub actual_duration: Option<i32>,
    pub tags: Vec<String>,
    pub metadata: JsonValue,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task row joined with its project's display fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskWithProject {
    #[serde(flatten)]
    pub task: Task,
    pub project_name: Option<String>,
    pub project_color: Option<String>,
}

/// Pagination metadata for task list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

#[derive(Debug, Clone)]
pub struct TaskListPage {
    pub tasks: Vec<TaskWithProject>,
    pub pagination: Pagination,
}

// =============================================================================
// MEETINGS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub source: Option<String>,
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub action_items: JsonValue,
    pub participants: Vec<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub priority: TaskPriority,
    pub read: bool,
    pub action_url: Option<String>,
    pub metadata: JsonValue,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Per-user preference blobs (one row per user).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    pub notification_settings: JsonValue,
    pub ai_preferences: JsonValue,
    pub theme: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            notification_settings: serde_json::json!({
                "email": true,
                "push": true,
                "sms": false,
                "dailyDigest": true,
                "quietHours": {"enabled": false, "start": "22:00", "end": "08:00"}
            }),
            ai_preferences: serde_json::json!({
                "autoExtractTasks": true,
                "autoSchedule": true,
                "smartPrioritization": true,
                "language": "en"
            }),
            theme: "light".to_string(),
        }
    }
}

// =============================================================================
// AI PROCESSING QUEUE
// =============================================================================

/// Type of AI job to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    /// Extract actionable tasks from unstructured text
    ExtractTasks,
    /// Summarize a meeting transcript and extract action items
    SummarizeMeeting,
    /// Produce an optimized 7-day schedule for a task set
    OptimizeSchedule,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::ExtractTasks => "extract_tasks",
            JobType::SummarizeMeeting => "summarize_meeting",
            JobType::OptimizeSchedule => "optimize_schedule",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "extract_tasks" => Some(JobType::ExtractTasks),
            "summarize_meeting" => Some(JobType::SummarizeMeeting),
            "optimize_schedule" => Some(JobType::OptimizeSchedule),
            _ => None,
        }
    }
}

/// Lifecycle status of a queue entry.
///
/// Transitions: `pending → processing → {completed | failed}`, with
/// `failed → processing` re-claims while `retry_count < max_retries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(JobStatus::Pending),
            "processing" => Some(JobStatus::Processing),
            "completed" => Some(JobStatus::Completed),
            "failed" => Some(JobStatus::Failed),
            _ => None,
        }
    }
}

/// A deferred AI-processing request and its lifecycle state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiJob {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_type: JobType,
    pub status: JobStatus,
    pub input: JsonValue,
    pub output: Option<JsonValue>,
    pub error_message: Option<String>,
    pub retry_count: i32,
    pub max_retries: i32,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// Queue statistics summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStats {
    pub pending: i64,
    pub processing: i64,
    pub completed_last_hour: i64,
    pub failed_last_hour: i64,
    pub total: i64,
}

// =============================================================================
// REQUEST DTOs
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Allow-listed profile update. Unknown keys are rejected at
/// deserialization time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub timezone: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_project_color")]
    pub color: String,
    #[serde(default = "default_project_icon")]
    pub icon: String,
    pub due_date: Option<DateTime<Utc>>,
}

fn default_project_color() -> String {
    "#3B82F6".to_string()
}

fn default_project_icon() -> String {
    "📋".to_string()
}

/// Allow-listed project update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl UpdateProjectRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.color.is_none()
            && self.icon.is_none()
            && self.due_date.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    pub project_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_task_status")]
    pub status: TaskStatus,
    #[serde(default = "default_task_priority")]
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub estimated_duration: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_task_status() -> TaskStatus {
    TaskStatus::Todo
}

fn default_task_priority() -> TaskPriority {
    TaskPriority::Medium
}

/// Allow-listed task update. Setting `status` to `completed` stamps
/// `completed_at`; any other status clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTaskRequest {
    pub project_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub estimated_duration: Option<i32>,
    pub actual_duration: Option<i32>,
    pub tags: Option<Vec<String>>,
}

impl UpdateTaskRequest {
    pub fn is_empty(&self) -> bool {
        self.project_id.is_none()
            && self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.estimated_duration.is_none()
            && self.actual_duration.is_none()
            && self.tags.is_none()
    }
}

/// Filter and paging parameters for the task list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskListFilter {
    pub project_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date_from: Option<DateTime<Utc>>,
    pub due_date_to: Option<DateTime<Utc>>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateNotificationRequest {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default = "default_task_priority")]
    pub priority: TaskPriority,
    pub action_url: Option<String>,
    #[serde(default = "empty_object")]
    pub metadata: JsonValue,
    pub scheduled_for: Option<DateTime<Utc>>,
}

fn empty_object() -> JsonValue {
    serde_json::json!({})
}

/// Allow-listed preference update; absent blobs keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePreferencesRequest {
    pub notification_settings: Option<JsonValue>,
    pub ai_preferences: Option<JsonValue>,
    pub theme: Option<String>,
}

// =============================================================================
// AI REQUEST / RESULT TYPES
// =============================================================================

/// Contextual metadata attached to a task extraction request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionContext {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractTasksRequest {
    pub text: String,
    #[serde(default)]
    pub context: ExtractionContext,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizeMeetingRequest {
    pub transcript: String,
    pub duration_minutes: i32,
    #[serde(default)]
    pub participants: Vec<String>,
    /// When present, the summary and action items are persisted onto this
    /// meeting row (owner-scoped).
    pub meeting_id: Option<Uuid>,
}

/// Scheduling constraints forwarded verbatim into the optimization prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleConstraints {
    #[serde(default)]
    pub available_hours: Option<i32>,
    #[serde(default)]
    pub focus_hours: Option<String>,
    #[serde(default)]
    pub break_duration: Option<String>,
    #[serde(default)]
    pub short_break: Option<String>,
    #[serde(default)]
    pub avoid_times: Option<String>,
    #[serde(default)]
    pub preferences: Option<JsonValue>,
}

/// Body for enqueueing a deferred AI job.
#[derive(Debug, Clone, Deserialize)]
pub struct EnqueueJobRequest {
    pub job_type: JobType,
    pub input: JsonValue,
}

/// A task descriptor produced by the extraction model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_task_priority")]
    pub priority: TaskPriority,
    #[serde(default)]
    pub estimated_duration_minutes: Option<i32>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
}

/// An action item extracted from a meeting transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItem {
    pub task: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default = "default_task_priority")]
    pub priority: TaskPriority,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FollowUpMeeting {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub suggested_date: Option<String>,
}

/// Structured meeting summary returned by the summarization model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingSummary {
    pub summary: String,
    #[serde(default)]
    pub key_decisions: Vec<String>,
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default)]
    pub follow_up_meeting: Option<FollowUpMeeting>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduledSlot {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduledDay {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub tasks: Vec<ScheduledSlot>,
    #[serde(default)]
    pub total_hours: Option<f64>,
    #[serde(default)]
    pub focus_time_utilization: Option<f64>,
}

/// Model-produced 7-day schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulePlan {
    #[serde(default)]
    pub daily_schedule: Vec<ScheduledDay>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Insights derived from historical task data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductivityReport {
    #[serde(default = "empty_object")]
    pub patterns: JsonValue,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub predicted_productivity_score: Option<f64>,
    #[serde(default)]
    pub recommended_focus_times: Vec<String>,
}

impl Default for ProductivityReport {
    fn default() -> Self {
        Self {
            patterns: empty_object(),
            suggestions: Vec::new(),
            predicted_productivity_score: None,
            recommended_focus_times: Vec::new(),
        }
    }
}

/// Conflict analysis over upcoming tasks and meetings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConflictReport {
    #[serde(default)]
    pub conflicts: Vec<JsonValue>,
    #[serde(default)]
    pub suggestions: Vec<JsonValue>,
    #[serde(default)]
    pub workload_assessment: JsonValue,
}

/// A drafted email response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailDraft {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub suggested_follow_up: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_round_trip() {
        for status in [
            TaskStatus::Todo,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Blocked,
            TaskStatus::Cancelled,
        ] {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_task_status_unknown() {
        assert_eq!(TaskStatus::parse("done"), None);
        assert_eq!(TaskStatus::parse(""), None);
        assert_eq!(TaskStatus::parse("TODO"), None);
    }

    #[test]
    fn test_project_status_round_trip() {
        for status in [
            ProjectStatus::Active,
            ProjectStatus::Completed,
            ProjectStatus::Archived,
            ProjectStatus::OnHold,
        ] {
            assert_eq!(ProjectStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_job_type_round_trip() {
        for job_type in [
            JobType::ExtractTasks,
            JobType::SummarizeMeeting,
            JobType::OptimizeSchedule,
        ] {
            assert_eq!(JobType::parse(job_type.as_str()), Some(job_type));
        }
    }

    #[test]
    fn test_job_status_round_trip() {
        for status in [
            JobStatus::Pending,
            JobStatus::Processing,
            JobStatus::Completed,
            JobStatus::Failed,
        ] {
            assert_eq!(JobStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_job_type_serde_snake_case() {
        let json = serde_json::to_string(&JobType::ExtractTasks).unwrap();
        assert_eq!(json, "\"extract_tasks\"");
        let parsed: JobType = serde_json::from_str("\"summarize_meeting\"").unwrap();
        assert_eq!(parsed, JobType::SummarizeMeeting);
    }

    #[test]
    fn test_update_task_request_rejects_unknown_fields() {
        let result =
            serde_json::from_str::<UpdateTaskRequest>(r#"{"title": "x", "user_id": "abc"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_task_request_is_empty() {
        let empty: UpdateTaskRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());

        let with_title: UpdateTaskRequest =
            serde_json::from_str(r#"{"title": "Write report"}"#).unwrap();
        assert!(!with_title.is_empty());
    }

    #[test]
    fn test_update_project_request_rejects_created_at() {
        let result =
            serde_json::from_str::<UpdateProjectRequest>(r#"{"created_at": "2026-01-01"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_task_request_defaults() {
        let req: CreateTaskRequest = serde_json::from_str(r#"{"title": "Write report"}"#).unwrap();
        assert_eq!(req.status, TaskStatus::Todo);
        assert_eq!(req.priority, TaskPriority::Medium);
        assert!(req.tags.is_empty());
        assert!(req.project_id.is_none());
    }

    #[test]
    fn test_create_project_request_defaults() {
        let req: CreateProjectRequest = serde_json::from_str(r#"{"name": "Launch"}"#).unwrap();
        assert_eq!(req.color, "#3B82F6");
        assert_eq!(req.icon, "📋");
    }

    #[test]
    fn test_extracted_task_lenient_parse() {
        let task: ExtractedTask = serde_json::from_str(r#"{"title": "Buy milk"}"#).unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.priority, TaskPriority::Medium);
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_meeting_summary_lenient_parse() {
        let summary: MeetingSummary =
            serde_json::from_str(r#"{"summary": "We discussed the launch."}"#).unwrap();
        assert!(summary.action_items.is_empty());
        assert!(summary.follow_up_meeting.is_none());
    }

    #[test]
    fn test_user_preferences_defaults() {
        let prefs = UserPreferences::default();
        assert_eq!(prefs.theme, "light");
        assert_eq!(prefs.notification_settings["email"], true);
        assert_eq!(prefs.ai_preferences["autoExtractTasks"], true);
    }

    #[test]
    fn test_user_profile_from_user_omits_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@b.c".into(),
            name: "A".into(),
            password_hash: "secret".into(),
            avatar_url: None,
            timezone: "UTC".into(),
            role: "user".into(),
            settings: serde_json::json!({}),
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let profile = UserProfile::from(&user);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("a@b.c"));
    }

    #[test]
    fn test_notification_kind_parse() {
        assert_eq!(NotificationKind::parse("reminder"), Some(NotificationKind::Reminder));
        assert_eq!(NotificationKind::parse("bogus"), None);
    }
}
