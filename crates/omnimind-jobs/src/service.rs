//! AI orchestration service.
//!
//! Builds prompts from domain data, calls the generation backend, and
//! deserializes the model's JSON into typed results. All model calls run in
//! JSON mode; a response that does not fit the expected shape surfaces as
//! an inference error instead of propagating arbitrary JSON.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, info};
use uuid::Uuid;

use omnimind_core::{
    defaults, ConflictReport, EmailDraft, Error, ExtractedTask, ExtractionContext,
    GenerationBackend, MeetingSummary, ProductivityReport, Result, ScheduleConstraints,
    SchedulePlan,
};
use omnimind_db::Database;

use crate::prompts;

/// Orchestrates prompted LLM calls over domain data.
pub struct AiService {
    db: Database,
    backend: Arc<dyn GenerationBackend>,
}

impl AiService {
    pub fn new(db: Database, backend: Arc<dyn GenerationBackend>) -> Self {
        Self { db, backend }
    }

    /// The model name of the underlying backend.
    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    /// Extract actionable tasks from unstructured text.
    ///
    /// Accepts either a bare array or a `{"tasks": [...]}` envelope from the
    /// model; both occur in practice.
    pub async fn extract_tasks(
        &self,
        text: &str,
        context: &ExtractionContext,
    ) -> Result<Vec<ExtractedTask>> {
        let prompt = prompts::extract_tasks(text, context);
        let value = self
            .backend
            .generate_json(prompts::EXTRACT_SYSTEM, &prompt, prompts::EXTRACT_TEMPERATURE)
            .await?;

        let tasks = parse_extracted_tasks(value)?;

        info!(
            subsystem = "jobs",
            component = "ai_service",
            op = "extract_tasks",
            task_count = tasks.len(),
            "Extracted tasks from text"
        );
        Ok(tasks)
    }

    /// Summarize a meeting transcript and extract action items.
    pub async fn summarize_meeting(
        &self,
        transcript: &str,
        duration_minutes: i32,
        participants: &[String],
    ) -> Result<MeetingSummary> {
        let prompt = prompts::summarize_meeting(transcript, duration_minutes, participants);
        let value = self
            .backend
            .generate_json(
                prompts::SUMMARIZE_SYSTEM,
                &prompt,
                prompts::SUMMARIZE_TEMPERATURE,
            )
            .await?;

        serde_json::from_value(value)
            .map_err(|e| Error::Inference(format!("Malformed summary response: {e}")))
    }

    /// Produce an optimized 7-day schedule for a task set. Scheduling is
    /// entirely model-produced; there is no local solver.
    pub async fn optimize_schedule(
        &self,
        tasks: &JsonValue,
        constraints: &ScheduleConstraints,
    ) -> Result<SchedulePlan> {
        let prompt = prompts::optimize_schedule(tasks, constraints);
        let value = self
            .backend
            .generate_json(
                prompts::SCHEDULE_SYSTEM,
                &prompt,
                prompts::SCHEDULE_TEMPERATURE,
            )
            .await?;

        serde_json::from_value(value)
            .map_err(|e| Error::Inference(format!("Malformed schedule response: {e}")))
    }

    /// Analyze a user's historical task data for productivity insights.
    ///
    /// An empty history short-circuits to an empty report without a model
    /// call.
    pub async fn analyze_productivity(
        &self,
        user_id: Uuid,
        days: Option<i64>,
    ) -> Result<ProductivityReport> {
        let days = days.unwrap_or(defaults::PRODUCTIVITY_DAYS).clamp(1, 365);
        let rows = self.db.tasks.history_for_analysis(user_id, days).await?;

        if rows.is_empty() {
            debug!(
                subsystem = "jobs",
                component = "ai_service",
                op = "analyze_productivity",
                %user_id,
                "No task history, returning empty report"
            );
            return Ok(ProductivityReport::default());
        }

        let prompt = prompts::analyze_productivity(&JsonValue::Array(rows));
        let value = self
            .backend
            .generate_json(
                prompts::PRODUCTIVITY_SYSTEM,
                &prompt,
                prompts::PRODUCTIVITY_TEMPERATURE,
            )
            .await?;

        serde_json::from_value(value)
            .map_err(|e| Error::Inference(format!("Malformed productivity response: {e}")))
    }

    /// Detect conflicts across a user's upcoming tasks and meetings.
    pub async fn detect_conflicts(&self, user_id: Uuid) -> Result<ConflictReport> {
        let tasks = self.db.tasks.due_within_week(user_id).await?;
        let meetings = self.db.meetings.upcoming_week(user_id).await?;

        let prompt =
            prompts::detect_conflicts(&JsonValue::Array(tasks), &JsonValue::Array(meetings));
        let value = self
            .backend
            .generate_json(
                prompts::CONFLICT_SYSTEM,
                &prompt,
                prompts::CONFLICT_TEMPERATURE,
            )
            .await?;

        serde_json::from_value(value)
            .map_err(|e| Error::Inference(format!("Malformed conflict response: {e}")))
    }

    /// Draft an email reply in the requested tone.
    pub async fn draft_email_reply(&self, email_content: &str, tone: &str) -> Result<EmailDraft> {
        let prompt = prompts::draft_email_reply(email_content, tone);
        let value = self
            .backend
            .generate_json(prompts::EMAIL_SYSTEM, &prompt, prompts::EMAIL_TEMPERATURE)
            .await?;

        serde_json::from_value(value)
            .map_err(|e| Error::Inference(format!("Malformed email draft response: {e}")))
    }
}

/// Parse an extraction response into task descriptors.
///
/// Models sometimes return a bare array despite being asked for an object
/// envelope; both shapes are accepted.
fn parse_extracted_tasks(value: JsonValue) -> Result<Vec<ExtractedTask>> {
    let tasks_value = match value {
        JsonValue::Array(_) => value,
        JsonValue::Object(mut map) => map.remove("tasks").unwrap_or(JsonValue::Array(vec![])),
        _ => {
            return Err(Error::Inference(
                "Extraction response was neither an array nor an object".to_string(),
            ))
        }
    };

    serde_json::from_value(tasks_value)
        .map_err(|e| Error::Inference(format!("Malformed extraction response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_extracted_tasks_envelope() {
        let tasks = parse_extracted_tasks(json!({
            "tasks": [{"title": "Buy milk", "priority": "high"}]
        }))
        .unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Buy milk");
    }

    #[test]
    fn test_parse_extracted_tasks_bare_array() {
        let tasks = parse_extracted_tasks(json!([{"title": "Call Bob"}])).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Call Bob");
    }

    #[test]
    fn test_parse_extracted_tasks_missing_key_is_empty() {
        let tasks = parse_extracted_tasks(json!({"note": "nothing here"})).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_parse_extracted_tasks_scalar_is_error() {
        let err = parse_extracted_tasks(json!("just a string")).unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[test]
    fn test_parse_extracted_tasks_malformed_entry_is_error() {
        // An entry missing the required title does not pass through.
        let err = parse_extracted_tasks(json!({"tasks": [{"priority": "high"}]})).unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }
}
