//! Per-job-type handlers dispatching to the AI service.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use omnimind_core::{ExtractionContext, JobType, ScheduleConstraints};

use crate::handler::{JobContext, JobHandler, JobResult};
use crate::service::AiService;

/// Extracts tasks from queued text.
pub struct ExtractTasksHandler {
    service: Arc<AiService>,
}

#[derive(Deserialize)]
struct ExtractInput {
    text: String,
    #[serde(default)]
    context: ExtractionContext,
}

impl ExtractTasksHandler {
    pub fn new(service: Arc<AiService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl JobHandler for ExtractTasksHandler {
    fn job_type(&self) -> JobType {
        JobType::ExtractTasks
    }

    async fn execute(&self, ctx: JobContext) -> JobResult {
        let input: ExtractInput = match serde_json::from_value(ctx.input().clone()) {
            Ok(input) => input,
            Err(e) => return JobResult::Failed(format!("Invalid input payload: {e}")),
        };

        match self.service.extract_tasks(&input.text, &input.context).await {
            Ok(tasks) => match serde_json::to_value(tasks) {
                Ok(value) => JobResult::Success(serde_json::json!({ "tasks": value })),
                Err(e) => JobResult::Failed(format!("Failed to serialize output: {e}")),
            },
            Err(e) => JobResult::Failed(e.to_string()),
        }
    }
}

/// Summarizes a queued meeting transcript.
pub struct SummarizeMeetingHandler {
    service: Arc<AiService>,
}

#[derive(Deserialize)]
struct SummarizeInput {
    transcript: String,
    #[serde(default = "default_duration")]
    duration_minutes: i32,
    #[serde(default)]
    participants: Vec<String>,
}

fn default_duration() -> i32 {
    30
}

impl SummarizeMeetingHandler {
    pub fn new(service: Arc<AiService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl JobHandler for SummarizeMeetingHandler {
    fn job_type(&self) -> JobType {
        JobType::SummarizeMeeting
    }

    async fn execute(&self, ctx: JobContext) -> JobResult {
        let input: SummarizeInput = match serde_json::from_value(ctx.input().clone()) {
            Ok(input) => input,
            Err(e) => return JobResult::Failed(format!("Invalid input payload: {e}")),
        };

        match self
            .service
            .summarize_meeting(&input.transcript, input.duration_minutes, &input.participants)
            .await
        {
            Ok(summary) => match serde_json::to_value(summary) {
                Ok(value) => JobResult::Success(value),
                Err(e) => JobResult::Failed(format!("Failed to serialize output: {e}")),
            },
            Err(e) => JobResult::Failed(e.to_string()),
        }
    }
}

/// Optimizes a queued task set into a 7-day schedule.
pub struct OptimizeScheduleHandler {
    service: Arc<AiService>,
}

#[derive(Deserialize)]
struct OptimizeInput {
    #[serde(default)]
    tasks: JsonValue,
    #[serde(default)]
    constraints: ScheduleConstraints,
}

impl OptimizeScheduleHandler {
    pub fn new(service: Arc<AiService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl JobHandler for OptimizeScheduleHandler {
    fn job_type(&self) -> JobType {
        JobType::OptimizeSchedule
    }

    async fn execute(&self, ctx: JobContext) -> JobResult {
        let input: OptimizeInput = match serde_json::from_value(ctx.input().clone()) {
            Ok(input) => input,
            Err(e) => return JobResult::Failed(format!("Invalid input payload: {e}")),
        };

        match self
            .service
            .optimize_schedule(&input.tasks, &input.constraints)
            .await
        {
            Ok(plan) => match serde_json::to_value(plan) {
                Ok(value) => JobResult::Success(value),
                Err(e) => JobResult::Failed(format!("Failed to serialize output: {e}")),
            },
            Err(e) => JobResult::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_input_parsing() {
        let input: ExtractInput = serde_json::from_value(serde_json::json!({
            "text": "Buy milk",
            "context": {"source": "gmail"}
        }))
        .unwrap();
        assert_eq!(input.text, "Buy milk");
        assert_eq!(input.context.source.as_deref(), Some("gmail"));
    }

    #[test]
    fn test_summarize_input_defaults() {
        let input: SummarizeInput =
            serde_json::from_value(serde_json::json!({"transcript": "..."})).unwrap();
        assert_eq!(input.duration_minutes, 30);
        assert!(input.participants.is_empty());
    }

    #[test]
    fn test_optimize_input_defaults() {
        let input: OptimizeInput = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(input.tasks.is_null());
        assert!(input.constraints.available_hours.is_none());
    }
}
