//! Job handler trait and execution context.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use omnimind_core::{AiJob, JobType};

/// Context provided to job handlers.
pub struct JobContext {
    /// The job being processed.
    pub job: AiJob,
}

impl JobContext {
    pub fn new(job: AiJob) -> Self {
        Self { job }
    }

    /// The owning user's id.
    pub fn user_id(&self) -> Uuid {
        self.job.user_id
    }

    /// The job's input payload.
    pub fn input(&self) -> &JsonValue {
        &self.job.input
    }
}

/// Result of job execution.
#[derive(Debug)]
pub enum JobResult {
    /// Job completed successfully with its output.
    Success(JsonValue),
    /// Job failed with an error message; the queue decides whether it is
    /// retried.
    Failed(String),
}

/// Trait for job handlers.
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// The job type this handler processes.
    fn job_type(&self) -> JobType;

    /// Execute the job.
    async fn execute(&self, ctx: JobContext) -> JobResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use omnimind_core::JobStatus;

    fn sample_job(input: JsonValue) -> AiJob {
        AiJob {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            job_type: JobType::ExtractTasks,
            status: JobStatus::Processing,
            input,
            output: None,
            error_message: None,
            retry_count: 0,
            max_retries: 3,
            created_at: Utc::now(),
            started_at: Some(Utc::now()),
            processed_at: None,
        }
    }

    #[test]
    fn test_context_accessors() {
        let job = sample_job(serde_json::json!({"text": "Buy milk"}));
        let user_id = job.user_id;
        let ctx = JobContext::new(job);
        assert_eq!(ctx.user_id(), user_id);
        assert_eq!(ctx.input()["text"], "Buy milk");
    }

    #[test]
    fn test_job_result_variants() {
        assert!(matches!(
            JobResult::Success(serde_json::json!({"ok": true})),
            JobResult::Success(_)
        ));
        assert!(matches!(
            JobResult::Failed("boom".to_string()),
            JobResult::Failed(_)
        ));
    }
}
