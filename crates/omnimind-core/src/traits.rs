//! Trait seams shared across crates: the job queue repository and the
//! inference backends.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::{AiJob, JobType, QueueStats, Result};

// =============================================================================
// JOB QUEUE
// =============================================================================

/// Repository for the durable AI-processing queue.
///
/// Claim order is `created_at ASC`; rows are claimed with row-level locking
/// so multiple workers never process the same job twice concurrently.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Insert a new `pending` job and wake any polling worker.
    async fn enqueue(&self, user_id: Uuid, job_type: JobType, input: JsonValue) -> Result<AiJob>;

    /// Claim the next runnable job, marking it `processing`.
    ///
    /// A job is runnable when it is `pending`, or `failed` with
    /// `retry_count < max_retries`.
    async fn claim_next(&self) -> Result<Option<AiJob>>;

    /// Mark a job `completed` with its output.
    async fn complete(&self, job_id: Uuid, output: JsonValue) -> Result<()>;

    /// Record a failed attempt: set `failed`, store the error, and increment
    /// `retry_count` by exactly one.
    async fn fail(&self, job_id: Uuid, error: &str) -> Result<()>;

    /// Get a job by id, scoped to its owner.
    async fn get_for_user(&self, job_id: Uuid, user_id: Uuid) -> Result<Option<AiJob>>;

    /// List a user's jobs, newest first.
    async fn list_for_user(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<AiJob>>;

    /// Count of runnable jobs.
    async fn pending_count(&self) -> Result<i64>;

    /// Aggregate queue statistics.
    async fn queue_stats(&self) -> Result<QueueStats>;

    /// Reset jobs stuck `processing` longer than `stale_secs` back to
    /// `pending` (worker crashed mid-claim). Returns the number reclaimed.
    async fn reclaim_stale(&self, stale_secs: i64) -> Result<i64>;
}

// =============================================================================
// INFERENCE BACKENDS
// =============================================================================

/// Backend for text generation (LLM chat completion).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text with a system + user prompt pair.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Generate a JSON object with a system + user prompt pair.
    ///
    /// The backend requests a JSON-typed response from the model and parses
    /// it; a non-JSON reply is an [`crate::Error::Inference`].
    async fn generate_json(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<JsonValue>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Generation backend with reachability probing.
#[async_trait]
pub trait InferenceBackend: GenerationBackend {
    /// Check if the backend is available and responding.
    async fn health_check(&self) -> Result<bool>;
}
