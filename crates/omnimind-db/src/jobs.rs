//! AI-processing queue repository.
//!
//! The queue is a plain table claimed with `FOR UPDATE SKIP LOCKED`, so
//! jobs survive process restarts and concurrent workers never double-claim.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value as JsonValue;
use sqlx::{Pool, Postgres, Row};
use tokio::sync::Notify;
use uuid::Uuid;

use omnimind_core::{
    new_v7, AiJob, Error, JobRepository, JobStatus, JobType, QueueStats, Result,
};

/// PostgreSQL implementation of JobRepository.
///
/// Clones share the wake handle, so an enqueue through any clone wakes a
/// worker polling through another.
#[derive(Clone)]
pub struct PgJobRepository {
    pool: Pool<Postgres>,
    /// Notify handle for event-driven worker wake.
    notify: Arc<Notify>,
}

const JOB_COLUMNS: &str = "id, user_id, job_type::text AS job_type, status::text AS status, \
     input, output, error_message, retry_count, max_retries, \
     created_at, started_at, processed_at";

impl PgJobRepository {
    /// Create a new PgJobRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            notify: Arc::new(Notify::new()),
        }
    }

    /// Get the job notification handle for event-driven waking.
    pub fn job_notify(&self) -> Arc<Notify> {
        self.notify.clone()
    }

    /// Parse a queue row into an AiJob.
    fn parse_job_row(row: sqlx::postgres::PgRow) -> AiJob {
        let job_type: String = row.get("job_type");
        let status: String = row.get("status");
        AiJob {
            id: row.get("id"),
            user_id: row.get("user_id"),
            job_type: JobType::parse(&job_type).unwrap_or(JobType::ExtractTasks),
            status: JobStatus::parse(&status).unwrap_or(JobStatus::Pending),
            input: row.get("input"),
            output: row.get("output"),
            error_message: row.get("error_message"),
            retry_count: row.get("retry_count"),
            max_retries: row.get("max_retries"),
            created_at: row.get("created_at"),
            started_at: row.get("started_at"),
            processed_at: row.get("processed_at"),
        }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn enqueue(&self, user_id: Uuid, job_type: JobType, input: JsonValue) -> Result<AiJob> {
        let job_id = new_v7();
        let now = Utc::now();

        let query = format!(
            "INSERT INTO ai_processing_queue (id, user_id, job_type, status, input, max_retries, created_at)
             VALUES ($1, $2, $3::ai_job_type, 'pending'::ai_job_status, $4, $5, $6)
             RETURNING {JOB_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(job_id)
            .bind(user_id)
            .bind(job_type.as_str())
            .bind(&input)
            .bind(omnimind_core::defaults::JOB_MAX_RETRIES)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        self.notify.notify_waiters();
        Ok(Self::parse_job_row(row))
    }

    async fn claim_next(&self) -> Result<Option<AiJob>> {
        let now = Utc::now();

        // SKIP LOCKED keeps concurrent workers from fighting over one row.
        // Failed rows with retries left become claimable again after a fixed
        // delay, so retries survive a process restart without spinning.
        let query = format!(
            "UPDATE ai_processing_queue
             SET status = 'processing'::ai_job_status, started_at = $1
             WHERE id = (
                 SELECT id FROM ai_processing_queue
                 WHERE status = 'pending'::ai_job_status
                    OR (status = 'failed'::ai_job_status
                        AND retry_count < max_retries
                        AND processed_at < NOW() - make_interval(secs => $2))
                 ORDER BY created_at ASC
                 LIMIT 1
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING {JOB_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(now)
            .bind(omnimind_core::defaults::JOB_RETRY_DELAY_SECS as f64)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(Self::parse_job_row))
    }

    async fn complete(&self, job_id: Uuid, output: JsonValue) -> Result<()> {
        let now = Utc::now();

        sqlx::query(
            "UPDATE ai_processing_queue
             SET status = 'completed'::ai_job_status, output = $1, error_message = NULL,
                 processed_at = $2
             WHERE id = $3",
        )
        .bind(&output)
        .bind(now)
        .bind(job_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }

    async fn fail(&self, job_id: Uuid, error: &str) -> Result<()> {
        let now = Utc::now();

        // Every failed attempt increments retry_count by exactly one; the
        // claim query stops picking the row up once the cap is reached.
        let result = sqlx::query(
            "UPDATE ai_processing_queue
             SET status = 'failed'::ai_job_status, error_message = $1,
                 retry_count = retry_count + 1, processed_at = $2
             WHERE id = $3",
        )
        .bind(error)
        .bind(now)
        .bind(job_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() > 0 {
            // A retryable failure is new work for the next poll cycle.
            self.notify.notify_waiters();
        }
        Ok(())
    }

    async fn get_for_user(&self, job_id: Uuid, user_id: Uuid) -> Result<Option<AiJob>> {
        let query = format!("SELECT {JOB_COLUMNS} FROM ai_processing_queue WHERE id = $1 AND user_id = $2");
        let row = sqlx::query(&query)
            .bind(job_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(Self::parse_job_row))
    }

    async fn list_for_user(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<AiJob>> {
        let query = format!(
            "SELECT {JOB_COLUMNS} FROM ai_processing_queue
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(rows.into_iter().map(Self::parse_job_row).collect())
    }

    async fn pending_count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM ai_processing_queue
             WHERE status = 'pending'::ai_job_status
                OR (status = 'failed'::ai_job_status AND retry_count < max_retries)",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(count)
    }

    async fn queue_stats(&self) -> Result<QueueStats> {
        let row = sqlx::query(
            "SELECT
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'processing') AS processing,
                COUNT(*) FILTER (WHERE status = 'completed' AND processed_at > NOW() - INTERVAL '1 hour') AS completed_last_hour,
                COUNT(*) FILTER (WHERE status = 'failed' AND processed_at > NOW() - INTERVAL '1 hour') AS failed_last_hour,
                COUNT(*) AS total
             FROM ai_processing_queue",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(QueueStats {
            pending: row.get::<i64, _>("pending"),
            processing: row.get::<i64, _>("processing"),
            completed_last_hour: row.get::<i64, _>("completed_last_hour"),
            failed_last_hour: row.get::<i64, _>("failed_last_hour"),
            total: row.get::<i64, _>("total"),
        })
    }

    async fn reclaim_stale(&self, stale_secs: i64) -> Result<i64> {
        let result = sqlx::query(
            "UPDATE ai_processing_queue
             SET status = 'pending'::ai_job_status, started_at = NULL
             WHERE status = 'processing'::ai_job_status
               AND started_at < NOW() - make_interval(secs => $1)",
        )
        .bind(stale_secs as f64)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        let reclaimed = result.rows_affected() as i64;
        if reclaimed > 0 {
            self.notify.notify_waiters();
        }
        Ok(reclaimed)
    }
}

#[cfg(test)]
mod tests {
    use omnimind_core::{JobStatus, JobType};

    #[test]
    fn test_job_type_strings_match_db_enum() {
        // Must stay in sync with the ai_job_type Postgres enum.
        assert_eq!(JobType::ExtractTasks.as_str(), "extract_tasks");
        assert_eq!(JobType::SummarizeMeeting.as_str(), "summarize_meeting");
        assert_eq!(JobType::OptimizeSchedule.as_str(), "optimize_schedule");
    }

    #[test]
    fn test_job_status_strings_match_db_enum() {
        // Must stay in sync with the ai_job_status Postgres enum.
        assert_eq!(JobStatus::Pending.as_str(), "pending");
        assert_eq!(JobStatus::Processing.as_str(), "processing");
        assert_eq!(JobStatus::Completed.as_str(), "completed");
        assert_eq!(JobStatus::Failed.as_str(), "failed");
    }

    #[test]
    fn test_job_type_strings_are_unique() {
        let strings = [
            JobType::ExtractTasks.as_str(),
            JobType::SummarizeMeeting.as_str(),
            JobType::OptimizeSchedule.as_str(),
        ];
        let mut unique = strings.to_vec();
        unique.sort();
        unique.dedup();
        assert_eq!(strings.len(), unique.len());
    }
}
