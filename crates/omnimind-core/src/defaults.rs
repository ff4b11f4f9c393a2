//! Default values for tunable parameters.

/// Maximum retry attempts for a failed AI job.
pub const JOB_MAX_RETRIES: i32 = 3;

/// Delay before a failed job becomes claimable again (seconds).
pub const JOB_RETRY_DELAY_SECS: i64 = 5;

/// Worker polling interval when the queue is empty (milliseconds).
pub const JOB_POLL_INTERVAL_MS: u64 = 500;

/// Maximum jobs processed concurrently by one worker.
pub const JOB_MAX_CONCURRENT: usize = 4;

/// Wall-clock timeout for a single job execution (seconds).
pub const JOB_TIMEOUT_SECS: u64 = 300;

/// Jobs stuck `processing` longer than this are reclaimed (seconds).
pub const JOB_STALE_CLAIM_SECS: i64 = 600;

/// Capacity of the worker event broadcast channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Default lookahead window for upcoming-task queries (days).
pub const UPCOMING_DAYS: i64 = 7;

/// Row cap for the upcoming-task query.
pub const UPCOMING_LIMIT: i64 = 20;

/// Default page size for list endpoints.
pub const LIST_LIMIT: i64 = 50;

/// Maximum page size a client may request.
pub const LIST_LIMIT_MAX: i64 = 100;

/// Default history window for productivity analysis (days).
pub const PRODUCTIVITY_DAYS: i64 = 30;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_cap_is_three() {
        assert_eq!(JOB_MAX_RETRIES, 3);
    }

    #[test]
    fn test_list_limits_sane() {
        assert!(LIST_LIMIT <= LIST_LIMIT_MAX);
        assert!(UPCOMING_LIMIT > 0);
    }
}
