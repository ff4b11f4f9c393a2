//! AiService tests against the mock backend.
//!
//! The database handle uses a lazy pool, so no connection is made for the
//! operations under test (none of them touch storage).

use std::sync::Arc;

use omnimind_core::{Error, ExtractionContext, ScheduleConstraints, TaskPriority};
use omnimind_db::Database;
use omnimind_inference::MockBackend;
use omnimind_jobs::AiService;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;

fn service_with(backend: MockBackend) -> AiService {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://localhost/omnimind_unused")
        .expect("lazy pool");
    AiService::new(Database::new(pool), Arc::new(backend))
}

#[tokio::test]
async fn test_extract_tasks_parses_envelope() {
    let backend = MockBackend::new().with_response(json!({
        "tasks": [
            {"title": "Buy milk", "priority": "high", "estimated_duration_minutes": 15},
            {"title": "Send report"}
        ]
    }));
    let service = service_with(backend.clone());

    let tasks = service
        .extract_tasks("Remember to buy milk and send the report", &ExtractionContext::default())
        .await
        .unwrap();

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].title, "Buy milk");
    assert_eq!(tasks[0].priority, TaskPriority::High);
    assert_eq!(tasks[0].estimated_duration_minutes, Some(15));
    // Lenient defaults fill the second task.
    assert_eq!(tasks[1].priority, TaskPriority::Medium);

    // The prompt carried the input text and the JSON-only instruction.
    let calls = backend.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].prompt.contains("Remember to buy milk"));
    assert!(calls[0].json_mode);
}

#[tokio::test]
async fn test_extract_tasks_upstream_failure() {
    let backend = MockBackend::new().with_failure("connection reset");
    let service = service_with(backend);

    let err = service
        .extract_tasks("some text here long enough", &ExtractionContext::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
}

#[tokio::test]
async fn test_summarize_meeting_typed_result() {
    let backend = MockBackend::new().with_response(json!({
        "summary": "The team agreed to ship on Monday.",
        "key_decisions": ["Ship Monday"],
        "action_items": [
            {"task": "Prepare release notes", "assignee": "Ada", "priority": "high"}
        ],
        "next_steps": ["Tag the release"]
    }));
    let service = service_with(backend);

    let summary = service
        .summarize_meeting("transcript text", 45, &["Ada".to_string()])
        .await
        .unwrap();

    assert_eq!(summary.summary, "The team agreed to ship on Monday.");
    assert_eq!(summary.action_items.len(), 1);
    assert_eq!(summary.action_items[0].assignee.as_deref(), Some("Ada"));
    assert!(summary.follow_up_meeting.is_none());
}

#[tokio::test]
async fn test_summarize_meeting_malformed_response() {
    // Valid JSON but the wrong shape: summary must be a string.
    let backend = MockBackend::new().with_response(json!({"summary": 42}));
    let service = service_with(backend);

    let err = service
        .summarize_meeting("transcript", 30, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
}

#[tokio::test]
async fn test_optimize_schedule_plan() {
    let backend = MockBackend::new().with_response(json!({
        "daily_schedule": [
            {"date": "2026-08-07", "tasks": [{"task_id": "t1", "start_time": "09:00", "end_time": "10:00"}], "total_hours": 1.0}
        ],
        "recommendations": ["Batch similar tasks"],
        "warnings": []
    }));
    let service = service_with(backend);

    let plan = service
        .optimize_schedule(&json!([{"id": "t1"}]), &ScheduleConstraints::default())
        .await
        .unwrap();

    assert_eq!(plan.daily_schedule.len(), 1);
    assert_eq!(plan.daily_schedule[0].tasks[0].task_id.as_deref(), Some("t1"));
    assert_eq!(plan.recommendations, vec!["Batch similar tasks"]);
}

#[tokio::test]
async fn test_draft_email_reply() {
    let backend = MockBackend::new().with_response(json!({
        "subject": "Re: Q3 numbers",
        "body": "Thanks for reaching out...",
        "key_points": ["acknowledged"],
        "suggested_follow_up": null
    }));
    let service = service_with(backend.clone());

    let draft = service
        .draft_email_reply("Can you send the Q3 numbers?", "professional")
        .await
        .unwrap();

    assert_eq!(draft.subject, "Re: Q3 numbers");
    assert!(draft.suggested_follow_up.is_none());
    assert!(backend.calls()[0].prompt.contains("professional"));
}
