//! Prompt construction for every AI operation.
//!
//! Each builder returns the user prompt; the matching system prompt and
//! sampling temperature live alongside as constants. All operations run in
//! JSON mode, so every prompt ends by demanding valid JSON and nothing else.

use chrono::{NaiveDate, Utc};
use serde_json::Value as JsonValue;

use omnimind_core::{ExtractionContext, ScheduleConstraints};

pub const EXTRACT_SYSTEM: &str = "You extract tasks from text and return valid JSON only.";
pub const EXTRACT_TEMPERATURE: f32 = 0.1;

pub const SUMMARIZE_SYSTEM: &str =
    "You summarize meetings and extract action items. Return valid JSON only.";
pub const SUMMARIZE_TEMPERATURE: f32 = 0.2;

pub const SCHEDULE_SYSTEM: &str =
    "You are a scheduling optimization expert. Return valid JSON only.";
pub const SCHEDULE_TEMPERATURE: f32 = 0.3;

pub const PRODUCTIVITY_SYSTEM: &str = "You are a productivity analyst. Return valid JSON only.";
pub const PRODUCTIVITY_TEMPERATURE: f32 = 0.2;

pub const CONFLICT_SYSTEM: &str =
    "You are a scheduling conflict detection system. Return valid JSON only.";
pub const CONFLICT_TEMPERATURE: f32 = 0.1;

pub const EMAIL_SYSTEM: &str = "You are an email writing assistant. Return valid JSON only.";
pub const EMAIL_TEMPERATURE: f32 = 0.7;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Build the task extraction prompt.
pub fn extract_tasks(text: &str, context: &ExtractionContext) -> String {
    format!(
        r#"You are an expert task extraction assistant. Extract actionable tasks from the following text.

Text: "{text}"

Context:
- Source: {source}
- Current Date: {date}
- User Timezone: {timezone}

Extract tasks and return as a JSON object with a "tasks" array. Each task should have:
- title (string): Clear, actionable task title
- description (string): More details about the task
- priority (string: "high", "medium", or "low"): Based on urgency and importance
- estimated_duration_minutes (number): Estimated time to complete
- due_date (string in ISO format): If mentioned, extract date. If not, leave null
- category (string): "work", "personal", "meeting", "email", "other"
- assignee (string): If mentioned, who should do it. Default to "me"

If no tasks are found, return an empty array.

Only return valid JSON. No other text."#,
        text = text,
        source = context.source.as_deref().unwrap_or("general"),
        date = today(),
        timezone = context.timezone.as_deref().unwrap_or("UTC"),
    )
}

/// Build the meeting summarization prompt.
pub fn summarize_meeting(transcript: &str, duration_minutes: i32, participants: &[String]) -> String {
    format!(
        r#"You are a meeting summarization expert. Summarize this meeting and extract action items.

Meeting Transcript:
"""
{transcript}
"""

Meeting Details:
- Duration: {duration_minutes} minutes
- Participants: {participants}
- Date: {date}

Provide a comprehensive summary in JSON format with:
- summary (string): 2-3 paragraph summary of key discussion points
- key_decisions (array): List of decisions made
- action_items (array of objects): Each with:
  * task (string): Action item description
  * assignee (string): Person responsible
  * due_date (string): Deadline in ISO format
  * priority (string: "high", "medium", "low")
- next_steps (array): What needs to happen next
- follow_up_meeting (object or null): If needed, with topic and suggested_date

Only return valid JSON. No other text."#,
        transcript = transcript,
        duration_minutes = duration_minutes,
        participants = participants.join(", "),
        date = today(),
    )
}

/// Build the schedule optimization prompt.
pub fn optimize_schedule(tasks: &JsonValue, constraints: &ScheduleConstraints) -> String {
    format!(
        r#"Optimize this schedule considering tasks and constraints.

Tasks (in JSON format):
{tasks}

Constraints:
- Available hours per day: {available_hours}
- Focus hours: {focus_hours}
- Breaks: {break_duration} lunch, {short_break} short breaks every hour
- Avoid scheduling: {avoid_times}
- User preferences: {preferences}

Create an optimized schedule for the next 7 days. Return JSON with:
- daily_schedule (array of objects for each day):
  * date (string)
  * tasks (array of scheduled tasks with start_time, end_time, and task_id)
  * total_hours (number)
  * focus_time_utilization (percentage)
- recommendations (array): Suggestions for better productivity
- warnings (array): If any tasks can't be scheduled

Only return valid JSON. No other text."#,
        tasks = serde_json::to_string_pretty(tasks).unwrap_or_else(|_| tasks.to_string()),
        available_hours = constraints.available_hours.unwrap_or(8),
        focus_hours = constraints.focus_hours.as_deref().unwrap_or("09:00-12:00"),
        break_duration = constraints.break_duration.as_deref().unwrap_or("30 minutes"),
        short_break = constraints.short_break.as_deref().unwrap_or("5 minutes"),
        avoid_times = constraints.avoid_times.as_deref().unwrap_or("none"),
        preferences = constraints
            .preferences
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "{}".to_string()),
    )
}

/// Build the productivity analysis prompt over historical task rows.
pub fn analyze_productivity(task_rows: &JsonValue) -> String {
    format!(
        r#"Analyze this productivity data and provide insights:

Task Data (in JSON):
{rows}

Analyze and return JSON with:
- patterns (object):
  * most_productive_days (array of day names)
  * average_completion_rate (percentage)
  * common_task_types (array)
  * time_estimation_accuracy (percentage)
  * priority_distribution (object with high/medium/low percentages)
- suggestions (array): Specific, actionable suggestions for improvement
- predicted_productivity_score (number 1-100)
- recommended_focus_times (array of best times to work based on patterns)

Only return valid JSON. No other text."#,
        rows = serde_json::to_string_pretty(task_rows).unwrap_or_else(|_| task_rows.to_string()),
    )
}

/// Build the conflict detection prompt over upcoming tasks and meetings.
pub fn detect_conflicts(tasks: &JsonValue, meetings: &JsonValue) -> String {
    format!(
        r#"Analyze these upcoming items for conflicts and provide suggestions:

Upcoming Tasks:
{tasks}

Upcoming Meetings:
{meetings}

Analyze and return JSON with:
- conflicts (array of objects):
  * type (string): "time_conflict", "priority_conflict", "workload_conflict"
  * description (string)
  * items_involved (array of item IDs)
  * severity (string: "high", "medium", "low")
- suggestions (array of objects):
  * type (string): "reschedule", "delegate", "break_down", "prioritize"
  * description (string)
  * items_affected (array of item IDs)
  * estimated_benefit (string)
- workload_assessment (object):
  * total_hours_required (number)
  * available_hours (number, default 40)
  * overload_percentage (number)
  * recommended_adjustments (array)

Only return valid JSON. No other text."#,
        tasks = serde_json::to_string_pretty(tasks).unwrap_or_else(|_| tasks.to_string()),
        meetings = serde_json::to_string_pretty(meetings).unwrap_or_else(|_| meetings.to_string()),
    )
}

/// Build the email reply drafting prompt.
pub fn draft_email_reply(email_content: &str, tone: &str) -> String {
    format!(
        r#"Generate a {tone} email response based on this email:

Email Content:
"""
{email_content}
"""

Generate a response that:
1. Acknowledges the email
2. Addresses any questions or requests
3. Provides necessary information
4. Suggests next steps if needed
5. Closes politely

Return JSON with:
- subject (string): Suggested subject line
- body (string): Complete email body
- key_points (array): Main points covered
- suggested_follow_up (string or null): If follow-up is needed

Only return valid JSON. No other text."#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_prompt_embeds_text_and_context() {
        let ctx = ExtractionContext {
            source: Some("gmail".to_string()),
            timezone: Some("Europe/Berlin".to_string()),
        };
        let prompt = extract_tasks("Send the Q3 report by Friday", &ctx);
        assert!(prompt.contains("Send the Q3 report by Friday"));
        assert!(prompt.contains("Source: gmail"));
        assert!(prompt.contains("User Timezone: Europe/Berlin"));
        assert!(prompt.contains("Only return valid JSON"));
    }

    #[test]
    fn test_extract_prompt_defaults() {
        let prompt = extract_tasks("text", &ExtractionContext::default());
        assert!(prompt.contains("Source: general"));
        assert!(prompt.contains("User Timezone: UTC"));
    }

    #[test]
    fn test_summarize_prompt_embeds_details() {
        let prompt = summarize_meeting(
            "Alice: let's ship Monday.",
            45,
            &["Alice".to_string(), "Bob".to_string()],
        );
        assert!(prompt.contains("Alice: let's ship Monday."));
        assert!(prompt.contains("Duration: 45 minutes"));
        assert!(prompt.contains("Participants: Alice, Bob"));
    }

    #[test]
    fn test_schedule_prompt_defaults() {
        let prompt = optimize_schedule(&json!([]), &ScheduleConstraints::default());
        assert!(prompt.contains("Available hours per day: 8"));
        assert!(prompt.contains("Focus hours: 09:00-12:00"));
        assert!(prompt.contains("Avoid scheduling: none"));
    }

    #[test]
    fn test_schedule_prompt_custom_constraints() {
        let constraints = ScheduleConstraints {
            available_hours: Some(6),
            focus_hours: Some("08:00-11:00".to_string()),
            avoid_times: Some("Friday afternoon".to_string()),
            ..Default::default()
        };
        let prompt = optimize_schedule(&json!([{"id": "t1"}]), &constraints);
        assert!(prompt.contains("Available hours per day: 6"));
        assert!(prompt.contains("08:00-11:00"));
        assert!(prompt.contains("Friday afternoon"));
        assert!(prompt.contains("t1"));
    }

    #[test]
    fn test_conflict_prompt_embeds_both_lists() {
        let prompt = detect_conflicts(&json!([{"id": "task-1"}]), &json!([{"id": "meeting-1"}]));
        assert!(prompt.contains("task-1"));
        assert!(prompt.contains("meeting-1"));
        assert!(prompt.contains("workload_assessment"));
    }

    #[test]
    fn test_email_prompt_embeds_tone() {
        let prompt = draft_email_reply("Can we move the call?", "friendly");
        assert!(prompt.contains("Generate a friendly email response"));
        assert!(prompt.contains("Can we move the call?"));
    }
}
