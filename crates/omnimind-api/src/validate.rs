//! Field-level request validation.
//!
//! Bounds mirror the product's rules: titles up to 500 chars, extraction
//! text 10–10000 chars, transcripts 50–50000 chars, meeting durations up to
//! 8 hours.

use std::sync::OnceLock;

use regex::Regex;

use crate::ApiError;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn hex_color_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").unwrap())
}

fn bad_request(field: &str, message: &str) -> ApiError {
    ApiError::BadRequest(format!("{field}: {message}"))
}

/// A syntactically plausible email address.
pub fn email(value: &str) -> Result<(), ApiError> {
    if email_re().is_match(value.trim()) {
        Ok(())
    } else {
        Err(bad_request("email", "Please provide a valid email address"))
    }
}

/// Passwords must be at least 6 characters.
pub fn password(value: &str) -> Result<(), ApiError> {
    if value.len() >= 6 {
        Ok(())
    } else {
        Err(bad_request(
            "password",
            "Password must be at least 6 characters long",
        ))
    }
}

/// Display names: 2–100 characters.
pub fn name(value: &str) -> Result<(), ApiError> {
    let len = value.trim().chars().count();
    if (2..=100).contains(&len) {
        Ok(())
    } else {
        Err(bad_request("name", "Name must be between 2 and 100 characters"))
    }
}

/// Titles: 1–500 characters.
pub fn title(value: &str) -> Result<(), ApiError> {
    let len = value.trim().chars().count();
    if (1..=500).contains(&len) {
        Ok(())
    } else {
        Err(bad_request(
            "title",
            "Title must be between 1 and 500 characters",
        ))
    }
}

/// Descriptions: at most 5000 characters.
pub fn description(value: &str) -> Result<(), ApiError> {
    if value.chars().count() <= 5000 {
        Ok(())
    } else {
        Err(bad_request(
            "description",
            "Description cannot exceed 5000 characters",
        ))
    }
}

/// Hex color in `#RGB` or `#RRGGBB` form.
pub fn hex_color(value: &str) -> Result<(), ApiError> {
    if hex_color_re().is_match(value) {
        Ok(())
    } else {
        Err(bad_request(
            "color",
            "Invalid color format. Use hex format (#RRGGBB)",
        ))
    }
}

/// Task duration estimates: 1–1440 minutes.
pub fn estimated_duration(value: i32) -> Result<(), ApiError> {
    if (1..=1440).contains(&value) {
        Ok(())
    } else {
        Err(bad_request(
            "estimated_duration",
            "Estimated duration must be between 1 and 1440 minutes",
        ))
    }
}

/// Extraction input text: 10–10000 characters.
pub fn extraction_text(value: &str) -> Result<(), ApiError> {
    let len = value.trim().chars().count();
    if (10..=10_000).contains(&len) {
        Ok(())
    } else {
        Err(bad_request(
            "text",
            "Text must be between 10 and 10000 characters",
        ))
    }
}

/// Meeting transcripts: 50–50000 characters.
pub fn transcript(value: &str) -> Result<(), ApiError> {
    let len = value.trim().chars().count();
    if (50..=50_000).contains(&len) {
        Ok(())
    } else {
        Err(bad_request(
            "transcript",
            "Transcript must be between 50 and 50000 characters",
        ))
    }
}

/// Meeting durations: 1–480 minutes.
pub fn meeting_duration(value: i32) -> Result<(), ApiError> {
    if (1..=480).contains(&value) {
        Ok(())
    } else {
        Err(bad_request(
            "duration_minutes",
            "Duration must be between 1 and 480 minutes",
        ))
    }
}

/// Notification message bodies: 1–1000 characters.
pub fn notification_message(value: &str) -> Result<(), ApiError> {
    let len = value.trim().chars().count();
    if (1..=1000).contains(&len) {
        Ok(())
    } else {
        Err(bad_request(
            "message",
            "Message must be between 1 and 1000 characters",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(email("user@example.com").is_ok());
        assert!(email("u@e.co").is_ok());
        assert!(email("not-an-email").is_err());
        assert!(email("a b@example.com").is_err());
        assert!(email("user@nodot").is_err());
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(password("123456").is_ok());
        assert!(password("12345").is_err());
    }

    #[test]
    fn test_title_bounds() {
        assert!(title("x").is_ok());
        assert!(title("").is_err());
        assert!(title("   ").is_err());
        assert!(title(&"x".repeat(500)).is_ok());
        assert!(title(&"x".repeat(501)).is_err());
    }

    #[test]
    fn test_hex_color() {
        assert!(hex_color("#3B82F6").is_ok());
        assert!(hex_color("#fff").is_ok());
        assert!(hex_color("3B82F6").is_err());
        assert!(hex_color("#GGGGGG").is_err());
    }

    #[test]
    fn test_extraction_text_bounds() {
        assert!(extraction_text("ten chars!").is_ok());
        assert!(extraction_text("too short").is_err());
        assert!(extraction_text(&"x".repeat(10_001)).is_err());
    }

    #[test]
    fn test_transcript_bounds() {
        assert!(transcript(&"x".repeat(50)).is_ok());
        assert!(transcript(&"x".repeat(49)).is_err());
    }

    #[test]
    fn test_meeting_duration_bounds() {
        assert!(meeting_duration(1).is_ok());
        assert!(meeting_duration(480).is_ok());
        assert!(meeting_duration(0).is_err());
        assert!(meeting_duration(481).is_err());
    }

    #[test]
    fn test_estimated_duration_bounds() {
        assert!(estimated_duration(60).is_ok());
        assert!(estimated_duration(0).is_err());
        assert!(estimated_duration(1441).is_err());
    }
}
