// src/models/announcement.rs

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::utils::sanitized_json::RichText;

static COURSE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{2,32}$").expect("course code regex"));

/// A course announcement as stored and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Uuid,

    /// Course code (e.g., "cs101").
    pub course: String,

    /// Plain text, escaped.
    pub title: String,

    /// Rich text, markup-sanitized.
    pub body: String,

    /// `sub` claim of the instructor who posted it.
    pub author_id: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for posting an announcement.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    #[validate(custom(function = validate_course_code))]
    pub course: String,

    #[validate(length(
        min = 1,
        max = 200,
        message = "Title length must be between 1 and 200 chars"
    ))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 20000,
        message = "Body length must be between 1 and 20000 chars"
    ))]
    pub body: String,
}

impl RichText for CreateAnnouncementRequest {
    const RICH_TEXT_FIELDS: &'static [&'static str] = &["body"];
}

/// Query parameters for listing announcements.
#[derive(Debug, Deserialize)]
pub struct AnnouncementListParams {
    pub course: Option<String>,
}

fn validate_course_code(code: &str) -> Result<(), validator::ValidationError> {
    if !COURSE_CODE.is_match(code) {
        return Err(validator::ValidationError::new("invalid_course_code"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(course: &str, title: &str) -> CreateAnnouncementRequest {
        CreateAnnouncementRequest {
            course: course.to_string(),
            title: title.to_string(),
            body: "b".to_string(),
        }
    }

    #[test]
    fn course_code_shape_is_enforced() {
        assert!(request("cs-101_a", "t").validate().is_ok());
        assert!(request("c", "t").validate().is_err());
        assert!(request("cs 101", "t").validate().is_err());
        assert!(request("cs&lt;101", "t").validate().is_err());
    }

    #[test]
    fn empty_title_is_rejected() {
        assert!(request("cs101", "").validate().is_err());
    }
}
