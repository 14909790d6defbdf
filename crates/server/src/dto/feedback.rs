//! # Feedback Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::Sentiment;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{tags::TagResponse, users::UserResponse};

/// Feedback item with its manager, employee and tags embedded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub id:               i32,
    pub manager_id:       i32,
    pub employee_id:      i32,
    pub strengths:        String,
    pub areas_to_improve: String,
    pub sentiment:        Sentiment,
    pub created_at:       DateTime<Utc>,
    pub updated_at:       DateTime<Utc>,
    pub acknowledged:     bool,
    pub acknowledged_at:  Option<DateTime<Utc>>,
    pub manager:          UserResponse,
    pub employee:         UserResponse,
    pub tags:             Vec<TagResponse>,
}

/// Request body for new feedback
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    pub employee_id:      i32,
    #[validate(length(min = 1, message = "Strengths must not be empty"))]
    pub strengths:        String,
    #[validate(length(min = 1, message = "Areas to improve must not be empty"))]
    pub areas_to_improve: String,
    pub sentiment:        Sentiment,
    /// Unknown ids are ignored
    #[serde(default)]
    pub tag_ids:          Vec<i32>,
}

/// Partial update. Absent fields are left untouched; `tag_ids` replaces the
/// whole tag set when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UpdateFeedbackRequest {
    #[validate(length(min = 1, message = "Strengths must not be empty"))]
    pub strengths:        Option<String>,
    #[validate(length(min = 1, message = "Areas to improve must not be empty"))]
    pub areas_to_improve: Option<String>,
    pub sentiment:        Option<Sentiment>,
    pub tag_ids:          Option<Vec<i32>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_ids_default_to_empty() {
        let req: CreateFeedbackRequest = serde_json::from_value(serde_json::json!({
            "employee_id": 2,
            "strengths": "Clear status updates",
            "areas_to_improve": "Estimate more carefully",
            "sentiment": "positive"
        }))
        .unwrap();
        assert!(req.tag_ids.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_distinguishes_absent_and_empty_tags() {
        let absent: UpdateFeedbackRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        let cleared: UpdateFeedbackRequest = serde_json::from_value(serde_json::json!({ "tag_ids": [] })).unwrap();

        assert_eq!(absent.tag_ids, None);
        assert_eq!(cleared.tag_ids, Some(vec![]));
    }

    #[test]
    fn test_unknown_sentiment_rejected() {
        let result: Result<UpdateFeedbackRequest, _> = serde_json::from_value(serde_json::json!({ "sentiment": "great" }));
        assert!(result.is_err());
    }
}
