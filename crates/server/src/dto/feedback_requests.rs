//! # Feedback Request Data Transfer Objects

use chrono::{DateTime, Utc};
use entity::sea_orm_active_enums::RequestStatus;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::users::UserResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRequestResponse {
    pub id:          i32,
    pub employee_id: i32,
    pub message:     String,
    pub status:      RequestStatus,
    pub created_at:  DateTime<Utc>,
    pub employee:    UserResponse,
}

/// An employee asking their manager for feedback
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct CreateFeedbackRequestRequest {
    #[validate(length(min = 1, max = 2000, message = "Message must be between 1 and 2000 characters"))]
    pub message: String,
}
