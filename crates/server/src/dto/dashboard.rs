//! # Dashboard Data Transfer Objects

use serde::{Deserialize, Serialize};

use super::feedback::FeedbackResponse;

/// Sentiment rollup for a manager's feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_feedback:     u64,
    pub positive_feedback:  u64,
    pub neutral_feedback:   u64,
    pub negative_feedback:  u64,
    pub team_members_count: u64,
    /// Newest first
    pub recent_feedback:    Vec<FeedbackResponse>,
}
