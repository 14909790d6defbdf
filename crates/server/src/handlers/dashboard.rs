//! # Dashboard Handlers

use auth::permissions::{DashboardAction, Permission};
use axum::Json;
use entity::{feedback, sea_orm_active_enums::Sentiment, users};
use error::Result;
use permissions_macro::with_permission;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::{AppState, dto::dashboard::DashboardStats, middleware::auth::AuthenticatedUser, views};

/// Number of items in `recent_feedback`.
pub const RECENT_FEEDBACK_LIMIT: u64 = 5;

/// Per-sentiment feedback counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SentimentTally {
    pub positive: u64,
    pub neutral:  u64,
    pub negative: u64,
}

impl SentimentTally {
    pub fn total(&self) -> u64 { self.positive + self.neutral + self.negative }
}

impl FromIterator<Sentiment> for SentimentTally {
    fn from_iter<I: IntoIterator<Item = Sentiment>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |mut tally, sentiment| {
            match sentiment {
                Sentiment::Positive => tally.positive += 1,
                Sentiment::Neutral => tally.neutral += 1,
                Sentiment::Negative => tally.negative += 1,
            }
            tally
        })
    }
}

/// Summary of the feedback a manager has written (requires dashboard:read)
#[with_permission(Permission::Dashboard(DashboardAction::Read))]
pub async fn dashboard_stats_handler(state: &AppState, user: AuthenticatedUser) -> Result<Json<DashboardStats>> {
    let sentiments: Vec<Sentiment> = feedback::Entity::find()
        .select_only()
        .column(feedback::Column::Sentiment)
        .filter(feedback::Column::ManagerId.eq(user.id))
        .into_tuple()
        .all(&state.db)
        .await?;
    let tally: SentimentTally = sentiments.into_iter().collect();

    let team_members_count = users::Entity::find()
        .filter(users::Column::ManagerId.eq(user.id))
        .count(&state.db)
        .await?;

    let recent = feedback::Entity::find()
        .filter(feedback::Column::ManagerId.eq(user.id))
        .order_by_desc(feedback::Column::CreatedAt)
        .order_by_desc(feedback::Column::Id)
        .limit(RECENT_FEEDBACK_LIMIT)
        .all(&state.db)
        .await?;

    Ok(Json(DashboardStats {
        total_feedback: tally.total(),
        positive_feedback: tally.positive,
        neutral_feedback: tally.neutral,
        negative_feedback: tally.negative,
        team_members_count,
        recent_feedback: views::feedback_views(&state.db, recent).await?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_counts_each_sentiment() {
        let tally: SentimentTally = [
            Sentiment::Positive,
            Sentiment::Neutral,
            Sentiment::Positive,
            Sentiment::Negative,
        ]
        .into_iter()
        .collect();

        assert_eq!(
            tally,
            SentimentTally {
                positive: 2,
                neutral:  1,
                negative: 1,
            }
        );
        assert_eq!(tally.total(), 4);
    }

    #[test]
    fn test_empty_tally() {
        let tally: SentimentTally = std::iter::empty().collect();
        assert_eq!(tally.total(), 0);
    }
}
