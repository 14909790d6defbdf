//! # Response Views
//!
//! Builds responses that embed related records. Relations are loaded with
//! one `IN (..)` query per table and joined in memory, so listing N items
//! costs a fixed number of queries.

use std::collections::{BTreeSet, HashMap};

use entity::{feedback, feedback_requests, feedback_tags, tags, users};
use error::{AppError, Result};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::dto::{
    feedback::FeedbackResponse,
    feedback_requests::FeedbackRequestResponse,
    tags::TagResponse,
    users::UserResponse,
};

/// Users keyed by id.
pub async fn users_by_id<C>(conn: &C, ids: impl IntoIterator<Item = i32>) -> Result<HashMap<i32, users::Model>>
where
    C: ConnectionTrait,
{
    let ids: BTreeSet<i32> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    Ok(users::Entity::find()
        .filter(users::Column::Id.is_in(ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect())
}

/// Tags attached to each feedback item, ordered by tag id.
pub async fn tags_by_feedback<C>(conn: &C, feedback_ids: impl IntoIterator<Item = i32>) -> Result<HashMap<i32, Vec<tags::Model>>>
where
    C: ConnectionTrait,
{
    let feedback_ids: BTreeSet<i32> = feedback_ids.into_iter().collect();
    if feedback_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let links = feedback_tags::Entity::find()
        .filter(feedback_tags::Column::FeedbackId.is_in(feedback_ids))
        .all(conn)
        .await?;

    let tag_ids: BTreeSet<i32> = links.iter().map(|link| link.tag_id).collect();
    let catalog: HashMap<i32, tags::Model> = if tag_ids.is_empty() {
        HashMap::new()
    }
    else {
        tags::Entity::find()
            .filter(tags::Column::Id.is_in(tag_ids))
            .order_by_asc(tags::Column::Id)
            .all(conn)
            .await?
            .into_iter()
            .map(|tag| (tag.id, tag))
            .collect()
    };

    let mut grouped: HashMap<i32, Vec<tags::Model>> = HashMap::new();
    for link in links {
        if let Some(tag) = catalog.get(&link.tag_id) {
            grouped.entry(link.feedback_id).or_default().push(tag.clone());
        }
    }
    for attached in grouped.values_mut() {
        attached.sort_by_key(|tag| tag.id);
    }

    Ok(grouped)
}

fn user_view(users: &HashMap<i32, users::Model>, id: i32) -> Result<UserResponse> {
    users
        .get(&id)
        .map(UserResponse::from)
        .ok_or_else(|| AppError::internal(format!("User {} referenced by a record is missing", id)))
}

/// Embeds manager, employee and tags into each feedback item, preserving order.
pub async fn feedback_views<C>(conn: &C, items: Vec<feedback::Model>) -> Result<Vec<FeedbackResponse>>
where
    C: ConnectionTrait,
{
    let users = users_by_id(
        conn,
        items
            .iter()
            .flat_map(|item| [item.manager_id, item.employee_id]),
    )
    .await?;
    let mut attached = tags_by_feedback(conn, items.iter().map(|item| item.id)).await?;

    items
        .into_iter()
        .map(|item| {
            Ok(FeedbackResponse {
                manager: user_view(&users, item.manager_id)?,
                employee: user_view(&users, item.employee_id)?,
                tags: attached
                    .remove(&item.id)
                    .unwrap_or_default()
                    .iter()
                    .map(TagResponse::from)
                    .collect(),
                id: item.id,
                manager_id: item.manager_id,
                employee_id: item.employee_id,
                strengths: item.strengths,
                areas_to_improve: item.areas_to_improve,
                sentiment: item.sentiment,
                created_at: item.created_at,
                updated_at: item.updated_at,
                acknowledged: item.acknowledged,
                acknowledged_at: item.acknowledged_at,
            })
        })
        .collect()
}

/// Single-item form of [`feedback_views`].
pub async fn feedback_view<C>(conn: &C, item: feedback::Model) -> Result<FeedbackResponse>
where
    C: ConnectionTrait,
{
    feedback_views(conn, vec![item])
        .await?
        .pop()
        .ok_or_else(|| AppError::internal("Feedback view was not built"))
}

/// Embeds the requesting employee into each feedback request.
pub async fn feedback_request_views<C>(
    conn: &C,
    items: Vec<feedback_requests::Model>,
) -> Result<Vec<FeedbackRequestResponse>>
where
    C: ConnectionTrait,
{
    let users = users_by_id(conn, items.iter().map(|item| item.employee_id)).await?;

    items
        .into_iter()
        .map(|item| {
            Ok(FeedbackRequestResponse {
                employee: user_view(&users, item.employee_id)?,
                id: item.id,
                employee_id: item.employee_id,
                message: item.message,
                status: item.status,
                created_at: item.created_at,
            })
        })
        .collect()
}
