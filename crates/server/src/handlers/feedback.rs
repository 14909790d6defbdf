//! # Feedback Handlers
//!
//! Creation, listing, updates and acknowledgment of feedback items.
//!
//! Ownership is checked inside each unit of work against a fresh read, and a
//! mismatch is reported as not found so callers cannot probe for ids.

use std::collections::BTreeSet;

use async_trait::async_trait;
use auth::permissions::{FeedbackAction, Permission};
use axum::Json;
use chrono::Utc;
use entity::{feedback, feedback_tags, sea_orm_active_enums::UserRole, tags, users};
use error::{AppError, Result};
use permissions_macro::with_permission;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    ConnectionTrait,
    DatabaseTransaction,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    Set,
};
use tracing::{debug, info};
use validator::Validate;

use crate::{
    AppState,
    dto::{
        MessageResponse,
        feedback::{CreateFeedbackRequest, FeedbackResponse, UpdateFeedbackRequest},
    },
    durable::{UnitOfWork, execute_with_retry},
    middleware::auth::AuthenticatedUser,
    views,
};

/// Replaces the tag set of a feedback item.
///
/// Ids that do not name an existing tag are dropped; an empty slice clears
/// the set.
///
/// # Returns
///
/// The tag ids actually attached, ascending.
pub async fn replace_tags<C>(conn: &C, feedback_id: i32, tag_ids: &[i32]) -> Result<Vec<i32>>
where
    C: ConnectionTrait,
{
    feedback_tags::Entity::delete_many()
        .filter(feedback_tags::Column::FeedbackId.eq(feedback_id))
        .exec(conn)
        .await?;

    let requested: BTreeSet<i32> = tag_ids.iter().copied().collect();
    if requested.is_empty() {
        return Ok(Vec::new());
    }

    let known: Vec<i32> = tags::Entity::find()
        .filter(tags::Column::Id.is_in(requested.iter().copied()))
        .order_by_asc(tags::Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(|tag| tag.id)
        .collect();

    if known.len() < requested.len() {
        debug!(
            feedback_id,
            ignored = requested.len() - known.len(),
            "Ignoring unknown tag ids"
        );
    }

    if !known.is_empty() {
        feedback_tags::Entity::insert_many(known.iter().map(|tag_id| {
            feedback_tags::ActiveModel {
                feedback_id: Set(feedback_id),
                tag_id:      Set(*tag_id),
            }
        }))
        .exec_without_returning(conn)
        .await?;
    }

    Ok(known)
}

/// Inserts feedback after confirming the employee reports to the manager.
struct CreateFeedback<'a> {
    manager_id: i32,
    req:        &'a CreateFeedbackRequest,
}

#[async_trait]
impl UnitOfWork<DatabaseTransaction> for CreateFeedback<'_> {
    type Output = feedback::Model;

    async fn run(&self, txn: &DatabaseTransaction) -> Result<feedback::Model> {
        let employee = users::Entity::find_by_id(self.req.employee_id)
            .filter(users::Column::ManagerId.eq(self.manager_id))
            .filter(users::Column::Role.eq(UserRole::Employee))
            .one(txn)
            .await?
            .ok_or_else(|| AppError::not_found("Employee not found in your team"))?;

        let now = Utc::now();
        let created = feedback::ActiveModel {
            manager_id: Set(self.manager_id),
            employee_id: Set(employee.id),
            strengths: Set(self.req.strengths.clone()),
            areas_to_improve: Set(self.req.areas_to_improve.clone()),
            sentiment: Set(self.req.sentiment),
            created_at: Set(now),
            updated_at: Set(now),
            acknowledged: Set(false),
            acknowledged_at: Set(None),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        replace_tags(txn, created.id, &self.req.tag_ids).await?;

        Ok(created)
    }
}

/// Applies a partial update to feedback owned by the manager.
struct UpdateFeedback<'a> {
    feedback_id: i32,
    manager_id:  i32,
    req:         &'a UpdateFeedbackRequest,
}

#[async_trait]
impl UnitOfWork<DatabaseTransaction> for UpdateFeedback<'_> {
    type Output = feedback::Model;

    async fn run(&self, txn: &DatabaseTransaction) -> Result<feedback::Model> {
        let existing = feedback::Entity::find_by_id(self.feedback_id)
            .filter(feedback::Column::ManagerId.eq(self.manager_id))
            .one(txn)
            .await?
            .ok_or_else(|| AppError::not_found("Feedback not found"))?;

        let mut active: feedback::ActiveModel = existing.into();
        if let Some(strengths) = &self.req.strengths {
            active.strengths = Set(strengths.clone());
        }
        if let Some(areas_to_improve) = &self.req.areas_to_improve {
            active.areas_to_improve = Set(areas_to_improve.clone());
        }
        if let Some(sentiment) = self.req.sentiment {
            active.sentiment = Set(sentiment);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(txn).await?;

        if let Some(tag_ids) = &self.req.tag_ids {
            replace_tags(txn, updated.id, tag_ids).await?;
        }

        Ok(updated)
    }
}

/// Marks feedback as acknowledged by its employee.
///
/// Repeat acknowledgments succeed without touching the first timestamp.
struct AcknowledgeFeedback {
    feedback_id: i32,
    employee_id: i32,
}

#[async_trait]
impl UnitOfWork<DatabaseTransaction> for AcknowledgeFeedback {
    /// Whether this call changed the item
    type Output = bool;

    async fn run(&self, txn: &DatabaseTransaction) -> Result<bool> {
        let existing = feedback::Entity::find_by_id(self.feedback_id)
            .filter(feedback::Column::EmployeeId.eq(self.employee_id))
            .one(txn)
            .await?
            .ok_or_else(|| AppError::not_found("Feedback not found"))?;

        if existing.acknowledged {
            return Ok(false);
        }

        let mut active: feedback::ActiveModel = existing.into();
        active.acknowledged = Set(true);
        active.acknowledged_at = Set(Some(Utc::now()));
        active.update(txn).await?;

        Ok(true)
    }
}

/// Create feedback for a direct report (requires feedback:create)
///
/// # Arguments
///
/// * `state` - Application state
/// * `user` - Authenticated manager
/// * `req` - Feedback content and target employee
///
/// # Returns
///
/// The stored feedback with manager, employee and tags embedded.
#[with_permission(Permission::Feedback(FeedbackAction::Create))]
pub async fn create_feedback_handler(
    state: &AppState,
    user: AuthenticatedUser,
    req: CreateFeedbackRequest,
) -> Result<Json<FeedbackResponse>> {
    req.validate()?;

    let created = execute_with_retry(
        &state.writer,
        &state.retry_policy,
        &CreateFeedback {
            manager_id: user.id,
            req:        &req,
        },
    )
    .await?;

    info!(
        feedback_id = created.id,
        manager_id = created.manager_id,
        employee_id = created.employee_id,
        "Feedback created"
    );

    Ok(Json(views::feedback_view(&state.db, created).await?))
}

/// List feedback visible to the caller, newest first
///
/// Managers see what they wrote; employees see what they received.
#[with_permission(Permission::Feedback(FeedbackAction::Read))]
pub async fn list_feedback_handler(state: &AppState, user: AuthenticatedUser) -> Result<Json<Vec<FeedbackResponse>>> {
    let owner = match user.role {
        UserRole::Manager => feedback::Column::ManagerId,
        UserRole::Employee => feedback::Column::EmployeeId,
    };

    let items = feedback::Entity::find()
        .filter(owner.eq(user.id))
        .order_by_desc(feedback::Column::CreatedAt)
        .order_by_desc(feedback::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(views::feedback_views(&state.db, items).await?))
}

/// Update feedback the caller wrote (requires feedback:update)
#[with_permission(Permission::Feedback(FeedbackAction::Update))]
pub async fn update_feedback_handler(
    state: &AppState,
    user: AuthenticatedUser,
    feedback_id: i32,
    req: UpdateFeedbackRequest,
) -> Result<Json<FeedbackResponse>> {
    req.validate()?;

    let updated = execute_with_retry(
        &state.writer,
        &state.retry_policy,
        &UpdateFeedback {
            feedback_id,
            manager_id: user.id,
            req: &req,
        },
    )
    .await?;

    info!(feedback_id, manager_id = user.id, "Feedback updated");

    Ok(Json(views::feedback_view(&state.db, updated).await?))
}

/// Acknowledge feedback the caller received (requires feedback:acknowledge)
#[with_permission(Permission::Feedback(FeedbackAction::Acknowledge))]
pub async fn acknowledge_feedback_handler(
    state: &AppState,
    user: AuthenticatedUser,
    feedback_id: i32,
) -> Result<Json<MessageResponse>> {
    let changed = execute_with_retry(
        &state.writer,
        &state.retry_policy,
        &AcknowledgeFeedback {
            feedback_id,
            employee_id: user.id,
        },
    )
    .await?;

    if changed {
        info!(feedback_id, employee_id = user.id, "Feedback acknowledged");
    }

    Ok(Json(MessageResponse::new("Feedback acknowledged")))
}
