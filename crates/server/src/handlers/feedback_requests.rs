//! # Feedback Request Handlers
//!
//! Employees ask their manager for feedback; managers list the requests
//! raised by their team.

use async_trait::async_trait;
use auth::permissions::{FeedbackRequestAction, Permission};
use axum::Json;
use chrono::Utc;
use entity::{
    feedback_requests,
    sea_orm_active_enums::{RequestStatus, UserRole},
    users,
};
use error::{AppError, Result};
use permissions_macro::with_permission;
use sea_orm::{
    ActiveModelTrait,
    ColumnTrait,
    DatabaseTransaction,
    EntityTrait,
    QueryFilter,
    QueryOrder,
    Set,
};
use tracing::info;
use validator::Validate;

use crate::{
    AppState,
    dto::feedback_requests::{CreateFeedbackRequestRequest, FeedbackRequestResponse},
    durable::{UnitOfWork, execute_with_retry},
    middleware::auth::AuthenticatedUser,
    views,
};

struct RaiseFeedbackRequest<'a> {
    employee_id: i32,
    message:     &'a str,
}

#[async_trait]
impl UnitOfWork<DatabaseTransaction> for RaiseFeedbackRequest<'_> {
    type Output = feedback_requests::Model;

    async fn run(&self, txn: &DatabaseTransaction) -> Result<feedback_requests::Model> {
        let created = feedback_requests::ActiveModel {
            employee_id: Set(self.employee_id),
            message: Set(self.message.to_string()),
            status: Set(RequestStatus::Pending),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        Ok(created)
    }
}

/// Raise a feedback request (requires feedback_requests:create)
#[with_permission(Permission::FeedbackRequests(FeedbackRequestAction::Create))]
pub async fn create_feedback_request_handler(
    state: &AppState,
    user: AuthenticatedUser,
    req: CreateFeedbackRequestRequest,
) -> Result<Json<FeedbackRequestResponse>> {
    req.validate()?;

    let created = execute_with_retry(
        &state.writer,
        &state.retry_policy,
        &RaiseFeedbackRequest {
            employee_id: user.id,
            message:     &req.message,
        },
    )
    .await?;

    info!(request_id = created.id, employee_id = user.id, "Feedback request created");

    let mut built = views::feedback_request_views(&state.db, vec![created]).await?;
    built
        .pop()
        .map(Json)
        .ok_or_else(|| AppError::internal("Feedback request view was not built"))
}

/// List feedback requests, newest first
///
/// Managers see requests from their direct reports; employees see their own.
#[with_permission(Permission::FeedbackRequests(FeedbackRequestAction::Read))]
pub async fn list_feedback_requests_handler(
    state: &AppState,
    user: AuthenticatedUser,
) -> Result<Json<Vec<FeedbackRequestResponse>>> {
    let query = match user.role {
        UserRole::Manager => {
            feedback_requests::Entity::find()
                .inner_join(users::Entity)
                .filter(users::Column::ManagerId.eq(user.id))
        },
        UserRole::Employee => feedback_requests::Entity::find().filter(feedback_requests::Column::EmployeeId.eq(user.id)),
    };

    let items = query
        .order_by_desc(feedback_requests::Column::CreatedAt)
        .order_by_desc(feedback_requests::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(views::feedback_request_views(&state.db, items).await?))
}
