//! # Tag Handlers

use async_trait::async_trait;
use auth::permissions::{Permission, TagAction};
use axum::Json;
use entity::tags;
use error::{AppError, Result};
use permissions_macro::with_permission;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::info;
use validator::Validate;

use crate::{
    AppState,
    dto::tags::{CreateTagRequest, TagResponse},
    durable::{UnitOfWork, execute_with_retry},
    middleware::auth::AuthenticatedUser,
};

struct CreateTag<'a> {
    req: &'a CreateTagRequest,
}

#[async_trait]
impl UnitOfWork<DatabaseTransaction> for CreateTag<'_> {
    type Output = tags::Model;

    async fn run(&self, txn: &DatabaseTransaction) -> Result<tags::Model> {
        let existing = tags::Entity::find()
            .filter(tags::Column::Name.eq(self.req.name.as_str()))
            .one(txn)
            .await?;

        if existing.is_some() {
            return Err(AppError::conflict("Tag already exists"));
        }

        let created = tags::ActiveModel {
            name: Set(self.req.name.clone()),
            color: Set(self.req.color_or_default()),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        Ok(created)
    }
}

/// List every tag, oldest first. Open to anonymous callers.
pub async fn list_tags_handler(state: &AppState) -> Result<Json<Vec<TagResponse>>> {
    let catalog = tags::Entity::find()
        .order_by_asc(tags::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(catalog.iter().map(TagResponse::from).collect()))
}

/// Create a tag (requires tags:create)
///
/// # Errors
///
/// `Conflict` when a tag with the same name exists.
#[with_permission(Permission::Tags(TagAction::Create))]
pub async fn create_tag_handler(
    state: &AppState,
    user: AuthenticatedUser,
    req: CreateTagRequest,
) -> Result<Json<TagResponse>> {
    req.validate()?;

    let created = execute_with_retry(
        &state.writer,
        &state.retry_policy,
        &CreateTag {
            req: &req,
        },
    )
    .await?;

    info!(tag_id = created.id, name = %created.name, created_by = user.id, "Tag created");

    Ok(Json(TagResponse::from(&created)))
}
