//! Tags Entity
//!
//! Reusable labels attached to feedback through `feedback_tags`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Color given to tags created without one.
pub const DEFAULT_TAG_COLOR: &str = "#3B82F6";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:    i32,
    #[sea_orm(unique)]
    pub name:  String,
    pub color: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::feedback_tags::Entity")]
    FeedbackTags,
}

impl Related<super::feedback_tags::Entity> for Entity {
    fn to() -> RelationDef { Relation::FeedbackTags.def() }
}

impl ActiveModelBehavior for ActiveModel {}
