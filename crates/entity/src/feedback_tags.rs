//! Feedback Tags Entity
//!
//! Join table between feedback and tags. Rows are replaced wholesale when a
//! feedback item's tag set is updated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "feedback_tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub feedback_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tag_id:      i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::feedback::Entity",
        from = "Column::FeedbackId",
        to = "super::feedback::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Feedback,
    #[sea_orm(
        belongs_to = "super::tags::Entity",
        from = "Column::TagId",
        to = "super::tags::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Tag,
}

impl Related<super::feedback::Entity> for Entity {
    fn to() -> RelationDef { Relation::Feedback.def() }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef { Relation::Tag.def() }
}

impl ActiveModelBehavior for ActiveModel {}
