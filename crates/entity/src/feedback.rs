//! Feedback Entity
//!
//! A feedback item written by a manager for one of their direct reports.
//! `acknowledged` only ever moves from false to true.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use crate::sea_orm_active_enums::Sentiment;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:               i32,
    pub manager_id:       i32,
    pub employee_id:      i32,
    #[sea_orm(column_type = "Text")]
    pub strengths:        String,
    #[sea_orm(column_type = "Text")]
    pub areas_to_improve: String,
    pub sentiment:        Sentiment,
    pub created_at:       chrono::DateTime<chrono::Utc>,
    pub updated_at:       chrono::DateTime<chrono::Utc>,
    pub acknowledged:     bool,
    pub acknowledged_at:  Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ManagerId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Manager,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::EmployeeId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Employee,
    #[sea_orm(has_many = "super::feedback_tags::Entity")]
    FeedbackTags,
}

impl Related<super::feedback_tags::Entity> for Entity {
    fn to() -> RelationDef { Relation::FeedbackTags.def() }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef { super::feedback_tags::Relation::Tag.def() }

    fn via() -> Option<RelationDef> { Some(super::feedback_tags::Relation::Feedback.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}
