//! Feedback Requests Entity
//!
//! Employee initiated requests for feedback. Status starts as pending.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use crate::sea_orm_active_enums::RequestStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "feedback_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:          i32,
    pub employee_id: i32,
    #[sea_orm(column_type = "Text")]
    pub message:     String,
    pub status:      RequestStatus,
    pub created_at:  chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::EmployeeId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Employee,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef { Relation::Employee.def() }
}

impl ActiveModelBehavior for ActiveModel {}
