//! Users Entity
//!
//! Accounts for managers and employees. The reporting line is a nullable
//! `manager_id` column pointing back at this table, one level deep.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use crate::sea_orm_active_enums::UserRole;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id:                         i32,
    #[sea_orm(unique)]
    pub email:                      String,
    #[serde(skip_serializing)]
    pub password_hash:              String,
    pub full_name:                  String,
    pub role:                       UserRole,
    pub manager_id:                 Option<i32>,
    pub is_verified:                bool,
    #[serde(skip_serializing)]
    pub verification_token:         Option<String>,
    #[serde(skip_serializing)]
    pub verification_token_expires: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at:                 chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ManagerId",
        to = "Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Manager,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether this account holds the manager role.
    #[inline]
    pub fn is_manager(&self) -> bool { self.role == UserRole::Manager }

    /// Whether `employee` reports directly to this user.
    #[inline]
    pub fn manages(&self, employee: &Model) -> bool { self.is_manager() && employee.manager_id == Some(self.id) }
}
