use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250601_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeedbackRequests::Table)
                    .if_not_exists()
                    .col(pk_auto(FeedbackRequests::Id))
                    .col(integer(FeedbackRequests::EmployeeId))
                    .col(text(FeedbackRequests::Message))
                    .col(string_len(FeedbackRequests::Status, 16).default("pending"))
                    .col(timestamp_with_time_zone(FeedbackRequests::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_requests_employee_id")
                            .from(FeedbackRequests::Table, FeedbackRequests::EmployeeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_feedback_requests_employee_id")
                    .table(FeedbackRequests::Table)
                    .col(FeedbackRequests::EmployeeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeedbackRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum FeedbackRequests {
    Table,
    Id,
    EmployeeId,
    Message,
    Status,
    CreatedAt,
}
