use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20250601_000001_create_users_table::Users, m20250601_000002_create_tags_table::Tags};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(pk_auto(Feedback::Id))
                    .col(integer(Feedback::ManagerId))
                    .col(integer(Feedback::EmployeeId))
                    .col(text(Feedback::Strengths))
                    .col(text(Feedback::AreasToImprove))
                    .col(string_len(Feedback::Sentiment, 16))
                    .col(timestamp_with_time_zone(Feedback::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Feedback::UpdatedAt).default(Expr::current_timestamp()))
                    .col(boolean(Feedback::Acknowledged).default(false))
                    .col(timestamp_with_time_zone_null(Feedback::AcknowledgedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_manager_id")
                            .from(Feedback::Table, Feedback::ManagerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_employee_id")
                            .from(Feedback::Table, Feedback::EmployeeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_feedback_manager_id", Feedback::ManagerId),
            ("idx_feedback_employee_id", Feedback::EmployeeId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Feedback::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(FeedbackTags::Table)
                    .if_not_exists()
                    .col(integer(FeedbackTags::FeedbackId))
                    .col(integer(FeedbackTags::TagId))
                    .primary_key(
                        Index::create()
                            .col(FeedbackTags::FeedbackId)
                            .col(FeedbackTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_tags_feedback_id")
                            .from(FeedbackTags::Table, FeedbackTags::FeedbackId)
                            .to(Feedback::Table, Feedback::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedback_tags_tag_id")
                            .from(FeedbackTags::Table, FeedbackTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FeedbackTags::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Feedback::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone, Copy)]
pub enum Feedback {
    Table,
    Id,
    ManagerId,
    EmployeeId,
    Strengths,
    AreasToImprove,
    Sentiment,
    CreatedAt,
    UpdatedAt,
    Acknowledged,
    AcknowledgedAt,
}

#[derive(DeriveIden)]
pub enum FeedbackTags {
    Table,
    FeedbackId,
    TagId,
}
