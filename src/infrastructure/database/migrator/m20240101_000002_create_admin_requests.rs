//! Create admin_requests table
//!
//! Self-service admin-promotion requests awaiting an admin decision.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminRequests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminRequests::Username)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminRequests::Email)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdminRequests::FullName).string_len(255).null())
                    .col(
                        ColumnDef::new(AdminRequests::PasswordHash)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminRequests::IsValidated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdminRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminRequests::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Pending listing: WHERE is_validated = false AND deleted_at IS NULL ORDER BY created_at DESC
        manager
            .create_index(
                Index::create()
                    .name("idx_admin_requests_pending")
                    .table(AdminRequests::Table)
                    .col(AdminRequests::IsValidated)
                    .col(AdminRequests::DeletedAt)
                    .col(AdminRequests::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AdminRequests {
    Table,
    Id,
    Username,
    Email,
    FullName,
    PasswordHash,
    IsValidated,
    CreatedAt,
    DeletedAt,
}
