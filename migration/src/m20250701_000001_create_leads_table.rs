use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Leads::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Leads::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Leads::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Leads::Email).string_len(320))
                    .col(
                        ColumnDef::new(Leads::Status)
                            .string_len(50)
                            .not_null()
                            .default("new"), // デフォルト値
                    )
                    .col(
                        ColumnDef::new(Leads::Source)
                            .string_len(100)
                            .not_null()
                            .default("unknown"),
                    )
                    .col(ColumnDef::new(Leads::Campaign).string_len(100))
                    .col(ColumnDef::new(Leads::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Leads::AssignedTo).uuid())
                    .col(
                        ColumnDef::new(Leads::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Leads::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Leads::Table).to_owned())
            .await
    }
}

/// Iden Enum for the 'leads' table and its columns
#[derive(DeriveIden)]
enum Leads {
    Table,
    Id,
    Name,
    Email,
    Status,
    Source,
    Campaign,
    CompanyId,
    AssignedTo,
    CreatedAt,
    UpdatedAt,
}
