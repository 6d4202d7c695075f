use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Targets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Targets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Targets::Name).string_len(100).not_null())
                    // revenue / leads / deals / conversion
                    .col(ColumnDef::new(Targets::TargetType).string_len(50).not_null())
                    .col(ColumnDef::new(Targets::TargetValue).double().not_null())
                    .col(
                        ColumnDef::new(Targets::ActualValue)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    // ユーザーまたはチームのどちらか一方に割り当て可能（両方はサービス層で拒否）
                    .col(ColumnDef::new(Targets::UserId).uuid())
                    .col(ColumnDef::new(Targets::TeamId).uuid())
                    .col(
                        ColumnDef::new(Targets::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Targets::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // monthly / quarterly / annual
                    .col(ColumnDef::new(Targets::Period).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Targets::Status)
                            .string_len(50)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Targets::Currency)
                            .string_len(3)
                            .not_null()
                            .default("USD"),
                    )
                    .col(ColumnDef::new(Targets::CompanyId).uuid().not_null())
                    .col(
                        ColumnDef::new(Targets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Targets::UpdatedAt)
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
            .drop_table(Table::drop().table(Targets::Table).to_owned())
            .await
    }
}

/// Iden Enum for the 'targets' table and its columns
#[derive(DeriveIden)]
enum Targets {
    Table,
    Id,
    Name,
    TargetType,
    TargetValue,
    ActualValue,
    UserId,
    TeamId,
    StartDate,
    EndDate,
    Period,
    Status,
    Currency,
    CompanyId,
    CreatedAt,
    UpdatedAt,
}
