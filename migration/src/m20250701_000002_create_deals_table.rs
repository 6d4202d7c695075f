use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Deals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Deals::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Deals::Title).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Deals::Amount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Deals::Stage)
                            .string_len(50)
                            .not_null()
                            .default("lead"),
                    )
                    .col(ColumnDef::new(Deals::LeadId).uuid())
                    .col(ColumnDef::new(Deals::CompanyId).uuid().not_null())
                    .col(ColumnDef::new(Deals::AssignedTo).uuid())
                    .col(ColumnDef::new(Deals::ClosedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Deals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Deals::UpdatedAt)
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
            .drop_table(Table::drop().table(Deals::Table).to_owned())
            .await
    }
}

/// Iden Enum for the 'deals' table and its columns
#[derive(DeriveIden)]
enum Deals {
    Table,
    Id,
    Title,
    Amount,
    Stage,
    LeadId,
    CompanyId,
    AssignedTo,
    ClosedAt,
    CreatedAt,
    UpdatedAt,
}
