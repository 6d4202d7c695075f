use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 期間×会社で絞り込む集計クエリが大半のため、複合インデックスを張る
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_leads_company_created_at")
                    .table(Leads::Table)
                    .col(Leads::CompanyId)
                    .col(Leads::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_deals_company_created_at")
                    .table(Deals::Table)
                    .col(Deals::CompanyId)
                    .col(Deals::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_deals_company_stage")
                    .table(Deals::Table)
                    .col(Deals::CompanyId)
                    .col(Deals::Stage)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_targets_company_dates")
                    .table(Targets::Table)
                    .col(Targets::CompanyId)
                    .col(Targets::StartDate)
                    .col(Targets::EndDate)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_leads_company_created_at")
                    .table(Leads::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_deals_company_created_at")
                    .table(Deals::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_deals_company_stage")
                    .table(Deals::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_targets_company_dates")
                    .table(Targets::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Leads {
    Table,
    CompanyId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Deals {
    Table,
    CompanyId,
    Stage,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Targets {
    Table,
    CompanyId,
    StartDate,
    EndDate,
}
