// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// マイグレーションモジュール
mod m20250701_000001_create_leads_table;
mod m20250701_000002_create_deals_table;
mod m20250701_000003_create_targets_table;
mod m20250702_000001_add_crm_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 基本テーブル作成（依存関係なし）
            Box::new(m20250701_000001_create_leads_table::Migration),
            Box::new(m20250701_000002_create_deals_table::Migration),
            Box::new(m20250701_000003_create_targets_table::Migration),
            // 2. 集計クエリ用インデックス
            Box::new(m20250702_000001_add_crm_indexes::Migration),
        ]
    }
}
