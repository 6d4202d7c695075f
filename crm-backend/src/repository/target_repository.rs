// src/repository/target_repository.rs

use crate::db::DbPool;
use crate::domain::period::Period;
use crate::domain::target_model::{self, Entity as TargetEntity};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, DeleteResult, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

/// アクティブな目標のステータス値
pub const TARGET_STATUS_ACTIVE: &str = "active";

pub struct TargetRepository {
    db: DbPool,
}

impl TargetRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn find_by_id(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<target_model::Model>, DbErr> {
        TargetEntity::find_by_id(id)
            .filter(target_model::Column::CompanyId.eq(company_id))
            .one(&self.db)
            .await
    }

    pub async fn find_all(&self, company_id: Uuid) -> Result<Vec<target_model::Model>, DbErr> {
        TargetEntity::find()
            .filter(target_model::Column::CompanyId.eq(company_id))
            .order_by_desc(target_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// 進捗スイープの対象となるアクティブな目標
    pub async fn find_active(&self, company_id: Uuid) -> Result<Vec<target_model::Model>, DbErr> {
        TargetEntity::find()
            .filter(target_model::Column::CompanyId.eq(company_id))
            .filter(target_model::Column::Status.eq(TARGET_STATUS_ACTIVE))
            .order_by_desc(target_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// 対象期間と重なる目標（target.start <= period.end かつ target.end >= period.start）
    pub async fn find_in_period(
        &self,
        company_id: Uuid,
        period: &Period,
    ) -> Result<Vec<target_model::Model>, DbErr> {
        TargetEntity::find()
            .filter(target_model::Column::CompanyId.eq(company_id))
            .filter(target_model::Column::StartDate.lte(period.end()))
            .filter(target_model::Column::EndDate.gte(period.start()))
            .order_by_desc(target_model::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    pub async fn create(
        &self,
        model: target_model::ActiveModel,
    ) -> Result<target_model::Model, DbErr> {
        model.insert(&self.db).await
    }

    pub async fn update(
        &self,
        model: target_model::ActiveModel,
    ) -> Result<target_model::Model, DbErr> {
        model.update(&self.db).await
    }

    pub async fn delete(&self, id: Uuid, company_id: Uuid) -> Result<DeleteResult, DbErr> {
        TargetEntity::delete_many()
            .filter(target_model::Column::Id.eq(id))
            .filter(target_model::Column::CompanyId.eq(company_id))
            .exec(&self.db)
            .await
    }

    /// 再計算した実績値の書き戻し（進捗読み取りの副作用）
    pub async fn update_actual_value(&self, id: Uuid, value: f64) -> Result<(), DbErr> {
        TargetEntity::update_many()
            .col_expr(target_model::Column::ActualValue, Expr::value(value))
            .col_expr(target_model::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(target_model::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
