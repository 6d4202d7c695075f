// src/repository/analytics_repository.rs

//! Metric Source アダプタ
//!
//! リード・商談テーブルに対する集計クエリを発行し、型付きの生指標を返す。
//! 率の導出や閾値判定はここでは行わない（サービス層の計算モジュールの仕事）。

use crate::db::DbPool;
use crate::domain::analytics_filters::AnalyticsFilters;
use crate::domain::deal_model::{self, Entity as DealEntity};
use crate::domain::deal_stage::DealStage;
use crate::domain::lead_model::{self, Entity as LeadEntity};
use crate::domain::lead_status::LeadStatus;
use crate::domain::period::Period;
use crate::domain::raw_metrics::{
    DailyCount, MonthlyRevenue, RawActivityMetrics, RawDealMetrics, RawLeadMetrics, SourceCount,
    StageBreakdown, StatusCount,
};
use crate::domain::target_type::TargetType;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use std::collections::BTreeMap;
use uuid::Uuid;

/// 集約行: SUM のみ（結果行が無いと NULL になるため Option で受ける）
#[derive(Debug, FromQueryResult)]
struct SumRow {
    value: Option<f64>,
}

/// 集約行: ステージ別の件数と金額
#[derive(Debug, FromQueryResult)]
struct StageRow {
    stage: String,
    count: i64,
    value: Option<f64>,
}

/// 集約行: ユーザー別のリード数
#[derive(Debug, FromQueryResult)]
pub struct UserLeadCountRow {
    pub user_id: Uuid,
    pub leads: i64,
}

/// 集約行: ユーザー別の成立商談数と金額
#[derive(Debug, FromQueryResult)]
pub struct UserWonDealsRow {
    pub user_id: Uuid,
    pub won_deals: i64,
    pub revenue: Option<f64>,
}

pub struct AnalyticsRepository {
    db: DbPool,
}

impl AnalyticsRepository {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    // リード側クエリの共通条件（会社 + 期間 + 任意フィルタ）
    fn lead_conditions(filters: &AnalyticsFilters) -> Condition {
        let mut cond = Condition::all()
            .add(lead_model::Column::CompanyId.eq(filters.company_id))
            .add(
                lead_model::Column::CreatedAt
                    .between(filters.period.start(), filters.period.end()),
            );
        if let Some(user_id) = filters.user_id {
            cond = cond.add(lead_model::Column::AssignedTo.eq(user_id));
        }
        if let Some(source) = &filters.source {
            cond = cond.add(lead_model::Column::Source.eq(source.clone()));
        }
        if let Some(status) = &filters.status {
            cond = cond.add(lead_model::Column::Status.eq(status.clone()));
        }
        if let Some(campaign) = &filters.campaign {
            cond = cond.add(lead_model::Column::Campaign.eq(campaign.clone()));
        }
        cond
    }

    // 商談側クエリの共通条件
    fn deal_conditions(filters: &AnalyticsFilters) -> Condition {
        let mut cond = Condition::all()
            .add(deal_model::Column::CompanyId.eq(filters.company_id))
            .add(
                deal_model::Column::CreatedAt
                    .between(filters.period.start(), filters.period.end()),
            );
        if let Some(user_id) = filters.user_id {
            cond = cond.add(deal_model::Column::AssignedTo.eq(user_id));
        }
        if let Some(stage) = &filters.stage {
            cond = cond.add(deal_model::Column::Stage.eq(stage.clone()));
        }
        cond
    }

    /// 期間内のリード側生指標を一括取得
    pub async fn lead_metrics(&self, filters: &AnalyticsFilters) -> Result<RawLeadMetrics, DbErr> {
        let base = Self::lead_conditions(filters);

        let total_leads = LeadEntity::find()
            .filter(base.clone())
            .count(&self.db)
            .await?;

        let new_leads = LeadEntity::find()
            .filter(base.clone())
            .filter(lead_model::Column::Status.eq(LeadStatus::New.as_str()))
            .count(&self.db)
            .await?;

        let qualified_leads = LeadEntity::find()
            .filter(base.clone())
            .filter(lead_model::Column::Status.eq(LeadStatus::Qualified.as_str()))
            .count(&self.db)
            .await?;

        // 商談成立時にリード側のステータスが converted に更新される前提
        let converted_leads = LeadEntity::find()
            .filter(base.clone())
            .filter(lead_model::Column::Status.eq(LeadStatus::Converted.as_str()))
            .count(&self.db)
            .await?;

        let leads_by_source = LeadEntity::find()
            .select_only()
            .column(lead_model::Column::Source)
            .column_as(Expr::col(lead_model::Column::Id).count(), "count")
            .filter(base.clone())
            .group_by(lead_model::Column::Source)
            .order_by_asc(lead_model::Column::Source)
            .into_model::<SourceCount>()
            .all(&self.db)
            .await?;

        let leads_by_status = LeadEntity::find()
            .select_only()
            .column(lead_model::Column::Status)
            .column_as(Expr::col(lead_model::Column::Id).count(), "count")
            .filter(base.clone())
            .group_by(lead_model::Column::Status)
            .order_by_asc(lead_model::Column::Status)
            .into_model::<StatusCount>()
            .all(&self.db)
            .await?;

        let daily_trend = self.lead_daily_trend(base).await?;

        Ok(RawLeadMetrics {
            total_leads,
            new_leads,
            qualified_leads,
            converted_leads,
            leads_by_source,
            leads_by_status,
            daily_trend,
        })
    }

    async fn lead_daily_trend(&self, cond: Condition) -> Result<Vec<DailyCount>, DbErr> {
        LeadEntity::find()
            .select_only()
            .column_as(Expr::cust("created_at::date::text"), "date")
            .column_as(Expr::col(lead_model::Column::Id).count(), "count")
            .filter(cond)
            .group_by(Expr::cust("created_at::date"))
            .order_by_asc(Expr::cust("created_at::date"))
            .into_model::<DailyCount>()
            .all(&self.db)
            .await
    }

    /// 期間内の商談側生指標を一括取得
    pub async fn deal_metrics(&self, filters: &AnalyticsFilters) -> Result<RawDealMetrics, DbErr> {
        let base = Self::deal_conditions(filters);

        let total_deals = DealEntity::find()
            .filter(base.clone())
            .count(&self.db)
            .await?;

        let won_deals = DealEntity::find()
            .filter(base.clone())
            .filter(deal_model::Column::Stage.eq(DealStage::Won.as_str()))
            .count(&self.db)
            .await?;

        let lost_deals = DealEntity::find()
            .filter(base.clone())
            .filter(deal_model::Column::Stage.eq(DealStage::Lost.as_str()))
            .count(&self.db)
            .await?;

        let total_revenue = DealEntity::find()
            .select_only()
            .column_as(Expr::col(deal_model::Column::Amount).sum(), "value")
            .filter(base.clone())
            .filter(deal_model::Column::Stage.eq(DealStage::Won.as_str()))
            .into_model::<SumRow>()
            .one(&self.db)
            .await?
            .and_then(|row| row.value)
            .unwrap_or(0.0);

        let deals_by_stage = self.deals_by_stage(base.clone()).await?;

        let revenue_trend = DealEntity::find()
            .select_only()
            .column_as(Expr::cust("to_char(created_at, 'YYYY-MM')"), "month")
            .column_as(Expr::col(deal_model::Column::Amount).sum(), "revenue")
            .filter(base)
            .filter(deal_model::Column::Stage.eq(DealStage::Won.as_str()))
            .group_by(Expr::cust("to_char(created_at, 'YYYY-MM')"))
            .order_by_asc(Expr::cust("to_char(created_at, 'YYYY-MM')"))
            .into_model::<MonthlyRevenue>()
            .all(&self.db)
            .await?;

        Ok(RawDealMetrics {
            total_deals,
            won_deals,
            lost_deals,
            total_revenue,
            deals_by_stage,
            revenue_trend,
        })
    }

    async fn deals_by_stage(&self, cond: Condition) -> Result<Vec<StageBreakdown>, DbErr> {
        let rows = DealEntity::find()
            .select_only()
            .column(deal_model::Column::Stage)
            .column_as(Expr::col(deal_model::Column::Id).count(), "count")
            .column_as(Expr::col(deal_model::Column::Amount).sum(), "value")
            .filter(cond)
            .group_by(deal_model::Column::Stage)
            .into_model::<StageRow>()
            .all(&self.db)
            .await?;

        // SQLの返却順に依存せず、ファネルの正規順に並べ替える（欠けたステージは0埋め）
        let mut by_stage: BTreeMap<String, StageBreakdown> = rows
            .into_iter()
            .map(|row| {
                (
                    row.stage.clone(),
                    StageBreakdown {
                        stage: row.stage,
                        count: row.count,
                        value: row.value.unwrap_or(0.0),
                    },
                )
            })
            .collect();

        Ok(DealStage::all()
            .into_iter()
            .map(|stage| {
                by_stage
                    .remove(stage.as_str())
                    .unwrap_or_else(|| StageBreakdown {
                        stage: stage.as_str().to_string(),
                        count: 0,
                        value: 0.0,
                    })
            })
            .collect())
    }

    /// 会社全体のファネル（ステージ別件数・金額、正規順）
    pub async fn funnel_stage_counts(&self, company_id: Uuid) -> Result<Vec<StageBreakdown>, DbErr> {
        let cond = Condition::all().add(deal_model::Column::CompanyId.eq(company_id));
        self.deals_by_stage(cond).await
    }

    /// 期間内の活動量（リード・商談の作成イベントを日別に統合）
    pub async fn sales_activity(
        &self,
        filters: &AnalyticsFilters,
    ) -> Result<RawActivityMetrics, DbErr> {
        let lead_cond = Self::lead_conditions(filters);
        let deal_cond = Self::deal_conditions(filters);

        let lead_activities = LeadEntity::find()
            .filter(lead_cond.clone())
            .count(&self.db)
            .await?;

        let deal_activities = DealEntity::find()
            .filter(deal_cond.clone())
            .count(&self.db)
            .await?;

        let lead_daily = self.lead_daily_trend(lead_cond).await?;
        let deal_daily = DealEntity::find()
            .select_only()
            .column_as(Expr::cust("created_at::date::text"), "date")
            .column_as(Expr::col(deal_model::Column::Id).count(), "count")
            .filter(deal_cond)
            .group_by(Expr::cust("created_at::date"))
            .order_by_asc(Expr::cust("created_at::date"))
            .into_model::<DailyCount>()
            .all(&self.db)
            .await?;

        // 2系列を日付で突き合わせる（BTreeMapで日付昇順を維持）
        let mut merged: BTreeMap<String, i64> = BTreeMap::new();
        for entry in lead_daily.into_iter().chain(deal_daily) {
            *merged.entry(entry.date).or_insert(0) += entry.count;
        }
        let activities_by_day = merged
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect();

        Ok(RawActivityMetrics {
            lead_activities,
            deal_activities,
            activities_by_day,
        })
    }

    /// ユーザー別のリード数（担当者が未設定のリードは対象外）
    pub async fn leads_by_user(
        &self,
        filters: &AnalyticsFilters,
    ) -> Result<Vec<UserLeadCountRow>, DbErr> {
        LeadEntity::find()
            .select_only()
            .column_as(Expr::col(lead_model::Column::AssignedTo), "user_id")
            .column_as(Expr::col(lead_model::Column::Id).count(), "leads")
            .filter(Self::lead_conditions(filters))
            .filter(lead_model::Column::AssignedTo.is_not_null())
            .group_by(lead_model::Column::AssignedTo)
            .into_model::<UserLeadCountRow>()
            .all(&self.db)
            .await
    }

    /// ユーザー別の成立商談数と金額
    pub async fn won_deals_by_user(
        &self,
        filters: &AnalyticsFilters,
    ) -> Result<Vec<UserWonDealsRow>, DbErr> {
        DealEntity::find()
            .select_only()
            .column_as(Expr::col(deal_model::Column::AssignedTo), "user_id")
            .column_as(Expr::col(deal_model::Column::Id).count(), "won_deals")
            .column_as(Expr::col(deal_model::Column::Amount).sum(), "revenue")
            .filter(Self::deal_conditions(filters))
            .filter(deal_model::Column::Stage.eq(DealStage::Won.as_str()))
            .filter(deal_model::Column::AssignedTo.is_not_null())
            .group_by(deal_model::Column::AssignedTo)
            .into_model::<UserWonDealsRow>()
            .all(&self.db)
            .await
    }

    /// 目標種別ごとの実績値を集計する（§ターゲット進捗の1段目）
    pub async fn actual_target_value(
        &self,
        target_type: TargetType,
        company_id: Uuid,
        period: &Period,
    ) -> Result<f64, DbErr> {
        let company = Condition::all()
            .add(deal_model::Column::CompanyId.eq(company_id))
            .add(deal_model::Column::CreatedAt.between(period.start(), period.end()));
        let lead_company = Condition::all()
            .add(lead_model::Column::CompanyId.eq(company_id))
            .add(lead_model::Column::CreatedAt.between(period.start(), period.end()));

        match target_type {
            TargetType::Revenue => {
                let value = DealEntity::find()
                    .select_only()
                    .column_as(Expr::col(deal_model::Column::Amount).sum(), "value")
                    .filter(company)
                    .filter(deal_model::Column::Stage.eq(DealStage::Won.as_str()))
                    .into_model::<SumRow>()
                    .one(&self.db)
                    .await?
                    .and_then(|row| row.value)
                    .unwrap_or(0.0);
                Ok(value)
            }
            TargetType::Leads => {
                let count = LeadEntity::find()
                    .filter(lead_company)
                    .count(&self.db)
                    .await?;
                Ok(count as f64)
            }
            TargetType::Deals => {
                let count = DealEntity::find().filter(company).count(&self.db).await?;
                Ok(count as f64)
            }
            TargetType::Conversion => {
                let lead_count = LeadEntity::find()
                    .filter(lead_company)
                    .count(&self.db)
                    .await?;
                let won_count = DealEntity::find()
                    .filter(company)
                    .filter(deal_model::Column::Stage.eq(DealStage::Won.as_str()))
                    .count(&self.db)
                    .await?;
                // リード0件のときは転換率0（ゼロ除算ガード）
                if lead_count > 0 {
                    Ok((won_count as f64 / lead_count as f64) * 100.0)
                } else {
                    Ok(0.0)
                }
            }
        }
    }
}
