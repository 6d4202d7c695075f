// src/domain/raw_metrics.rs

//! Metric Source（集計リポジトリ）が返す生の計数・合計値
//!
//! リクエストごとに組み立てられ、永続化されない。率の導出は
//! サービス層の計算モジュールが担当し、ここでは数値をそのまま持つ。

use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ソース別のリード数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct SourceCount {
    pub source: String,
    pub count: i64,
}

/// ステータス別のリード数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// 日別の件数（日付は YYYY-MM-DD の昇順）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct DailyCount {
    pub date: String,
    pub count: i64,
}

/// ステージ別の商談数と金額
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromQueryResult)]
pub struct StageBreakdown {
    pub stage: String,
    pub count: i64,
    pub value: f64,
}

/// 月別の成立金額（月は YYYY-MM の昇順）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromQueryResult)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
}

/// 期間内のリード側生指標
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawLeadMetrics {
    pub total_leads: u64,
    pub new_leads: u64,
    pub qualified_leads: u64,
    /// 成立商談に紐づいたリード数
    pub converted_leads: u64,
    pub leads_by_source: Vec<SourceCount>,
    pub leads_by_status: Vec<StatusCount>,
    pub daily_trend: Vec<DailyCount>,
}

/// 期間内の商談側生指標
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawDealMetrics {
    pub total_deals: u64,
    pub won_deals: u64,
    pub lost_deals: u64,
    /// 成立商談の金額合計
    pub total_revenue: f64,
    pub deals_by_stage: Vec<StageBreakdown>,
    pub revenue_trend: Vec<MonthlyRevenue>,
}

/// 期間内の活動量（リード・商談の作成を活動として数える）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawActivityMetrics {
    pub lead_activities: u64,
    pub deal_activities: u64,
    pub activities_by_day: Vec<DailyCount>,
}

/// ユーザー別の成績行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPerformance {
    pub user_id: Uuid,
    pub leads: i64,
    pub won_deals: i64,
    pub total_revenue: f64,
    /// 成立商談数 ÷ リード数 × 100（リード0件なら0）
    pub conversion_rate: f64,
}
