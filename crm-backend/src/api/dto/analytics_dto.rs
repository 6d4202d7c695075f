// src/api/dto/analytics_dto.rs

//! 集計エンドポイントの型付きレスポンス
//!
//! 元データの件数と導出した率を常に併せて返す。率が0でも
//! 件数を見れば「データ不足」と「不調」を区別できる。

use crate::domain::period::Period;
use crate::domain::raw_metrics::{
    DailyCount, MonthlyRevenue, SourceCount, StageBreakdown, StatusCount, UserPerformance,
};
use crate::service::deal_metrics::{DealMetrics, RevenueForecast};
use crate::service::funnel::FunnelEvaluation;
use crate::service::lead_metrics::LeadMetrics;
use crate::service::metrics::GrowthMetrics;
use crate::service::target_service::TargetProgress;
use serde::Serialize;

/// レスポンスに含める期間表現（日付のみ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodDto {
    pub start_date: String,
    pub end_date: String,
}

impl From<&Period> for PeriodDto {
    fn from(period: &Period) -> Self {
        Self {
            start_date: period.start().format("%Y-%m-%d").to_string(),
            end_date: period.end().format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadAnalyticsResponse {
    pub period: PeriodDto,
    pub total_leads: u64,
    pub new_leads: u64,
    pub qualified_leads: u64,
    pub converted_leads: u64,
    #[serde(flatten)]
    pub metrics: LeadMetrics,
    pub leads_by_source: Vec<SourceCount>,
    pub leads_by_status: Vec<StatusCount>,
    pub daily_trend: Vec<DailyCount>,
    pub growth: GrowthMetrics,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DealAnalyticsResponse {
    pub period: PeriodDto,
    pub total_deals: u64,
    pub won_deals: u64,
    pub lost_deals: u64,
    pub total_revenue: f64,
    #[serde(flatten)]
    pub metrics: DealMetrics,
    pub deals_by_stage: Vec<StageBreakdown>,
    pub revenue_trend: Vec<MonthlyRevenue>,
    pub forecast: RevenueForecast,
    pub growth: GrowthMetrics,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityTypeCount {
    pub activity_type: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesActivityResponse {
    pub period: PeriodDto,
    pub total_activities: u64,
    pub activities_by_type: Vec<ActivityTypeCount>,
    pub activities_by_day: Vec<DailyCount>,
    /// 期間の1日あたり活動数
    pub activities_per_day: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceRankings {
    /// 成立金額の上位
    pub top_performers: Vec<UserPerformance>,
    /// リードを持ちながら転換率が低いユーザー
    pub improvement_opportunities: Vec<UserPerformance>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceResponse {
    pub period: PeriodDto,
    pub users: Vec<UserPerformance>,
    pub rankings: PerformanceRankings,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunnelAnalyticsResponse {
    pub stages: Vec<StageBreakdown>,
    #[serde(flatten)]
    pub evaluation: FunnelEvaluation,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionAnalyticsResponse {
    pub period: PeriodDto,
    pub total_leads: u64,
    pub converted_leads: u64,
    pub conversion_rate: f64,
    pub growth: GrowthMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetSummary {
    pub total_targets: usize,
    pub on_track: usize,
    pub behind: usize,
    pub achieved: usize,
    /// 各目標の完了率の平均
    pub overall_completion_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceChange {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetComparison {
    /// 前期間と重なる目標数の増減率
    pub targets_growth: f64,
    pub performance_change: PerformanceChange,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetAnalyticsResponse {
    pub period: PeriodDto,
    pub targets: Vec<TargetProgress>,
    pub summary: TargetSummary,
    pub comparison: TargetComparison,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_leads: u64,
    pub qualified_leads: u64,
    pub conversion_rate: f64,
    pub total_deals: u64,
    pub won_deals: u64,
    pub total_revenue: f64,
    pub average_deal_value: f64,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardCharts {
    pub leads_by_source: Vec<SourceCount>,
    pub deals_by_stage: Vec<StageBreakdown>,
    pub revenue_trend: Vec<MonthlyRevenue>,
    pub daily_trend: Vec<DailyCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub period: PeriodDto,
    pub summary: DashboardSummary,
    pub charts: DashboardCharts,
    pub insights: Vec<String>,
}
