// src/service/analytics_service.rs

//! 集計ファサード
//!
//! 生指標の取得（リポジトリ）、率の導出（計算モジュール）、
//! インサイト生成を束ねて、エンドポイントごとのレスポンスを組み立てる。
//! 前期間の取得に失敗した場合はレスポンス全体をエラーとする
//! （成長率だけ黙って欠落させない）。

use crate::api::dto::analytics_dto::{
    ActivityTypeCount, ConversionAnalyticsResponse, DashboardCharts, DashboardResponse,
    DashboardSummary, DealAnalyticsResponse, FunnelAnalyticsResponse, LeadAnalyticsResponse,
    PerformanceChange, PerformanceRankings, PerformanceResponse, SalesActivityResponse,
    TargetAnalyticsResponse, TargetComparison, TargetSummary,
};
use crate::db::DbPool;
use crate::domain::analytics_filters::AnalyticsFilters;
use crate::domain::raw_metrics::UserPerformance;
use crate::error::AppResult;
use crate::repository::analytics_repository::{
    AnalyticsRepository, UserLeadCountRow, UserWonDealsRow,
};
use crate::repository::target_repository::TargetRepository;
use crate::service::target_service::{TargetProgress, TargetService};
use crate::service::{deal_metrics, funnel, insight, lead_metrics, metrics};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// 上位ランキングに載せる人数
const TOP_PERFORMER_LIMIT: usize = 3;
/// 転換率がこの値未満のユーザーを改善候補に挙げる
const IMPROVEMENT_CONVERSION_RATE: f64 = 10.0;
/// 目標数の増減がこの帯域内なら stable と評価
const TARGET_CHANGE_BAND: f64 = 5.0;
/// 達成とみなす完了率
const ACHIEVED_RATE: f64 = 100.0;

pub struct AnalyticsService {
    analytics_repo: Arc<AnalyticsRepository>,
    target_repo: Arc<TargetRepository>,
    target_service: Arc<TargetService>,
}

impl AnalyticsService {
    pub fn new(db: DbPool, target_service: Arc<TargetService>) -> Self {
        Self {
            analytics_repo: Arc::new(AnalyticsRepository::new(db.clone())),
            target_repo: Arc::new(TargetRepository::new(db)),
            target_service,
        }
    }

    pub async fn lead_analytics(
        &self,
        filters: &AnalyticsFilters,
    ) -> AppResult<LeadAnalyticsResponse> {
        let raw = self.analytics_repo.lead_metrics(filters).await?;
        let previous = self
            .analytics_repo
            .lead_metrics(&filters.for_previous_period())
            .await?;

        let derived = lead_metrics::calculate(&raw);
        let growth = metrics::growth(raw.total_leads as f64, previous.total_leads as f64);
        let insights = insight::lead_insights(&derived);

        Ok(LeadAnalyticsResponse {
            period: (&filters.period).into(),
            total_leads: raw.total_leads,
            new_leads: raw.new_leads,
            qualified_leads: raw.qualified_leads,
            converted_leads: raw.converted_leads,
            metrics: derived,
            leads_by_source: raw.leads_by_source,
            leads_by_status: raw.leads_by_status,
            daily_trend: raw.daily_trend,
            growth,
            insights,
        })
    }

    pub async fn deal_analytics(
        &self,
        filters: &AnalyticsFilters,
    ) -> AppResult<DealAnalyticsResponse> {
        let raw = self.analytics_repo.deal_metrics(filters).await?;
        let previous = self
            .analytics_repo
            .deal_metrics(&filters.for_previous_period())
            .await?;

        let derived = deal_metrics::calculate(&raw);
        let forecast = deal_metrics::forecast(&raw);
        // 商談は金額の増減を傾向として扱う
        let growth = metrics::growth(raw.total_revenue, previous.total_revenue);
        let insights = insight::deal_insights(&derived);

        Ok(DealAnalyticsResponse {
            period: (&filters.period).into(),
            total_deals: raw.total_deals,
            won_deals: raw.won_deals,
            lost_deals: raw.lost_deals,
            total_revenue: raw.total_revenue,
            metrics: derived,
            deals_by_stage: raw.deals_by_stage,
            revenue_trend: raw.revenue_trend,
            forecast,
            growth,
            insights,
        })
    }

    pub async fn sales_activity_analytics(
        &self,
        filters: &AnalyticsFilters,
    ) -> AppResult<SalesActivityResponse> {
        let raw = self.analytics_repo.sales_activity(filters).await?;
        let total_activities = raw.lead_activities + raw.deal_activities;

        Ok(SalesActivityResponse {
            period: (&filters.period).into(),
            total_activities,
            activities_by_type: vec![
                ActivityTypeCount {
                    activity_type: "lead_created".to_string(),
                    count: raw.lead_activities,
                },
                ActivityTypeCount {
                    activity_type: "deal_created".to_string(),
                    count: raw.deal_activities,
                },
            ],
            activities_by_day: raw.activities_by_day,
            activities_per_day: metrics::ratio(
                total_activities as f64,
                filters.period.duration_days() as f64,
            ),
        })
    }

    pub async fn performance_analytics(
        &self,
        filters: &AnalyticsFilters,
    ) -> AppResult<PerformanceResponse> {
        let lead_rows = self.analytics_repo.leads_by_user(filters).await?;
        let deal_rows = self.analytics_repo.won_deals_by_user(filters).await?;

        let users = merge_user_performance(lead_rows, deal_rows);
        let rankings = rank_performance(&users);

        Ok(PerformanceResponse {
            period: (&filters.period).into(),
            users,
            rankings,
        })
    }

    pub async fn funnel_analytics(&self, company_id: Uuid) -> AppResult<FunnelAnalyticsResponse> {
        let stages = self.analytics_repo.funnel_stage_counts(company_id).await?;
        let evaluation = funnel::evaluate(&stages);
        Ok(FunnelAnalyticsResponse { stages, evaluation })
    }

    pub async fn conversion_analytics(
        &self,
        filters: &AnalyticsFilters,
    ) -> AppResult<ConversionAnalyticsResponse> {
        let raw = self.analytics_repo.lead_metrics(filters).await?;
        let previous = self
            .analytics_repo
            .lead_metrics(&filters.for_previous_period())
            .await?;

        let current_rate = lead_metrics::calculate(&raw).conversion_rate;
        let previous_rate = lead_metrics::calculate(&previous).conversion_rate;

        Ok(ConversionAnalyticsResponse {
            period: (&filters.period).into(),
            total_leads: raw.total_leads,
            converted_leads: raw.converted_leads,
            conversion_rate: current_rate,
            growth: metrics::growth(current_rate, previous_rate),
        })
    }

    pub async fn target_analytics(
        &self,
        filters: &AnalyticsFilters,
    ) -> AppResult<TargetAnalyticsResponse> {
        let targets = self
            .target_repo
            .find_in_period(filters.company_id, &filters.period)
            .await?;

        // 各目標の実績値を再集計してから進捗を導出する
        let mut progress = Vec::with_capacity(targets.len());
        for target in &targets {
            progress.push(self.target_service.refresh_model_progress(target).await?);
        }

        let summary = summarize_targets(&progress);
        let insights = insight::target_insights(summary.on_track, summary.total_targets);

        let previous = filters.for_previous_period();
        let previous_targets = self
            .target_repo
            .find_in_period(previous.company_id, &previous.period)
            .await?;
        let comparison = compare_target_counts(targets.len(), previous_targets.len());

        Ok(TargetAnalyticsResponse {
            period: (&filters.period).into(),
            targets: progress,
            summary,
            comparison,
            insights,
        })
    }

    pub async fn dashboard_analytics(
        &self,
        filters: &AnalyticsFilters,
    ) -> AppResult<DashboardResponse> {
        let lead_raw = self.analytics_repo.lead_metrics(filters).await?;
        let deal_raw = self.analytics_repo.deal_metrics(filters).await?;

        let lead_derived = lead_metrics::calculate(&lead_raw);
        let deal_derived = deal_metrics::calculate(&deal_raw);
        let insights = insight::dashboard_insights(&lead_derived, &deal_derived);

        Ok(DashboardResponse {
            period: (&filters.period).into(),
            summary: DashboardSummary {
                total_leads: lead_raw.total_leads,
                qualified_leads: lead_raw.qualified_leads,
                conversion_rate: lead_derived.conversion_rate,
                total_deals: deal_raw.total_deals,
                won_deals: deal_raw.won_deals,
                total_revenue: deal_raw.total_revenue,
                average_deal_value: deal_derived.average_deal_value,
                win_rate: deal_derived.win_rate,
            },
            charts: DashboardCharts {
                leads_by_source: lead_raw.leads_by_source,
                deals_by_stage: deal_raw.deals_by_stage,
                revenue_trend: deal_raw.revenue_trend,
                daily_trend: lead_raw.daily_trend,
            },
            insights,
        })
    }
}

/// ユーザー別のリード数と成立商談を突き合わせる
///
/// 片側にしか現れないユーザーも落とさない（リードだけ・成立だけの
/// ユーザーはもう一方を0として扱う）。
fn merge_user_performance(
    lead_rows: Vec<UserLeadCountRow>,
    deal_rows: Vec<UserWonDealsRow>,
) -> Vec<UserPerformance> {
    let mut merged: BTreeMap<Uuid, UserPerformance> = BTreeMap::new();

    for row in lead_rows {
        merged.insert(
            row.user_id,
            UserPerformance {
                user_id: row.user_id,
                leads: row.leads,
                won_deals: 0,
                total_revenue: 0.0,
                conversion_rate: 0.0,
            },
        );
    }
    for row in deal_rows {
        let entry = merged.entry(row.user_id).or_insert(UserPerformance {
            user_id: row.user_id,
            leads: 0,
            won_deals: 0,
            total_revenue: 0.0,
            conversion_rate: 0.0,
        });
        entry.won_deals = row.won_deals;
        entry.total_revenue = row.revenue.unwrap_or(0.0);
    }

    let mut users: Vec<UserPerformance> = merged.into_values().collect();
    for user in &mut users {
        user.conversion_rate = metrics::percentage(user.won_deals as f64, user.leads as f64);
    }
    users
}

fn rank_performance(users: &[UserPerformance]) -> PerformanceRankings {
    let mut by_revenue: Vec<UserPerformance> = users.to_vec();
    by_revenue.sort_by(|a, b| {
        b.total_revenue
            .partial_cmp(&a.total_revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    by_revenue.truncate(TOP_PERFORMER_LIMIT);

    let improvement_opportunities = users
        .iter()
        .filter(|u| u.leads > 0 && u.conversion_rate < IMPROVEMENT_CONVERSION_RATE)
        .cloned()
        .collect();

    PerformanceRankings {
        top_performers: by_revenue,
        improvement_opportunities,
    }
}

fn summarize_targets(progress: &[TargetProgress]) -> TargetSummary {
    let total_targets = progress.len();
    let on_track = progress.iter().filter(|p| p.on_track).count();
    let achieved = progress
        .iter()
        .filter(|p| p.percent_complete >= ACHIEVED_RATE)
        .count();
    let completion_sum: f64 = progress.iter().map(|p| p.percent_complete).sum();

    TargetSummary {
        total_targets,
        on_track,
        behind: total_targets - on_track,
        achieved,
        overall_completion_rate: metrics::ratio(completion_sum, total_targets as f64),
    }
}

fn compare_target_counts(current: usize, previous: usize) -> TargetComparison {
    let growth = metrics::growth(current as f64, previous as f64);
    let performance_change = if growth.rate > TARGET_CHANGE_BAND {
        PerformanceChange::Improving
    } else if growth.rate < -TARGET_CHANGE_BAND {
        PerformanceChange::Declining
    } else {
        PerformanceChange::Stable
    };

    TargetComparison {
        targets_growth: growth.rate,
        performance_change,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn progress(percent_complete: f64, on_track: bool) -> TargetProgress {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        TargetProgress {
            target_id: Uuid::new_v4(),
            name: "t".to_string(),
            target_type: "revenue".to_string(),
            target_value: 100.0,
            actual_value: percent_complete,
            percent_complete,
            time_progress: 50.0,
            on_track,
            days_remaining: 10,
            start_date: date,
            end_date: date,
            period: "monthly".to_string(),
            status: "active".to_string(),
        }
    }

    #[test]
    fn test_merge_keeps_users_from_both_sides() {
        let only_leads = Uuid::new_v4();
        let both = Uuid::new_v4();
        let only_deals = Uuid::new_v4();

        let users = merge_user_performance(
            vec![
                UserLeadCountRow {
                    user_id: only_leads,
                    leads: 10,
                },
                UserLeadCountRow {
                    user_id: both,
                    leads: 20,
                },
            ],
            vec![
                UserWonDealsRow {
                    user_id: both,
                    won_deals: 5,
                    revenue: Some(50_000.0),
                },
                UserWonDealsRow {
                    user_id: only_deals,
                    won_deals: 2,
                    revenue: Some(8_000.0),
                },
            ],
        );

        assert_eq!(users.len(), 3);
        let both_row = users.iter().find(|u| u.user_id == both).unwrap();
        assert_eq!(both_row.conversion_rate, 25.0);
        let lead_row = users.iter().find(|u| u.user_id == only_leads).unwrap();
        assert_eq!(lead_row.won_deals, 0);
        assert_eq!(lead_row.conversion_rate, 0.0);
    }

    #[test]
    fn test_rankings_top_three_by_revenue() {
        let mut users = Vec::new();
        for revenue in [100.0, 400.0, 200.0, 300.0] {
            users.push(UserPerformance {
                user_id: Uuid::new_v4(),
                leads: 10,
                won_deals: 5,
                total_revenue: revenue,
                conversion_rate: 50.0,
            });
        }

        let rankings = rank_performance(&users);
        assert_eq!(rankings.top_performers.len(), 3);
        assert_eq!(rankings.top_performers[0].total_revenue, 400.0);
        assert_eq!(rankings.top_performers[2].total_revenue, 200.0);
        assert!(rankings.improvement_opportunities.is_empty());
    }

    #[test]
    fn test_low_conversion_users_flagged_for_improvement() {
        let users = vec![
            UserPerformance {
                user_id: Uuid::new_v4(),
                leads: 20,
                won_deals: 1,
                total_revenue: 1_000.0,
                conversion_rate: 5.0,
            },
            // リード0件のユーザーは判断材料が無いので候補にしない
            UserPerformance {
                user_id: Uuid::new_v4(),
                leads: 0,
                won_deals: 0,
                total_revenue: 0.0,
                conversion_rate: 0.0,
            },
        ];
        let rankings = rank_performance(&users);
        assert_eq!(rankings.improvement_opportunities.len(), 1);
        assert_eq!(rankings.improvement_opportunities[0].leads, 20);
    }

    #[test]
    fn test_summary_counts_and_mean_completion() {
        let progress = vec![
            progress(120.0, true),
            progress(60.0, true),
            progress(30.0, false),
        ];
        let summary = summarize_targets(&progress);
        assert_eq!(summary.total_targets, 3);
        assert_eq!(summary.on_track, 2);
        assert_eq!(summary.behind, 1);
        assert_eq!(summary.achieved, 1);
        assert!((summary.overall_completion_rate - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_of_no_targets_is_all_zero() {
        let summary = summarize_targets(&[]);
        assert_eq!(summary.total_targets, 0);
        assert_eq!(summary.overall_completion_rate, 0.0);
    }

    #[test]
    fn test_target_count_comparison_band() {
        assert_eq!(
            compare_target_counts(12, 10).performance_change,
            PerformanceChange::Improving
        );
        assert_eq!(
            compare_target_counts(8, 10).performance_change,
            PerformanceChange::Declining
        );
        // ±5% 以内は stable
        assert_eq!(
            compare_target_counts(102, 100).performance_change,
            PerformanceChange::Stable
        );
        // 前期間に目標が無ければ成長率0で stable
        assert_eq!(
            compare_target_counts(5, 0).performance_change,
            PerformanceChange::Stable
        );
    }
}
