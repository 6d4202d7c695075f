// src/domain/analytics_filters.rs

use crate::domain::period::Period;
use uuid::Uuid;

/// 集計リクエストごとに固定される絞り込み条件
#[derive(Debug, Clone)]
pub struct AnalyticsFilters {
    pub period: Period,
    pub company_id: Uuid,
    pub user_id: Option<Uuid>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub stage: Option<String>,
    pub campaign: Option<String>,
}

impl AnalyticsFilters {
    pub fn new(period: Period, company_id: Uuid) -> Self {
        Self {
            period,
            company_id,
            user_id: None,
            source: None,
            status: None,
            stage: None,
            campaign: None,
        }
    }

    /// 同じ絞り込みで直前期間を対象にしたフィルタ
    pub fn for_previous_period(&self) -> Self {
        Self {
            period: self.period.previous(),
            ..self.clone()
        }
    }
}
