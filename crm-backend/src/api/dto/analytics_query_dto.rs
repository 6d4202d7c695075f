// src/api/dto/analytics_query_dto.rs

use crate::domain::analytics_filters::AnalyticsFilters;
use crate::domain::period::Period;
use crate::error::AppResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 集計エンドポイント共通のクエリパラメータ
///
/// 日付は YYYY-MM-DD。省略時は直近30日が対象になる。
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct AnalyticsQuery {
    pub company_id: Uuid,

    pub start_date: Option<String>,
    pub end_date: Option<String>,

    pub user_id: Option<Uuid>,

    #[validate(length(max = 100, message = "Source must not exceed 100 characters"))]
    pub source: Option<String>,

    #[validate(length(max = 50, message = "Status must not exceed 50 characters"))]
    pub status: Option<String>,

    #[validate(length(max = 50, message = "Stage must not exceed 50 characters"))]
    pub stage: Option<String>,

    #[validate(length(max = 100, message = "Campaign must not exceed 100 characters"))]
    pub campaign: Option<String>,
}

impl AnalyticsQuery {
    /// クエリを検証済みのフィルタに変換する
    ///
    /// 日付の検証はクエリ発行前にここで完結する。
    pub fn into_filters(self, now: DateTime<Utc>) -> AppResult<AnalyticsFilters> {
        let period = Period::from_bounds(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            now,
        )?;
        let mut filters = AnalyticsFilters::new(period, self.company_id);
        filters.user_id = self.user_id;
        filters.source = self.source;
        filters.status = self.status;
        filters.stage = self.stage;
        filters.campaign = self.campaign;
        Ok(filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_into_filters_builds_inclusive_period() {
        let query = AnalyticsQuery {
            company_id: Uuid::new_v4(),
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-31".to_string()),
            ..Default::default()
        };
        let filters = query.into_filters(now()).unwrap();
        assert_eq!(
            filters.period.end(),
            Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap()
        );
    }

    #[test]
    fn test_into_filters_rejects_bad_date_before_any_query() {
        let query = AnalyticsQuery {
            company_id: Uuid::new_v4(),
            start_date: Some("not-a-date".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            query.into_filters(now()),
            Err(AppError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn test_validation_limits_filter_lengths() {
        let query = AnalyticsQuery {
            company_id: Uuid::new_v4(),
            source: Some("x".repeat(200)),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }
}
