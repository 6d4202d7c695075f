// src/service/target_service.rs

use crate::api::dto::target_dto::{CreateTargetDto, TargetDto, UpdateTargetDto};
use crate::db::DbPool;
use crate::domain::period::Period;
use crate::domain::target_model;
use crate::domain::target_type::TargetType;
use crate::error::{AppError, AppResult};
use crate::repository::analytics_repository::AnalyticsRepository;
use crate::repository::target_repository::TargetRepository;
use crate::service::metrics::percentage;
use chrono::{DateTime, Utc};
use sea_orm::Set;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const DEFAULT_CURRENCY: &str = "USD";
const DEFAULT_STATUS: &str = "active";

/// 目標ごとの進捗（リクエストのたびに導出、永続化しない）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetProgress {
    pub target_id: Uuid,
    pub name: String,
    pub target_type: String,
    pub target_value: f64,
    pub actual_value: f64,
    /// actual ÷ target × 100（target が0なら0）
    pub percent_complete: f64,
    /// 期間の経過割合。開始前は0、終了後は100
    pub time_progress: f64,
    /// 開始前、または完了率が経過割合以上なら true
    pub on_track: bool,
    /// 期限までの日数（超過していれば負）
    pub days_remaining: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub period: String,
    pub status: String,
}

/// 目標と実績値から進捗を導出する純関数
pub fn compute_progress(
    target: &target_model::Model,
    actual_value: f64,
    now: DateTime<Utc>,
) -> TargetProgress {
    let percent_complete = percentage(actual_value, target.target_value);

    let time_progress = if now < target.start_date {
        0.0
    } else if now > target.end_date {
        100.0
    } else {
        let total = (target.end_date - target.start_date).num_seconds();
        if total > 0 {
            let elapsed = (now - target.start_date).num_seconds();
            (elapsed as f64 / total as f64) * 100.0
        } else {
            // 開始と終了が同時刻の目標は経過済みとみなす
            100.0
        }
    };

    let on_track = time_progress <= 0.0 || percent_complete >= time_progress;
    let days_remaining = (target.end_date - now).num_days();

    TargetProgress {
        target_id: target.id,
        name: target.name.clone(),
        target_type: target.target_type.clone(),
        target_value: target.target_value,
        actual_value,
        percent_complete,
        time_progress,
        on_track,
        days_remaining,
        start_date: target.start_date,
        end_date: target.end_date,
        period: target.period.clone(),
        status: target.status.clone(),
    }
}

pub struct TargetService {
    repo: Arc<TargetRepository>,
    analytics_repo: Arc<AnalyticsRepository>,
}

impl TargetService {
    pub fn new(db: DbPool) -> Self {
        Self {
            repo: Arc::new(TargetRepository::new(db.clone())),
            analytics_repo: Arc::new(AnalyticsRepository::new(db)),
        }
    }

    // --- CRUD ---

    pub async fn create_target(
        &self,
        company_id: Uuid,
        payload: CreateTargetDto,
    ) -> AppResult<TargetDto> {
        Self::check_ownership(payload.user_id, payload.team_id)?;
        Self::check_target_type(&payload.target_type)?;
        // 期間の妥当性は保存前に検証する
        Period::new(payload.start_date, payload.end_date)?;

        let model = target_model::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(payload.name),
            target_type: Set(payload.target_type),
            target_value: Set(payload.target_value),
            actual_value: Set(0.0),
            user_id: Set(payload.user_id),
            team_id: Set(payload.team_id),
            start_date: Set(payload.start_date),
            end_date: Set(payload.end_date),
            period: Set(payload.period),
            status: Set(DEFAULT_STATUS.to_string()),
            currency: Set(payload
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())),
            company_id: Set(company_id),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
        };

        let created = self.repo.create(model).await?;
        info!(target_id = %created.id, "Target created");
        Ok(created.into())
    }

    pub async fn update_target(
        &self,
        company_id: Uuid,
        id: Uuid,
        payload: UpdateTargetDto,
    ) -> AppResult<TargetDto> {
        let existing = self.require_target(id, company_id).await?;

        // 更新後の値で所有者・期間の整合性を確認する
        Self::check_ownership(
            payload.user_id.or(existing.user_id),
            payload.team_id.or(existing.team_id),
        )?;
        if let Some(target_type) = &payload.target_type {
            Self::check_target_type(target_type)?;
        }
        let start = payload.start_date.unwrap_or(existing.start_date);
        let end = payload.end_date.unwrap_or(existing.end_date);
        Period::new(start, end)?;

        let mut model: target_model::ActiveModel = existing.into();
        if let Some(name) = payload.name {
            model.name = Set(name);
        }
        if let Some(target_type) = payload.target_type {
            model.target_type = Set(target_type);
        }
        if let Some(target_value) = payload.target_value {
            model.target_value = Set(target_value);
        }
        if let Some(user_id) = payload.user_id {
            model.user_id = Set(Some(user_id));
        }
        if let Some(team_id) = payload.team_id {
            model.team_id = Set(Some(team_id));
        }
        if let Some(start_date) = payload.start_date {
            model.start_date = Set(start_date);
        }
        if let Some(end_date) = payload.end_date {
            model.end_date = Set(end_date);
        }
        if let Some(period) = payload.period {
            model.period = Set(period);
        }
        if let Some(status) = payload.status {
            model.status = Set(status);
        }
        if let Some(currency) = payload.currency {
            model.currency = Set(currency);
        }
        model.updated_at = Set(Utc::now());

        let updated = self.repo.update(model).await?;
        Ok(updated.into())
    }

    pub async fn delete_target(&self, company_id: Uuid, id: Uuid) -> AppResult<()> {
        let result = self.repo.delete(id, company_id).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Target {} not found", id)));
        }
        Ok(())
    }

    pub async fn get_target(&self, company_id: Uuid, id: Uuid) -> AppResult<TargetDto> {
        let target = self.require_target(id, company_id).await?;
        Ok(target.into())
    }

    pub async fn list_targets(&self, company_id: Uuid) -> AppResult<Vec<TargetDto>> {
        let targets = self.repo.find_all(company_id).await?;
        Ok(targets.into_iter().map(Into::into).collect())
    }

    // --- Progress ---

    /// 実績値を再集計して書き戻し、最新の進捗を返す
    ///
    /// 進捗の読み取りが actual_value の更新という副作用を持つ点は
    /// 意図した仕様（呼び出し側はキャッシュ値が新鮮であることに依存できる）。
    pub async fn refresh_progress(&self, company_id: Uuid, id: Uuid) -> AppResult<TargetProgress> {
        let target = self.require_target(id, company_id).await?;
        self.refresh_model_progress(&target).await
    }

    /// 保存済みの actual_value から進捗を導出する（書き戻しなし）
    pub async fn peek_progress(&self, company_id: Uuid, id: Uuid) -> AppResult<TargetProgress> {
        let target = self.require_target(id, company_id).await?;
        Ok(compute_progress(&target, target.actual_value, Utc::now()))
    }

    /// アクティブな全目標の進捗スイープ（各目標の実績値を書き戻す）
    pub async fn all_progress(&self, company_id: Uuid) -> AppResult<Vec<TargetProgress>> {
        let targets = self.repo.find_active(company_id).await?;
        let mut progress = Vec::with_capacity(targets.len());
        for target in &targets {
            progress.push(self.refresh_model_progress(target).await?);
        }
        Ok(progress)
    }

    /// 取得済みの目標レコードに対する再集計と書き戻し
    pub async fn refresh_model_progress(
        &self,
        target: &target_model::Model,
    ) -> AppResult<TargetProgress> {
        let target_type = TargetType::from_str(&target.target_type).ok_or_else(|| {
            AppError::InternalServerError(format!(
                "Target {} has unknown target type '{}'",
                target.id, target.target_type
            ))
        })?;
        let period = Period::new(target.start_date, target.end_date)?;

        let actual_value = self
            .analytics_repo
            .actual_target_value(target_type, target.company_id, &period)
            .await?;

        self.repo.update_actual_value(target.id, actual_value).await?;

        Ok(compute_progress(target, actual_value, Utc::now()))
    }

    async fn require_target(
        &self,
        id: Uuid,
        company_id: Uuid,
    ) -> AppResult<target_model::Model> {
        self.repo
            .find_by_id(id, company_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Target {} not found", id)))
    }

    // 目標はユーザーかチームのどちらか一方にのみ割り当て可能
    // （両方未指定は会社全体の目標として扱う）
    fn check_ownership(user_id: Option<Uuid>, team_id: Option<Uuid>) -> AppResult<()> {
        if user_id.is_some() && team_id.is_some() {
            return Err(AppError::ValidationError(
                "A target may be assigned to a user or a team, not both".to_string(),
            ));
        }
        Ok(())
    }

    fn check_target_type(target_type: &str) -> AppResult<()> {
        TargetType::from_str(target_type).ok_or_else(|| {
            AppError::ValidationError(format!(
                "Unknown target type '{}'; expected one of revenue, leads, deals, conversion",
                target_type
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn target(target_value: f64, start: DateTime<Utc>, end: DateTime<Utc>) -> target_model::Model {
        target_model::Model {
            id: Uuid::new_v4(),
            name: "Q1 revenue".to_string(),
            target_type: "revenue".to_string(),
            target_value,
            actual_value: 0.0,
            user_id: None,
            team_id: None,
            start_date: start,
            end_date: end,
            period: "quarterly".to_string(),
            status: "active".to_string(),
            currency: "USD".to_string(),
            company_id: Uuid::new_v4(),
            created_at: start,
            updated_at: start,
        }
    }

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_before_start_is_on_track_regardless_of_completion() {
        let target = target(100.0, ts(2024, 2, 1), ts(2024, 3, 1));
        let progress = compute_progress(&target, 0.0, ts(2024, 1, 15));
        assert_eq!(progress.time_progress, 0.0);
        assert!(progress.on_track);
        assert_eq!(progress.percent_complete, 0.0);
    }

    #[test]
    fn test_after_end_time_progress_is_capped() {
        let target = target(100.0, ts(2024, 1, 1), ts(2024, 2, 1));
        let progress = compute_progress(&target, 50.0, ts(2024, 3, 1));
        assert_eq!(progress.time_progress, 100.0);
        assert!(!progress.on_track);
        assert!(progress.days_remaining < 0);
    }

    #[test]
    fn test_on_track_when_completion_meets_elapsed_time() {
        // 10日間の期間の4日目: time_progress = 40%
        let target = target(100.0, ts(2024, 1, 1), ts(2024, 1, 11));
        let now = ts(2024, 1, 5);

        let ahead = compute_progress(&target, 50.0, now);
        assert_eq!(ahead.time_progress, 40.0);
        assert!(ahead.on_track);

        let behind = compute_progress(&target, 30.0, now);
        assert!(!behind.on_track);
    }

    #[test]
    fn test_zero_target_value_completes_at_zero() {
        let target = target(0.0, ts(2024, 1, 1), ts(2024, 1, 31));
        let progress = compute_progress(&target, 500.0, ts(2024, 1, 10));
        assert_eq!(progress.percent_complete, 0.0);
        assert!(progress.percent_complete.is_finite());
    }

    #[test]
    fn test_days_remaining_counts_down() {
        let target = target(100.0, ts(2024, 1, 1), ts(2024, 1, 31));
        let progress = compute_progress(&target, 10.0, ts(2024, 1, 21));
        assert_eq!(progress.days_remaining, 10);
    }

    #[test]
    fn test_instant_period_counts_as_elapsed() {
        let instant = ts(2024, 1, 1);
        let target = target(100.0, instant, instant);
        let progress = compute_progress(&target, 0.0, instant);
        assert_eq!(progress.time_progress, 100.0);
        assert!(!progress.on_track);
    }

    #[test]
    fn test_halfway_through_period() {
        let target = target(200.0, ts(2024, 1, 1), ts(2024, 1, 3));
        let progress = compute_progress(&target, 100.0, ts(2024, 1, 2));
        assert!((progress.time_progress - 50.0).abs() < 1e-9);
        assert_eq!(progress.percent_complete, 50.0);
        assert!(progress.on_track);

        // 同じ入力からは同じ進捗が導出される
        let again = compute_progress(&target, 100.0, ts(2024, 1, 2));
        assert_eq!(progress, again);
    }
}
