// src/api/dto/target_dto.rs

use crate::domain::target_model;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- Request DTOs ---

#[derive(Deserialize, Serialize, Debug, Validate)]
pub struct CreateTargetDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Target name must be between 1 and 100 characters"
    ))]
    pub name: String,

    /// revenue / leads / deals / conversion
    pub target_type: String,

    #[validate(range(min = 0.0, message = "Target value must not be negative"))]
    pub target_value: f64,

    // ユーザーかチームのどちらか一方（両方指定はサービス層で拒否）
    pub user_id: Option<Uuid>,
    pub team_id: Option<Uuid>,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,

    /// 期間ラベル（monthly / quarterly / annual）
    #[validate(length(min = 1, max = 50, message = "Period label is required"))]
    pub period: String,

    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default, Validate)]
pub struct UpdateTargetDto {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Target name must be between 1 and 100 characters"
    ))]
    pub name: Option<String>,

    pub target_type: Option<String>,

    #[validate(range(min = 0.0, message = "Target value must not be negative"))]
    pub target_value: Option<f64>,

    pub user_id: Option<Uuid>,
    pub team_id: Option<Uuid>,

    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 50, message = "Period label must not be empty"))]
    pub period: Option<String>,

    pub status: Option<String>,

    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,
}

// --- Response DTOs ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetDto {
    pub id: Uuid,
    pub name: String,
    pub target_type: String,
    pub target_value: f64,
    pub actual_value: f64,
    pub user_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub period: String,
    pub status: String,
    pub currency: String,
    pub company_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<target_model::Model> for TargetDto {
    fn from(model: target_model::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            target_type: model.target_type,
            target_value: model.target_value,
            actual_value: model.actual_value,
            user_id: model.user_id,
            team_id: model.team_id,
            start_date: model.start_date,
            end_date: model.end_date,
            period: model.period,
            status: model.status,
            currency: model.currency,
            company_id: model.company_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_target_dto_validation() {
        let dto = CreateTargetDto {
            name: "Q1 revenue".to_string(),
            target_type: "revenue".to_string(),
            target_value: 100_000.0,
            user_id: None,
            team_id: None,
            start_date: Utc::now(),
            end_date: Utc::now(),
            period: "quarterly".to_string(),
            currency: Some("USD".to_string()),
        };
        assert!(dto.validate().is_ok());

        let invalid = CreateTargetDto {
            name: String::new(),
            target_value: -5.0,
            ..dto
        };
        assert!(invalid.validate().is_err());
    }
}
