// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Validation failed")]
    ValidationFailure(#[from] ValidationErrors),

    #[error("Failed to parse UUID: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::DbErr(db_err) => {
                // サーバーログには詳細を出すが、クライアントには内部情報を漏らさない
                tracing::error!("Database error: {:?}", db_err);

                let status = match db_err {
                    DbErr::RecordNotFound(_) => StatusCode::NOT_FOUND,
                    // 集計クエリの失敗は上流サービスの障害として扱う
                    _ => StatusCode::SERVICE_UNAVAILABLE,
                };

                let (message, details) = match &db_err {
                    DbErr::RecordNotFound(entity) => (
                        "The requested resource was not found".to_string(),
                        Some(json!({ "entity": entity })),
                    ),
                    _ => (
                        "The metric source is unavailable".to_string(),
                        Some(json!({ "hint": "Check database connection" })),
                    ),
                };

                (
                    status,
                    ErrorResponse {
                        success: false,
                        error: message.clone(),
                        message,
                        details,
                        error_type: "source_unavailable".to_string(),
                    },
                )
            }
            AppError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    success: false,
                    error: message.clone(),
                    message,
                    details: None,
                    error_type: "not_found".to_string(),
                },
            ),
            AppError::InvalidDateFormat(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    success: false,
                    error: message.clone(),
                    message,
                    details: Some(json!({ "expected_format": "YYYY-MM-DD" })),
                    error_type: "invalid_date_format".to_string(),
                },
            ),
            AppError::InvalidRange(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    success: false,
                    error: message.clone(),
                    message,
                    details: None,
                    error_type: "invalid_range".to_string(),
                },
            ),
            AppError::ValidationError(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    success: false,
                    error: message.clone(),
                    message,
                    details: None,
                    error_type: "validation_error".to_string(),
                },
            ),
            AppError::ValidationFailure(errors) => {
                let messages: Vec<String> = errors
                    .field_errors()
                    .into_iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            let message = e.message.as_ref().map_or_else(
                                || "Invalid value".to_string(),
                                |cow| cow.to_string(),
                            );
                            format!("{}: {}", field, message)
                        })
                    })
                    .collect();
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        success: false,
                        error: "Validation failed".to_string(),
                        message: "Validation failed".to_string(),
                        details: Some(json!({ "errors": messages })),
                        error_type: "validation_errors".to_string(),
                    },
                )
            }
            AppError::UuidError(err) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    success: false,
                    error: format!("Invalid UUID: {}", err),
                    message: format!("Invalid UUID: {}", err),
                    details: None,
                    error_type: "invalid_uuid".to_string(),
                },
            ),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    success: false,
                    error: message.clone(),
                    message,
                    details: None,
                    error_type: "bad_request".to_string(),
                },
            ),
            AppError::InternalServerError(message) => {
                tracing::error!("Internal server error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        success: false,
                        error: "An internal server error occurred".to_string(),
                        message: "An internal server error occurred".to_string(),
                        details: None,
                        error_type: "internal_server_error".to_string(),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// 統一的なエラーレスポンス構造
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub error_type: String,
}
