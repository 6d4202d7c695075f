// src/api/handlers/target_handler.rs

//! 目標のCRUDと進捗エンドポイント
//!
//! 全ルートが company_id をクエリで受け取り、他社の目標には
//! 404 を返す（存在の有無を漏らさない）。

use crate::api::AppState;
use crate::api::dto::target_dto::{CreateTargetDto, UpdateTargetDto};
use crate::error::AppResult;
use crate::types::ApiResponse;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct CompanyQuery {
    pub company_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    pub company_id: Uuid,
    /// true なら実績値を再集計して書き戻してから返す
    #[serde(default)]
    pub refresh: bool,
}

pub fn target_router(state: AppState) -> Router {
    Router::new()
        .route("/targets", get(list_targets).post(create_target))
        .route("/targets/progress", get(get_all_progress))
        .route(
            "/targets/{id}",
            get(get_target).put(update_target).delete(delete_target),
        )
        .route("/targets/{id}/progress", get(get_target_progress))
        .with_state(state)
}

pub async fn list_targets(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
) -> AppResult<impl IntoResponse> {
    let targets = state.target_service.list_targets(query.company_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(targets))))
}

pub async fn create_target(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
    Json(payload): Json<CreateTargetDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let target = state
        .target_service
        .create_target(query.company_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(target))))
}

pub async fn get_target(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<CompanyQuery>,
) -> AppResult<impl IntoResponse> {
    let target = state.target_service.get_target(query.company_id, id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(target))))
}

pub async fn update_target(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<CompanyQuery>,
    Json(payload): Json<UpdateTargetDto>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;
    let target = state
        .target_service
        .update_target(query.company_id, id, payload)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(target))))
}

pub async fn delete_target(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<CompanyQuery>,
) -> AppResult<impl IntoResponse> {
    state
        .target_service
        .delete_target(query.company_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_target_progress(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ProgressQuery>,
) -> AppResult<impl IntoResponse> {
    let progress = if query.refresh {
        state
            .target_service
            .refresh_progress(query.company_id, id)
            .await?
    } else {
        state
            .target_service
            .peek_progress(query.company_id, id)
            .await?
    };
    Ok((StatusCode::OK, Json(ApiResponse::success(progress))))
}

/// アクティブな全目標の進捗スイープ
pub async fn get_all_progress(
    State(state): State<AppState>,
    Query(query): Query<CompanyQuery>,
) -> AppResult<impl IntoResponse> {
    let progress = state.target_service.all_progress(query.company_id).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(progress))))
}
