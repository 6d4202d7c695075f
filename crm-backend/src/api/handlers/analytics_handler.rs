// src/api/handlers/analytics_handler.rs

//! 集計エンドポイント群
//!
//! どのハンドラも同じ形をしている: クエリの検証 → フィルタへの変換 →
//! ファサード呼び出し → ApiResponse で包んで返す。日付の検証は
//! into_filters で完結するため、不正な日付はDBに触れる前に400で返る。

use crate::api::dto::analytics_query_dto::AnalyticsQuery;
use crate::api::AppState;
use crate::error::AppResult;
use crate::types::ApiResponse;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use validator::Validate;

pub fn analytics_router(state: AppState) -> Router {
    Router::new()
        .route("/analytics/dashboard", get(get_dashboard_analytics))
        .route("/analytics/leads", get(get_lead_analytics))
        .route("/analytics/deals", get(get_deal_analytics))
        .route("/analytics/sales-activity", get(get_sales_activity))
        .route("/analytics/performance", get(get_performance_analytics))
        .route("/analytics/funnel", get(get_funnel_analytics))
        .route("/analytics/conversion", get(get_conversion_analytics))
        .route("/analytics/targets", get(get_target_analytics))
        .with_state(state)
}

pub async fn get_dashboard_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<impl IntoResponse> {
    query.validate()?;
    let filters = query.into_filters(Utc::now())?;
    let data = state.analytics_service.dashboard_analytics(&filters).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

pub async fn get_lead_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<impl IntoResponse> {
    query.validate()?;
    let filters = query.into_filters(Utc::now())?;
    let data = state.analytics_service.lead_analytics(&filters).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

pub async fn get_deal_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<impl IntoResponse> {
    query.validate()?;
    let filters = query.into_filters(Utc::now())?;
    let data = state.analytics_service.deal_analytics(&filters).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

pub async fn get_sales_activity(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<impl IntoResponse> {
    query.validate()?;
    let filters = query.into_filters(Utc::now())?;
    let data = state
        .analytics_service
        .sales_activity_analytics(&filters)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

pub async fn get_performance_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<impl IntoResponse> {
    query.validate()?;
    let filters = query.into_filters(Utc::now())?;
    let data = state
        .analytics_service
        .performance_analytics(&filters)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

// ファネルは会社の全期間が対象（期間フィルタは適用しない）
pub async fn get_funnel_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<impl IntoResponse> {
    query.validate()?;
    let data = state
        .analytics_service
        .funnel_analytics(query.company_id)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

pub async fn get_conversion_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<impl IntoResponse> {
    query.validate()?;
    let filters = query.into_filters(Utc::now())?;
    let data = state
        .analytics_service
        .conversion_analytics(&filters)
        .await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

pub async fn get_target_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> AppResult<impl IntoResponse> {
    query.validate()?;
    let filters = query.into_filters(Utc::now())?;
    let data = state.analytics_service.target_analytics(&filters).await?;
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}
