// src/api/mod.rs

pub mod dto;
pub mod handlers;

use crate::db::DbPool;
use crate::service::analytics_service::AnalyticsService;
use crate::service::target_service::TargetService;
use std::sync::Arc;

/// ハンドラ間で共有するアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub analytics_service: Arc<AnalyticsService>,
    pub target_service: Arc<TargetService>,
}

impl AppState {
    pub fn new(db: DbPool) -> Self {
        let target_service = Arc::new(TargetService::new(db.clone()));
        let analytics_service = Arc::new(AnalyticsService::new(db, target_service.clone()));
        Self {
            analytics_service,
            target_service,
        }
    }
}
