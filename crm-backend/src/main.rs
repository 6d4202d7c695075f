// src/main.rs
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crm_backend::api::handlers::analytics_handler::analytics_router;
use crm_backend::api::handlers::target_handler::target_router;
use crm_backend::api::AppState;
use crm_backend::config::Config;
use crm_backend::db::create_db_pool;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crm_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting CRM Analytics Backend server...");

    // 設定を読み込む
    let app_config = Config::from_env().expect("Failed to load configuration");
    tracing::info!("Configuration loaded: {:?}", app_config);

    // データベース接続を作成
    let db_pool = create_db_pool(&app_config)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created successfully.");

    // ルーターの設定
    let state = AppState::new(db_pool);
    let app_router = analytics_router(state.clone())
        .merge(target_router(state))
        .layer(TraceLayer::new_for_http());

    // サーバーの起動
    tracing::info!(
        "Router configured. Server listening on {}",
        app_config.server_addr
    );

    let listener = TcpListener::bind(&app_config.server_addr).await?;
    axum::serve(listener, app_router.into_make_service()).await?;

    Ok(())
}
