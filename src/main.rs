// region:    --- Imports
use gallery_auction::config::Config;
use gallery_auction::database::DatabaseManager;
use gallery_auction::notification::NotificationWorker;
use gallery_auction::routes::build_router;
use gallery_auction::scheduler::MaintenanceScheduler;
use gallery_auction::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 는 없어도 된다
    dotenvy::dotenv().ok();

    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gallery_auction=info,tower_http=info")),
        )
        .without_time()
        .with_target(false)
        .init();

    let config = Config::load()?;
    info!("{:<12} --> 설정 로드 완료", "Main");

    // DatabaseManager 생성
    let db_manager = DatabaseManager::new(&config.database).await?;

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    let address = config.server_address();
    let (state, receiver) = AppState::build(config, db_manager)?;

    // 입찰 알림 워커 시작
    let delay = Duration::from_secs(state.config.notification.delay_secs);
    NotificationWorker::new(receiver, Arc::new(state.bid_notifier()), delay).start();

    // 정리 작업 스케줄러 시작
    let period = Duration::from_secs(state.config.scheduler.cleanup_interval_secs);
    MaintenanceScheduler::new(state.db_manager.get_pool(), period).start();

    let routes_all = build_router(state);

    let listener = TcpListener::bind(&address).await?;
    info!("{:<12} --> Web Server: Listening on {}", "Main", listener.local_addr()?);

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
