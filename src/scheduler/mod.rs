/// 정리 작업 스케줄러
/// 종료된 경매의 관심 등록과 알림 기록을 지우고, 즉시 구매가 기본값을 채운다.
// region:    --- Imports
use crate::accounts::queries as account_queries;
use crate::bidding::rules::BUY_NOW_MULTIPLIER;
use crate::query::queries as auction_queries;
use crate::watchers::queries as watcher_queries;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{error, info};
// endregion: --- Imports

/// 한 번의 정리 실행 결과
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub watchers_removed: u64,
    pub logs_removed: u64,
    pub prices_backfilled: u64,
    pub tokens_purged: u64,
}

// region:    --- Maintenance Scheduler
pub struct MaintenanceScheduler {
    pool: Arc<PgPool>,
    period: Duration,
}

impl MaintenanceScheduler {
    pub fn new(pool: Arc<PgPool>, period: Duration) -> Self {
        Self { pool, period }
    }

    /// 주기 실행 시작 (실패는 기록 후 다음 주기에 재시도)
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            // interval 은 0 주기를 허용하지 않는다
            let mut ticker = interval(self.period.max(Duration::from_secs(1)));
            loop {
                ticker.tick().await;
                if let Err(e) = Self::run_cleanup(&self.pool, Utc::now()).await {
                    error!("{:<12} --> 정리 작업 중 오류 발생: {:?}", "Scheduler", e);
                }
            }
        })
    }

    /// 정리 작업 1회 실행
    pub async fn run_cleanup(pool: &PgPool, now: DateTime<Utc>) -> Result<CleanupReport, sqlx::Error> {
        let watchers_removed = sqlx::query(watcher_queries::DELETE_WATCHERS_OF_ENDED)
            .bind(now)
            .execute(pool)
            .await?
            .rows_affected();
        info!("{:<12} --> 종료된 경매 관심 등록 삭제: {}건", "Scheduler", watchers_removed);

        let logs_removed = sqlx::query(watcher_queries::DELETE_LOGS_OF_ENDED)
            .bind(now)
            .execute(pool)
            .await?
            .rows_affected();
        info!("{:<12} --> 종료된 경매 알림 기록 삭제: {}건", "Scheduler", logs_removed);

        let prices_backfilled = sqlx::query(auction_queries::BACKFILL_BUY_NOW_PRICE)
            .bind(BUY_NOW_MULTIPLIER)
            .execute(pool)
            .await?
            .rows_affected();
        info!("{:<12} --> 즉시 구매가 기본값 적용: {}건", "Scheduler", prices_backfilled);

        let tokens_purged = sqlx::query(account_queries::PURGE_EXPIRED_BLACKLIST)
            .bind(now)
            .execute(pool)
            .await?
            .rows_affected();
        info!("{:<12} --> 만료된 블랙리스트 토큰 삭제: {}건", "Scheduler", tokens_purged);

        Ok(CleanupReport {
            watchers_removed,
            logs_removed,
            prices_backfilled,
            tokens_purged,
        })
    }
}
// endregion: --- Maintenance Scheduler
