/// 알림 작업이 사용하는 저장소
// region:    --- Imports
use crate::bidding::model::Auction;
use crate::query::queries as auction_queries;
use crate::watchers::model::WatcherContact;
use crate::watchers::queries;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
// endregion: --- Imports

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn auction(&self, auction_id: i64) -> Result<Option<Auction>, sqlx::Error>;

    async fn latest_bidder(&self, auction_id: i64) -> Result<Option<i64>, sqlx::Error>;

    async fn watchers(&self, auction_id: i64) -> Result<Vec<WatcherContact>, sqlx::Error>;

    /// 발송 기록 선점
    ///
    /// `interval` 안에 발송 기록이 있으면 false, 없으면 `now` 를 기록하고 true.
    /// 확인과 기록은 원자적으로 처리되어야 한다.
    async fn try_claim(
        &self,
        user_email: &str,
        auction_id: i64,
        now: DateTime<Utc>,
        interval: Duration,
    ) -> Result<bool, sqlx::Error>;
}

pub struct PostgresNotificationStore {
    pool: Arc<PgPool>,
}

impl PostgresNotificationStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PostgresNotificationStore {
    async fn auction(&self, auction_id: i64) -> Result<Option<Auction>, sqlx::Error> {
        sqlx::query_as::<_, Auction>(auction_queries::GET_AUCTION)
            .bind(auction_id)
            .fetch_optional(&*self.pool)
            .await
    }

    async fn latest_bidder(&self, auction_id: i64) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar(auction_queries::GET_LATEST_BIDDER)
            .bind(auction_id)
            .fetch_optional(&*self.pool)
            .await
    }

    async fn watchers(&self, auction_id: i64) -> Result<Vec<WatcherContact>, sqlx::Error> {
        sqlx::query_as::<_, WatcherContact>(queries::GET_WATCHER_CONTACTS)
            .bind(auction_id)
            .fetch_all(&*self.pool)
            .await
    }

    async fn try_claim(
        &self,
        user_email: &str,
        auction_id: i64,
        now: DateTime<Utc>,
        interval: Duration,
    ) -> Result<bool, sqlx::Error> {
        let claimed: Option<i64> = sqlx::query_scalar(queries::CLAIM_NOTIFICATION_SLOT)
            .bind(user_email)
            .bind(auction_id)
            .bind(now)
            .bind(now - interval)
            .fetch_optional(&*self.pool)
            .await?;
        Ok(claimed.is_some())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::notification::should_notify;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 메모리 기반 저장소 (잠금 안에서 확인과 기록)
    #[derive(Default)]
    pub struct InMemoryNotificationStore {
        auctions: Mutex<HashMap<i64, (Auction, Option<i64>)>>,
        watchers: Mutex<HashMap<i64, Vec<WatcherContact>>>,
        logs: Mutex<HashMap<(String, i64), DateTime<Utc>>>,
    }

    impl InMemoryNotificationStore {
        pub fn add_auction(&self, auction: Auction, latest_bidder: Option<i64>) {
            self.auctions
                .lock()
                .unwrap()
                .insert(auction.id, (auction, latest_bidder));
        }

        pub fn add_watcher(&self, auction_id: i64, contact: WatcherContact) {
            self.watchers
                .lock()
                .unwrap()
                .entry(auction_id)
                .or_default()
                .push(contact);
        }

        pub fn set_last_notified(&self, email: &str, auction_id: i64, at: DateTime<Utc>) {
            self.logs
                .lock()
                .unwrap()
                .insert((email.to_string(), auction_id), at);
        }
    }

    #[async_trait]
    impl NotificationStore for InMemoryNotificationStore {
        async fn auction(&self, auction_id: i64) -> Result<Option<Auction>, sqlx::Error> {
            Ok(self
                .auctions
                .lock()
                .unwrap()
                .get(&auction_id)
                .map(|(a, _)| a.clone()))
        }

        async fn latest_bidder(&self, auction_id: i64) -> Result<Option<i64>, sqlx::Error> {
            Ok(self
                .auctions
                .lock()
                .unwrap()
                .get(&auction_id)
                .and_then(|(_, bidder)| *bidder))
        }

        async fn watchers(&self, auction_id: i64) -> Result<Vec<WatcherContact>, sqlx::Error> {
            Ok(self
                .watchers
                .lock()
                .unwrap()
                .get(&auction_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn try_claim(
            &self,
            user_email: &str,
            auction_id: i64,
            now: DateTime<Utc>,
            interval: Duration,
        ) -> Result<bool, sqlx::Error> {
            let mut logs = self.logs.lock().unwrap();
            let key = (user_email.to_string(), auction_id);
            if !should_notify(logs.get(&key).copied(), now, interval) {
                return Ok(false);
            }
            logs.insert(key, now);
            Ok(true)
        }
    }
}
