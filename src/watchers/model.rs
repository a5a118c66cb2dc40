use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 경매 관심 등록 (경매/사용자 당 1건)
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuctionWatcher {
    pub id: i64,
    #[serde(rename = "auction")]
    pub auction_id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
    pub notify_via_email: bool,
}

// 사용자/경매 별 마지막 알림 발송 시각
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct NotificationLog {
    pub id: i64,
    pub user_email: String,
    pub auction_id: i64,
    pub last_notified_at: DateTime<Utc>,
}

/// 알림 대상 후보 (관심 등록 + 사용자 이메일)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WatcherContact {
    pub user_id: i64,
    pub email: String,
    pub notify_via_email: bool,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct WatcherUsername {
    pub username: String,
    pub notify_via_email: bool,
}

#[derive(Debug, Deserialize)]
pub struct WatcherInput {
    pub auction: i64,
    #[serde(default = "default_notify")]
    pub notify_via_email: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct WatcherPatch {
    pub auction: Option<i64>,
    pub notify_via_email: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuctionIdQuery {
    pub auction_id: Option<i64>,
}

fn default_notify() -> bool {
    true
}
