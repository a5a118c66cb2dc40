/// 입찰 알림 파이프라인
/// 1. 입찰 시 이벤트를 큐에 등록
/// 2. 워커가 지연 후 알림 작업 실행
/// 3. 최근 발송 기록이 없는 관심 사용자에게만 메일 발송
// region:    --- Imports
use crate::auction::events::AuctionEvent;
use crate::bidding::model::Auction;
use crate::mailer::templates::EmailTemplates;
use crate::mailer::{self, Mailer, OutgoingEmail};
use crate::watchers::model::WatcherContact;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
// endregion: --- Imports

pub mod store;

pub use store::{NotificationStore, PostgresNotificationStore};

// region:    --- Queue
/// 알림 이벤트 큐 (bounded)
#[derive(Clone)]
pub struct NotificationQueue {
    sender: mpsc::Sender<AuctionEvent>,
}

impl NotificationQueue {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<AuctionEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// 큐가 가득 찼거나 닫힌 경우 로그만 남기고 입찰 처리는 계속한다
    pub fn schedule(&self, event: AuctionEvent) {
        let auction_id = event.auction_id();
        match self.sender.try_send(event) {
            Ok(()) => debug!("{:<12} --> 알림 예약 auction: {}", "Notify", auction_id),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("{:<12} --> 알림 큐 가득 참, 건너뜀 auction: {}", "Notify", auction_id)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!("{:<12} --> 알림 큐 닫힘 auction: {}", "Notify", auction_id)
            }
        }
    }
}
// endregion: --- Queue

// region:    --- Notifier
/// 마지막 발송 후 간격이 지났으면 발송 대상
pub fn should_notify(last: Option<DateTime<Utc>>, now: DateTime<Utc>, interval: Duration) -> bool {
    match last {
        None => true,
        Some(last) => now - last > interval,
    }
}

/// 이메일 수신 동의했고 최근 입찰자가 아닌 관심 사용자
pub fn select_recipients(watchers: Vec<WatcherContact>, latest_bidder: i64) -> Vec<WatcherContact> {
    watchers
        .into_iter()
        .filter(|w| w.notify_via_email && w.user_id != latest_bidder)
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NotificationReport {
    pub sent: usize,
    pub throttled: usize,
    pub failed: usize,
}

pub struct BidNotifier {
    store: Arc<dyn NotificationStore>,
    mailer: Arc<dyn Mailer>,
    templates: Arc<EmailTemplates>,
    interval: Duration,
}

impl BidNotifier {
    pub fn new(
        store: Arc<dyn NotificationStore>,
        mailer: Arc<dyn Mailer>,
        templates: Arc<EmailTemplates>,
        throttle_secs: i64,
    ) -> Self {
        Self {
            store,
            mailer,
            templates,
            interval: Duration::seconds(throttle_secs),
        }
    }

    /// 입찰 알림 작업
    pub async fn run_bid_notification(&self, auction_id: i64) -> Result<NotificationReport, sqlx::Error> {
        let mut report = NotificationReport::default();

        let Some(auction) = self.store.auction(auction_id).await? else {
            warn!("{:<12} --> 경매 없음 auction: {}", "Notify", auction_id);
            return Ok(report);
        };
        let Some(latest_bidder) = self.store.latest_bidder(auction_id).await? else {
            info!("{:<12} --> 입찰 없음 auction: {}", "Notify", auction_id);
            return Ok(report);
        };

        let rendered = match self.templates.new_bid(&auction) {
            Ok(rendered) => rendered,
            Err(e) => {
                error!("{:<12} --> 알림 본문 생성 실패: {}", "Notify", e);
                return Ok(report);
            }
        };

        let recipients = select_recipients(self.store.watchers(auction_id).await?, latest_bidder);
        for watcher in recipients {
            let now = Utc::now();
            if !self
                .store
                .try_claim(&watcher.email, auction_id, now, self.interval)
                .await?
            {
                debug!(
                    "{:<12} --> 최근 발송 이력으로 건너뜀: {}",
                    "Notify", watcher.email
                );
                report.throttled += 1;
                continue;
            }

            let email = OutgoingEmail::new(&watcher.email, &rendered.subject, &rendered.text)
                .with_html(&rendered.html);
            if mailer::dispatch(self.mailer.as_ref(), email).await {
                report.sent += 1;
            } else {
                report.failed += 1;
            }
        }

        info!(
            "{:<12} --> 알림 완료 auction: {}, sent: {}, throttled: {}, failed: {}",
            "Notify", auction_id, report.sent, report.throttled, report.failed
        );
        Ok(report)
    }

    async fn run_logged(&self, auction_id: i64) {
        if let Err(e) = self.run_bid_notification(auction_id).await {
            error!(
                "{:<12} --> 알림 작업 실패 auction: {}, error: {:?}",
                "Notify", auction_id, e
            );
        }
    }
}

/// 로그용 이벤트 요약
pub fn describe(event: &AuctionEvent) -> String {
    match event {
        AuctionEvent::BidPlaced {
            auction_id,
            bidder_id,
            amount,
            ..
        } => format!("auction {} bid {} by {}", auction_id, amount, bidder_id),
    }
}
// endregion: --- Notifier

// region:    --- Worker
pub struct NotificationWorker {
    receiver: mpsc::Receiver<AuctionEvent>,
    notifier: Arc<BidNotifier>,
    delay: std::time::Duration,
}

impl NotificationWorker {
    pub fn new(
        receiver: mpsc::Receiver<AuctionEvent>,
        notifier: Arc<BidNotifier>,
        delay: std::time::Duration,
    ) -> Self {
        Self {
            receiver,
            notifier,
            delay,
        }
    }

    /// 이벤트마다 지연 작업을 띄운다
    pub fn start(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("{:<12} --> 알림 워커 시작 delay: {:?}", "Notify", self.delay);
            while let Some(event) = self.receiver.recv().await {
                debug!("{:<12} --> 이벤트 수신: {}", "Notify", describe(&event));
                let notifier = Arc::clone(&self.notifier);
                let delay = self.delay;
                let auction_id = event.auction_id();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    notifier.run_logged(auction_id).await;
                });
            }
            info!("{:<12} --> 알림 큐 종료, 워커 중지", "Notify");
        })
    }
}
// endregion: --- Worker

#[cfg(test)]
mod tests {
    use super::store::testing::InMemoryNotificationStore;
    use super::*;
    use crate::mailer::testing::RecordingMailer;
    use rust_decimal_macros::dec;

    fn auction(id: i64) -> Auction {
        Auction {
            id,
            title: "Nokturn".into(),
            artist: "Piotr".into(),
            year: 2018,
            medium: "grafika".into(),
            dimensions: "20x30".into(),
            description: String::new(),
            image: "default.jpg".into(),
            current_bid: dec!(120.00),
            end_date: Utc::now() + Duration::hours(1),
            buy_now_price: None,
        }
    }

    fn contact(user_id: i64, email: &str, notify: bool) -> WatcherContact {
        WatcherContact {
            user_id,
            email: email.into(),
            notify_via_email: notify,
        }
    }

    fn notifier(store: Arc<InMemoryNotificationStore>, mailer: Arc<RecordingMailer>) -> BidNotifier {
        BidNotifier::new(
            store,
            mailer,
            Arc::new(EmailTemplates::new("http://localhost:3000").unwrap()),
            300,
        )
    }

    #[test]
    fn should_notify_respects_interval() {
        let now = Utc::now();
        let interval = Duration::minutes(5);
        assert!(should_notify(None, now, interval));
        assert!(!should_notify(Some(now - Duration::minutes(4)), now, interval));
        assert!(!should_notify(Some(now - Duration::minutes(5)), now, interval));
        assert!(should_notify(Some(now - Duration::minutes(6)), now, interval));
    }

    #[test]
    fn latest_bidder_and_opted_out_are_skipped() {
        let recipients = select_recipients(
            vec![
                contact(1, "bidder@example.com", true),
                contact(2, "quiet@example.com", false),
                contact(3, "fan@example.com", true),
            ],
            1,
        );
        assert_eq!(recipients.len(), 1);
        assert_eq!(recipients[0].email, "fan@example.com");
    }

    #[tokio::test]
    async fn watcher_is_not_notified_twice_within_interval() {
        let store = Arc::new(InMemoryNotificationStore::default());
        store.add_auction(auction(10), Some(1));
        store.add_watcher(10, contact(1, "bidder@example.com", true));
        store.add_watcher(10, contact(2, "fan@example.com", true));
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = notifier(Arc::clone(&store), Arc::clone(&mailer));

        let first = notifier.run_bid_notification(10).await.unwrap();
        assert_eq!(first.sent, 1);

        let second = notifier.run_bid_notification(10).await.unwrap();
        assert_eq!(second.sent, 0);
        assert_eq!(second.throttled, 1);

        assert_eq!(mailer.recipients(), vec!["fan@example.com".to_string()]);
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent[0].subject, "New Bid on Auction: Nokturn");
    }

    #[tokio::test]
    async fn stale_log_allows_new_notification() {
        let store = Arc::new(InMemoryNotificationStore::default());
        store.add_auction(auction(11), Some(1));
        store.add_watcher(11, contact(2, "fan@example.com", true));
        store.set_last_notified("fan@example.com", 11, Utc::now() - Duration::minutes(6));
        let mailer = Arc::new(RecordingMailer::default());

        let report = notifier(store, Arc::clone(&mailer))
            .run_bid_notification(11)
            .await
            .unwrap();
        assert_eq!(report.sent, 1);
    }

    #[tokio::test]
    async fn missing_auction_or_bids_is_a_noop() {
        let store = Arc::new(InMemoryNotificationStore::default());
        store.add_auction(auction(12), None);
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = notifier(store, Arc::clone(&mailer));

        assert_eq!(
            notifier.run_bid_notification(99).await.unwrap(),
            NotificationReport::default()
        );
        assert_eq!(
            notifier.run_bid_notification(12).await.unwrap(),
            NotificationReport::default()
        );
        assert!(mailer.recipients().is_empty());
    }

    #[tokio::test]
    async fn mail_failure_is_counted_not_raised() {
        let store = Arc::new(InMemoryNotificationStore::default());
        store.add_auction(auction(13), Some(1));
        store.add_watcher(13, contact(2, "fan@example.com", true));
        let mailer = Arc::new(RecordingMailer::failing());

        let report = notifier(store, mailer).run_bid_notification(13).await.unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.sent, 0);
    }

    #[tokio::test]
    async fn worker_runs_job_after_delay() {
        let store = Arc::new(InMemoryNotificationStore::default());
        store.add_auction(auction(14), Some(1));
        store.add_watcher(14, contact(2, "fan@example.com", true));
        let mailer = Arc::new(RecordingMailer::default());

        let (queue, receiver) = NotificationQueue::new(8);
        let worker = NotificationWorker::new(
            receiver,
            Arc::new(notifier(store, Arc::clone(&mailer))),
            std::time::Duration::from_millis(10),
        );
        let handle = worker.start();

        queue.schedule(AuctionEvent::BidPlaced {
            auction_id: 14,
            bidder_id: 1,
            amount: dec!(130.00),
            timestamp: Utc::now(),
        });

        for _ in 0..100 {
            if !mailer.recipients().is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(mailer.recipients(), vec!["fan@example.com".to_string()]);

        drop(queue);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn full_queue_does_not_fail() {
        let (queue, _receiver) = NotificationQueue::new(1);
        let event = AuctionEvent::BidPlaced {
            auction_id: 1,
            bidder_id: 1,
            amount: dec!(1.00),
            timestamp: Utc::now(),
        };
        queue.schedule(event.clone());
        queue.schedule(event);
    }
}
