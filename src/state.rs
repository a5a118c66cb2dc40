/// 핸들러 공유 상태
// region:    --- Imports
use crate::accounts::external::IdentityClient;
use crate::accounts::password::PasswordHasher;
use crate::accounts::token::TokenService;
use crate::auction::events::AuctionEvent;
use crate::config::Config;
use crate::database::DatabaseManager;
use crate::error::AppError;
use crate::mailer::templates::EmailTemplates;
use crate::mailer::{self, MailError, Mailer};
use crate::notification::{BidNotifier, NotificationQueue, PostgresNotificationStore};
use crate::sms::{self, SmsError, SmsSender};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
// endregion: --- Imports

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("템플릿 로드 실패: {0}")]
    Template(#[from] tera::Error),
    #[error(transparent)]
    Mail(#[from] MailError),
    #[error(transparent)]
    Sms(#[from] SmsError),
    #[error(transparent)]
    App(#[from] AppError),
}

#[derive(Clone)]
pub struct AppState {
    pub db_manager: Arc<DatabaseManager>,
    pub config: Arc<Config>,
    pub tokens: Arc<TokenService>,
    pub passwords: Arc<PasswordHasher>,
    pub mailer: Arc<dyn Mailer>,
    pub templates: Arc<EmailTemplates>,
    pub sms: Arc<dyn SmsSender>,
    pub identity: Arc<IdentityClient>,
    pub notifier: NotificationQueue,
}

impl AppState {
    /// 상태와 알림 큐 수신부 생성
    pub fn build(
        config: Config,
        db_manager: DatabaseManager,
    ) -> Result<(Self, mpsc::Receiver<AuctionEvent>), StartupError> {
        let (notifier, receiver) = NotificationQueue::new(config.notification.queue_capacity);
        let state = Self {
            db_manager: Arc::new(db_manager),
            tokens: Arc::new(TokenService::new(&config.security)),
            passwords: Arc::new(PasswordHasher::new()?),
            mailer: mailer::from_config(&config.email)?,
            templates: Arc::new(EmailTemplates::new(&config.server.frontend_url)?),
            sms: sms::from_config(&config.sms)?,
            identity: Arc::new(IdentityClient::new(&config.google, &config.recaptcha)?),
            notifier,
            config: Arc::new(config),
        };
        Ok((state, receiver))
    }

    /// 알림 작업 실행기
    pub fn bid_notifier(&self) -> BidNotifier {
        BidNotifier::new(
            Arc::new(PostgresNotificationStore::new(self.db_manager.get_pool())),
            Arc::clone(&self.mailer),
            Arc::clone(&self.templates),
            self.config.notification.throttle_secs,
        )
    }

    pub fn page_size(&self) -> i64 {
        self.config.pagination.page_size
    }
}
