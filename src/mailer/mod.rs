/// 이메일 발송
/// SMTP 설정이 비어 있으면 로그만 남기는 발송기를 사용한다.
// region:    --- Imports
use crate::config::EmailConfig;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
// endregion: --- Imports

pub mod templates;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("잘못된 이메일 주소: {0}")]
    Address(String),
    #[error("메일 생성 실패: {0}")]
    Build(String),
    #[error("메일 전송 실패: {0}")]
    Transport(String),
}

#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
    pub attachments: Vec<EmailAttachment>,
}

impl OutgoingEmail {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: vec![to.into()],
            subject: subject.into(),
            text: text.into(),
            html: None,
            attachments: Vec::new(),
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_attachment(mut self, attachment: EmailAttachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

// region:    --- SMTP
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.smtp_port);
        if !config.smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ));
        }
        Ok(Self {
            transport: builder.build(),
            from: parse_mailbox(&config.from_address)?,
        })
    }

    fn build_message(&self, email: OutgoingEmail) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(email.subject);
        for to in &email.to {
            builder = builder.to(parse_mailbox(to)?);
        }

        let body = match email.html {
            Some(html) => MultiPart::alternative_plain_html(email.text, html),
            None => MultiPart::alternative().singlepart(SinglePart::plain(email.text)),
        };

        let message = if email.attachments.is_empty() {
            builder.multipart(body)
        } else {
            let mut mixed = MultiPart::mixed().multipart(body);
            for attachment in email.attachments {
                let content_type = attachment_type(&attachment.content_type)?;
                mixed = mixed.singlepart(
                    Attachment::new(attachment.filename).body(attachment.data, content_type),
                );
            }
            builder.multipart(mixed)
        };
        message.map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = self.build_message(email)?;
        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .parse::<Mailbox>()
        .map_err(|_| MailError::Address(address.to_string()))
}

fn attachment_type(raw: &str) -> Result<ContentType, MailError> {
    ContentType::parse(raw)
        .or_else(|_| ContentType::parse("application/octet-stream"))
        .map_err(|e| MailError::Build(e.to_string()))
}
// endregion: --- SMTP

/// 로그 전용 발송기 (로컬 실행용)
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        info!(
            "{:<12} --> [log] to: {:?}, subject: {}, attachments: {}",
            "Mailer",
            email.to,
            email.subject,
            email.attachments.len()
        );
        Ok(())
    }
}

pub fn from_config(config: &EmailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    if config.smtp_host.is_empty() {
        info!("{:<12} --> SMTP 미설정, 로그 발송기 사용", "Mailer");
        return Ok(Arc::new(LogMailer));
    }
    info!("{:<12} --> SMTP 발송기 사용: {}", "Mailer", config.smtp_host);
    Ok(Arc::new(SmtpMailer::new(config)?))
}

/// 발송 실패는 로그만 남긴다
pub async fn dispatch(mailer: &dyn Mailer, email: OutgoingEmail) -> bool {
    let subject = email.subject.clone();
    match mailer.send(email).await {
        Ok(()) => {
            info!("{:<12} --> 발송 완료: {}", "Mailer", subject);
            true
        }
        Err(e) => {
            error!("{:<12} --> 발송 실패: {} ({})", "Mailer", subject, e);
            false
        }
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    /// 발송된 메일을 기록하는 테스트용 발송기
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<OutgoingEmail>>,
        pub fail: bool,
    }

    impl RecordingMailer {
        pub fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn recipients(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .flat_map(|email| email.to.clone())
                .collect()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Transport("connection refused".into()));
            }
            self.sent.lock().unwrap().push(email);
            Ok(())
        }
    }
}
