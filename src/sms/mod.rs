/// SMS 발송 (Twilio REST API)
/// 계정 SID 가 비어 있으면 로그만 남기는 발송기를 사용한다.
// region:    --- Imports
use crate::config::SmsConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
// endregion: --- Imports

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("SMS 요청 실패: {0}")]
    Request(String),
    #[error("SMS 거부 status: {status}, body: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError>;
}

pub struct TwilioSms {
    http: Client,
    messages_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
}

impl TwilioSms {
    pub fn new(config: &SmsConfig) -> Result<Self, SmsError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SmsError::Request(e.to_string()))?;
        Ok(Self {
            http,
            messages_url: messages_url(&config.twilio_api_url, &config.twilio_account_sid),
            account_sid: config.twilio_account_sid.clone(),
            auth_token: config.twilio_auth_token.clone(),
            from_number: config.twilio_from_number.clone(),
        })
    }
}

fn messages_url(api_url: &str, account_sid: &str) -> String {
    format!(
        "{}/Accounts/{}/Messages.json",
        api_url.trim_end_matches('/'),
        account_sid
    )
}

#[async_trait]
impl SmsSender for TwilioSms {
    async fn send(&self, to: &str, body: &str) -> Result<(), SmsError> {
        let response = self
            .http
            .post(&self.messages_url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[("To", to), ("From", self.from_number.as_str()), ("Body", body)])
            .send()
            .await
            .map_err(|e| SmsError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmsError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// 로그 전용 발송기 (로컬 실행용)
pub struct LogSms;

#[async_trait]
impl SmsSender for LogSms {
    async fn send(&self, to: &str, _body: &str) -> Result<(), SmsError> {
        info!("{:<12} --> [log] SMS to: {}", "Sms", to);
        Ok(())
    }
}

pub fn from_config(config: &SmsConfig) -> Result<Arc<dyn SmsSender>, SmsError> {
    if config.twilio_account_sid.is_empty() {
        info!("{:<12} --> Twilio 미설정, 로그 발송기 사용", "Sms");
        return Ok(Arc::new(LogSms));
    }
    Ok(Arc::new(TwilioSms::new(config)?))
}

/// 발송 실패는 로그만 남긴다
pub async fn dispatch(sender: &dyn SmsSender, to: &str, body: &str) -> bool {
    match sender.send(to, body).await {
        Ok(()) => {
            info!("{:<12} --> SMS 발송 완료: {}", "Sms", to);
            true
        }
        Err(e) => {
            error!("{:<12} --> SMS 발송 실패: {} ({})", "Sms", to, e);
            false
        }
    }
}

pub fn verification_message(code: &str) -> String {
    format!("Your verification code is {}", code)
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingSms {
        pub sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl SmsSender for RecordingSms {
        async fn send(&self, to: &str, body: &str) -> Result<(), SmsError> {
            self.sent.lock().unwrap().push((to.to_string(), body.to_string()));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingSms;
    use super::*;

    #[test]
    fn messages_url_includes_account() {
        assert_eq!(
            messages_url("https://api.twilio.com/2010-04-01/", "AC123"),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }

    #[tokio::test]
    async fn dispatch_sends_code() {
        let sms = RecordingSms::default();
        assert!(dispatch(&sms, "+48123456789", &verification_message("012345")).await);
        let sent = sms.sent.lock().unwrap();
        assert_eq!(sent[0].1, "Your verification code is 012345");
    }
}
