/// 외부 인증 서비스 연동 (Google 토큰 정보, reCAPTCHA)
// region:    --- Imports
use crate::config::{GoogleConfig, RecaptchaConfig};
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};
// endregion: --- Imports

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Google 토큰 정보 응답 중 사용하는 필드
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    pub email: Option<String>,
    pub name: Option<String>,
    pub family_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecaptchaResponse {
    #[serde(default)]
    success: bool,
}

pub struct IdentityClient {
    http: Client,
    tokeninfo_url: String,
    recaptcha_url: String,
    recaptcha_secret: String,
}

impl IdentityClient {
    pub fn new(google: &GoogleConfig, recaptcha: &RecaptchaConfig) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("HTTP 클라이언트 생성 실패: {}", e)))?;
        Ok(Self {
            http,
            tokeninfo_url: google.tokeninfo_url.clone(),
            recaptcha_url: recaptcha.verify_url.clone(),
            recaptcha_secret: recaptcha.secret_key.clone(),
        })
    }

    /// Google ID 토큰 검증 후 프로필 반환
    pub async fn google_profile(&self, id_token: &str) -> AppResult<GoogleProfile> {
        let response = self
            .http
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| {
                warn!("{:<12} --> Google 토큰 확인 요청 실패: {}", "Identity", e);
                AppError::bad_request("유효하지 않은 토큰입니다.", "INVALID_TOKEN")
            })?;

        if !response.status().is_success() {
            warn!(
                "{:<12} --> Google 토큰 거부 status: {}",
                "Identity",
                response.status()
            );
            return Err(AppError::bad_request("유효하지 않은 토큰입니다.", "INVALID_TOKEN"));
        }

        response.json::<GoogleProfile>().await.map_err(|e| {
            warn!("{:<12} --> Google 응답 파싱 실패: {}", "Identity", e);
            AppError::bad_request("유효하지 않은 토큰입니다.", "INVALID_TOKEN")
        })
    }

    /// reCAPTCHA 응답 검증
    pub async fn verify_recaptcha(&self, captcha_response: &str) -> AppResult<bool> {
        let response = self
            .http
            .post(&self.recaptcha_url)
            .form(&[
                ("secret", self.recaptcha_secret.as_str()),
                ("response", captcha_response),
            ])
            .send()
            .await
            .map_err(|e| AppError::internal(format!("reCAPTCHA 요청 실패: {}", e)))?;

        let body = response
            .json::<RecaptchaResponse>()
            .await
            .map_err(|e| AppError::internal(format!("reCAPTCHA 응답 파싱 실패: {}", e)))?;

        info!("{:<12} --> reCAPTCHA 검증 결과: {}", "Identity", body.success);
        Ok(body.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_profile_tolerates_missing_names() {
        let profile: GoogleProfile =
            serde_json::from_str(r#"{"email": "jan@example.com", "aud": "x"}"#).unwrap();
        assert_eq!(profile.email.as_deref(), Some("jan@example.com"));
        assert!(profile.name.is_none());
    }

    #[test]
    fn recaptcha_failure_without_success_field() {
        let body: RecaptchaResponse =
            serde_json::from_str(r#"{"error-codes": ["invalid-input-response"]}"#).unwrap();
        assert!(!body.success);
    }
}
