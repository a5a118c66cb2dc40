use super::verification::validate_phone_number;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// 사용자 모델
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_verified: bool,
    #[serde(skip_serializing)]
    pub email_verification_token: Option<Uuid>,
    #[serde(skip_serializing)]
    pub email_verification_expiry: Option<DateTime<Utc>>,
    pub phone_number: String,
    #[serde(skip_serializing)]
    pub phone_verification_code: Option<String>,
    #[serde(skip_serializing)]
    pub phone_verification_expiry: Option<DateTime<Utc>>,
    pub is_phone_verified: bool,
    pub password_reset_required: bool,
    pub date_joined: DateTime<Utc>,
}

// 비밀번호 재설정 토큰
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PasswordResetToken {
    pub id: i64,
    pub user_id: i64,
    pub token: Uuid,
    pub created_at: DateTime<Utc>,
    pub expiry: DateTime<Utc>,
}

/// 신규 사용자 저장 값
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub is_phone_verified: bool,
    pub phone_number: String,
    pub email_verification_token: Option<Uuid>,
    pub email_verification_expiry: Option<DateTime<Utc>>,
    pub phone_verification_code: Option<String>,
    pub phone_verification_expiry: Option<DateTime<Utc>>,
}

// region:    --- Requests
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(must_match(other = "password", message = "비밀번호가 일치하지 않습니다."))]
    pub confirm_password: String,
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPhoneRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordResetConfirm {
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct GoogleLoginRequest {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecaptchaRequest {
    #[serde(rename = "g-recaptcha-response", default)]
    pub response: Option<String>,
}

/// 관리자 사용자 생성
#[derive(Debug, Deserialize, Validate)]
pub struct UserCreateRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 255))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_phone_verified: bool,
    #[serde(default)]
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: Option<String>,
}

/// 관리자 사용자 수정 (PUT/PATCH 공용)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserPatch {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub username: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_verified: Option<bool>,
    pub is_phone_verified: Option<bool>,
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: Option<String>,
}
// endregion: --- Requests

// region:    --- Responses
#[derive(Debug, Serialize)]
pub struct TokenPair {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// 로그인 사용자 요약
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub username: String,
    pub is_superuser: bool,
    pub is_staff: bool,
}

/// 관리자용 사용자 표현
#[derive(Debug, Serialize)]
pub struct UserAdminView {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_verified: bool,
    pub is_phone_verified: bool,
    pub phone_number: String,
}

impl From<User> for UserAdminView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            is_active: user.is_active,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            is_verified: user.is_verified,
            is_phone_verified: user.is_phone_verified,
            phone_number: user.phone_number,
        }
    }
}
// endregion: --- Responses

#[cfg(test)]
mod tests {
    use super::*;

    fn register(password: &str, confirm: &str, phone: &str) -> RegisterRequest {
        RegisterRequest {
            email: "kasia@example.com".into(),
            username: "kasia".into(),
            password: password.into(),
            confirm_password: confirm.into(),
            phone_number: phone.into(),
        }
    }

    #[test]
    fn register_requires_matching_passwords() {
        let errors = register("Sekret123!", "Sekret124!", "+48123456789")
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
        assert!(register("Sekret123!", "Sekret123!", "+48123456789")
            .validate()
            .is_ok());
    }

    #[test]
    fn register_rejects_phone_without_plus() {
        let errors = register("Sekret123!", "Sekret123!", "48123456789")
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("phone_number"));
    }

    #[test]
    fn admin_view_hides_secrets() {
        let json = serde_json::to_value(User {
            id: 1,
            email: "a@example.com".into(),
            username: "a".into(),
            password_hash: Some("hash".into()),
            is_active: true,
            is_staff: false,
            is_superuser: false,
            is_verified: true,
            email_verification_token: Some(Uuid::new_v4()),
            email_verification_expiry: None,
            phone_number: "+48123456789".into(),
            phone_verification_code: Some("123456".into()),
            phone_verification_expiry: None,
            is_phone_verified: true,
            password_reset_required: false,
            date_joined: Utc::now(),
        })
        .unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("phone_verification_code").is_none());
        assert_eq!(json["email"], "a@example.com");
    }
}
