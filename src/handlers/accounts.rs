/// 회원 인증 핸들러
// region:    --- Imports
use super::extract::{AppJson, AppPath};
use super::message;
use crate::accounts::commands::{self, EmailVerification};
use crate::accounts::extract::{AuthUser, StaffUser};
use crate::accounts::model::{
    CredentialsRequest, EmailRequest, GoogleLoginRequest, LoginRequest, LogoutRequest,
    PasswordResetConfirm, RecaptchaRequest, RefreshRequest, RegisterRequest, TokenPair, UserInfo,
    VerifyPhoneRequest,
};
use crate::error::AppResult;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};
use validator::Validate;
// endregion: --- Imports

// region:    --- Registration
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    commands::register(&state, req).await?;
    Ok((
        StatusCode::CREATED,
        message("가입이 완료되었습니다. 이메일을 확인해 계정을 인증해 주세요."),
    ))
}

pub async fn verify_email(State(state): State<AppState>, AppPath(token): AppPath<String>) -> AppResult<Json<Value>> {
    let body = match commands::verify_email(&state, &token).await? {
        EmailVerification::AlreadyVerified => message("이미 인증된 사용자입니다."),
        EmailVerification::Verified { email } => {
            message(&format!("{} 인증이 완료되었습니다.", email))
        }
    };
    Ok(body)
}

pub async fn resend_verification_email(
    State(state): State<AppState>,
    AppJson(req): AppJson<EmailRequest>,
) -> AppResult<Json<Value>> {
    req.validate()?;
    commands::resend_verification_email(&state, &req.email).await?;
    Ok(message("인증 메일을 다시 보냈습니다."))
}

pub async fn verify_phone(
    State(state): State<AppState>,
    AppJson(req): AppJson<VerifyPhoneRequest>,
) -> AppResult<Json<Value>> {
    commands::verify_phone(&state, req).await?;
    Ok(message("전화번호 인증이 완료되었습니다."))
}

pub async fn resend_phone_code(
    State(state): State<AppState>,
    AppJson(req): AppJson<CredentialsRequest>,
) -> AppResult<Json<Value>> {
    commands::resend_phone_code(&state, req).await?;
    Ok(message("인증 코드를 다시 보냈습니다."))
}

pub async fn check_email_verification(
    State(state): State<AppState>,
    AppJson(req): AppJson<CredentialsRequest>,
) -> AppResult<Json<Value>> {
    let is_verified = commands::check_email_verification(&state, req).await?;
    Ok(Json(json!({ "is_verified": is_verified })))
}
// endregion: --- Registration

// region:    --- Session
pub async fn login(State(state): State<AppState>, AppJson(req): AppJson<LoginRequest>) -> AppResult<Json<TokenPair>> {
    Ok(Json(commands::login(&state, req).await?))
}

pub async fn obtain_token(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> AppResult<Json<TokenPair>> {
    Ok(Json(commands::obtain_token(&state, req).await?))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    AppJson(req): AppJson<RefreshRequest>,
) -> AppResult<Json<Value>> {
    let access = commands::refresh(&state, &req.refresh).await?;
    Ok(Json(json!({ "access": access })))
}

pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(req): AppJson<LogoutRequest>,
) -> AppResult<Json<Value>> {
    commands::logout(&state, &user, req.refresh_token.as_deref()).await?;
    Ok(message("로그아웃되었습니다."))
}

pub async fn current_user(AuthUser(user): AuthUser) -> Json<UserInfo> {
    Json(UserInfo {
        username: user.username,
        is_superuser: user.is_superuser,
        is_staff: user.is_staff,
    })
}
// endregion: --- Session

// region:    --- Password Reset
pub async fn request_password_reset(
    State(state): State<AppState>,
    AppJson(req): AppJson<EmailRequest>,
) -> AppResult<Json<Value>> {
    req.validate()?;
    commands::request_password_reset(&state, &req.email).await?;
    Ok(message("비밀번호 재설정 메일을 보냈습니다."))
}

pub async fn confirm_password_reset(
    State(state): State<AppState>,
    AppPath(token): AppPath<String>,
    AppJson(req): AppJson<PasswordResetConfirm>,
) -> AppResult<Json<Value>> {
    req.validate()?;
    commands::confirm_password_reset(&state, &token, &req.new_password).await?;
    Ok(message("비밀번호가 재설정되었습니다."))
}

pub async fn enforce_password_reset(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppJson(req): AppJson<EmailRequest>,
) -> AppResult<Json<Value>> {
    req.validate()?;
    commands::enforce_password_reset(&state, &req.email).await?;
    Ok(message("비밀번호 재설정이 요구되었습니다."))
}
// endregion: --- Password Reset

// region:    --- External
pub async fn google_login(
    State(state): State<AppState>,
    AppJson(req): AppJson<GoogleLoginRequest>,
) -> AppResult<Json<TokenPair>> {
    Ok(Json(commands::google_login(&state, req.token.as_deref()).await?))
}

pub async fn verify_recaptcha(
    State(state): State<AppState>,
    AppJson(req): AppJson<RecaptchaRequest>,
) -> AppResult<Json<Value>> {
    commands::verify_recaptcha(&state, req.response.as_deref()).await?;
    Ok(message("reCAPTCHA 검증 완료"))
}
// endregion: --- External
