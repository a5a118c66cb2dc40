/// 회원 관련 커맨드 처리
/// 1. 가입 및 인증 (이메일, 전화)
/// 2. 로그인, 토큰 갱신, 로그아웃
/// 3. 비밀번호 재설정
/// 4. 외부 인증 (Google, reCAPTCHA)
/// 5. 관리자 사용자 관리
// region:    --- Imports
use super::model::{
    CredentialsRequest, LoginRequest, NewUser, RegisterRequest, TokenPair, User, UserCreateRequest,
    UserPatch, VerifyPhoneRequest,
};
use super::store;
use super::token::TokenType;
use super::verification::{self, PhoneCodeCheck};
use crate::error::{AppError, AppResult};
use crate::mailer::{self, OutgoingEmail};
use crate::pagination::{Page, PageQuery, PageWindow};
use crate::sms;
use crate::state::AppState;
use chrono::{Duration, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;
// endregion: --- Imports

// region:    --- Registration
/// 가입 후 인증 메일과 SMS 코드 발송
pub async fn register(state: &AppState, req: RegisterRequest) -> AppResult<User> {
    req.validate()?;
    let now = Utc::now();
    let security = &state.config.security;

    let new_user = NewUser {
        email: verification::normalize_email(&req.email),
        username: req.username.trim().to_string(),
        password_hash: Some(state.passwords.hash(&req.password)?),
        is_active: true,
        is_verified: false,
        is_phone_verified: false,
        phone_number: req.phone_number.clone(),
        email_verification_token: Some(Uuid::new_v4()),
        email_verification_expiry: Some(now + Duration::hours(security.email_verification_ttl_hours)),
        phone_verification_code: Some(verification::generate_phone_code()),
        phone_verification_expiry: Some(
            now + Duration::minutes(security.phone_verification_ttl_minutes),
        ),
    };
    let user = store::insert(&state.db_manager, &new_user).await?;
    info!("{:<12} --> 가입 완료 user: {}", "Identity", user.id);

    send_verification_email(state, &user);
    send_phone_code(state, &user);
    Ok(user)
}

/// 인증 메일 발송 (백그라운드)
fn send_verification_email(state: &AppState, user: &User) {
    let Some(token) = user.email_verification_token else {
        return;
    };
    let rendered = match state
        .templates
        .verify_email(&user.username, &user.email, &token.to_string())
    {
        Ok(rendered) => rendered,
        Err(e) => {
            error!("{:<12} --> 인증 메일 본문 생성 실패: {}", "Identity", e);
            return;
        }
    };
    let email = OutgoingEmail::new(&user.email, rendered.subject, rendered.text).with_html(rendered.html);
    let mailer = state.mailer.clone();
    tokio::spawn(async move {
        mailer::dispatch(mailer.as_ref(), email).await;
    });
}

/// 저장된 전화 인증 코드 발송 (백그라운드)
fn send_phone_code(state: &AppState, user: &User) {
    let Some(code) = user.phone_verification_code.clone() else {
        return;
    };
    if user.phone_number.is_empty() || user.is_phone_verified {
        return;
    }
    let sender = state.sms.clone();
    let to = user.phone_number.clone();
    tokio::spawn(async move {
        sms::dispatch(sender.as_ref(), &to, &sms::verification_message(&code)).await;
    });
}

pub enum EmailVerification {
    AlreadyVerified,
    Verified { email: String },
}

/// 이메일 인증 링크 처리
pub async fn verify_email(state: &AppState, token: &str) -> AppResult<EmailVerification> {
    let token = Uuid::parse_str(token.trim_end_matches('/'))
        .map_err(|_| AppError::bad_request("유효하지 않은 토큰입니다.", "INVALID_TOKEN"))?;
    let user = store::find_by_email_token(&state.db_manager, token)
        .await?
        .ok_or_else(|| AppError::bad_request("유효하지 않은 토큰입니다.", "INVALID_TOKEN"))?;

    if user.is_verified {
        return Ok(EmailVerification::AlreadyVerified);
    }
    if verification::is_expired(user.email_verification_expiry, Utc::now()) {
        return Err(AppError::bad_request(
            "인증 토큰이 만료되었습니다.",
            "TOKEN_EXPIRED",
        ));
    }

    store::mark_email_verified(&state.db_manager, user.id).await?;
    info!("{:<12} --> 이메일 인증 완료 user: {}", "Identity", user.id);
    Ok(EmailVerification::Verified { email: user.email })
}

/// 만료된 경우에만 새 인증 토큰 발급 후 재발송
pub async fn resend_verification_email(state: &AppState, email: &str) -> AppResult<()> {
    let user = store::find_by_email(&state.db_manager, &verification::normalize_email(email))
        .await?
        .ok_or_else(|| AppError::not_found("사용자가 존재하지 않습니다."))?;

    if user.is_verified {
        return Err(AppError::bad_request(
            "이미 인증된 사용자입니다.",
            "ALREADY_VERIFIED",
        ));
    }
    let now = Utc::now();
    if !verification::is_expired(user.email_verification_expiry, now) {
        return Err(AppError::bad_request(
            "인증 토큰이 아직 만료되지 않았습니다.",
            "TOKEN_NOT_EXPIRED",
        ));
    }

    let token = Uuid::new_v4();
    let expiry = now + Duration::hours(state.config.security.email_verification_ttl_hours);
    store::set_email_token(&state.db_manager, user.id, token, expiry).await?;

    let user = User {
        email_verification_token: Some(token),
        email_verification_expiry: Some(expiry),
        ..user
    };
    send_verification_email(state, &user);
    Ok(())
}

/// 이메일/비밀번호 확인 (불일치는 모두 401)
async fn authenticate_credentials(state: &AppState, email: &str, password: &str) -> AppResult<User> {
    let user = store::find_by_email(&state.db_manager, &verification::normalize_email(email))
        .await?
        .filter(|user| state.passwords.verify(password, user.password_hash.as_deref()))
        .ok_or_else(|| AppError::unauthorized("사용자가 존재하지 않습니다."))?;
    Ok(user)
}

/// 전화 인증 코드 확인
pub async fn verify_phone(state: &AppState, req: VerifyPhoneRequest) -> AppResult<()> {
    let user = authenticate_credentials(state, &req.email, &req.password).await?;
    ensure_phone_pending(&user)?;

    match verification::check_phone_code(
        req.code.as_deref(),
        user.phone_verification_code.as_deref(),
        user.phone_verification_expiry,
        Utc::now(),
    ) {
        PhoneCodeCheck::Verified => {
            store::mark_phone_verified(&state.db_manager, user.id).await?;
            info!("{:<12} --> 전화 인증 완료 user: {}", "Identity", user.id);
            Ok(())
        }
        PhoneCodeCheck::Missing => Err(AppError::bad_request(
            "인증 코드가 필요합니다.",
            "CODE_REQUIRED",
        )),
        PhoneCodeCheck::Expired => Err(AppError::bad_request(
            "인증 코드가 만료되었습니다.",
            "CODE_EXPIRED",
        )),
        PhoneCodeCheck::Mismatch => Err(AppError::bad_request(
            "인증 코드가 올바르지 않습니다.",
            "INVALID_CODE",
        )),
    }
}

/// 새 전화 인증 코드 발급 및 재발송
pub async fn resend_phone_code(state: &AppState, req: CredentialsRequest) -> AppResult<()> {
    let user = authenticate_credentials(state, &req.email, &req.password).await?;
    ensure_phone_pending(&user)?;

    let code = verification::generate_phone_code();
    let expiry = Utc::now() + Duration::minutes(state.config.security.phone_verification_ttl_minutes);
    store::set_phone_code(&state.db_manager, user.id, &code, expiry).await?;

    let user = User {
        phone_verification_code: Some(code),
        phone_verification_expiry: Some(expiry),
        ..user
    };
    send_phone_code(state, &user);
    Ok(())
}

fn ensure_phone_pending(user: &User) -> AppResult<()> {
    if user.phone_number.is_empty() {
        return Err(AppError::bad_request(
            "전화번호가 등록되지 않았습니다.",
            "NO_PHONE",
        ));
    }
    if user.is_phone_verified {
        return Err(AppError::bad_request(
            "이미 인증된 사용자입니다.",
            "ALREADY_VERIFIED",
        ));
    }
    Ok(())
}

pub async fn check_email_verification(state: &AppState, req: CredentialsRequest) -> AppResult<bool> {
    let user = authenticate_credentials(state, &req.email, &req.password).await?;
    Ok(user.is_verified)
}
// endregion: --- Registration

// region:    --- Session
/// 로그인 가능 여부 검사 후 토큰 발급
pub async fn login(state: &AppState, req: LoginRequest) -> AppResult<TokenPair> {
    req.validate()?;
    let user = store::find_by_email(&state.db_manager, &verification::normalize_email(&req.email))
        .await?
        .ok_or_else(|| AppError::unauthorized("계정이 존재하지 않습니다."))?;

    ensure_can_login(&user)?;
    if !state.passwords.verify(&req.password, user.password_hash.as_deref()) {
        warn!("{:<12} --> 비밀번호 불일치 user: {}", "Identity", user.id);
        return Err(AppError::unauthorized("비밀번호가 올바르지 않습니다."));
    }

    info!("{:<12} --> 로그인 user: {}", "Identity", user.id);
    issue_pair(state, user.id)
}

/// 로그인 차단 사유 (비활성, 이메일 미인증, 전화 미인증, 비밀번호 재설정 필요)
pub fn ensure_can_login(user: &User) -> AppResult<()> {
    if !user.is_active {
        return Err(AppError::unauthorized("비활성화된 계정입니다."));
    }
    if !user.is_verified {
        return Err(AppError::unauthorized("이메일 인증이 필요합니다."));
    }
    if !user.is_phone_verified {
        return Err(AppError::unauthorized("전화번호 인증이 필요합니다."));
    }
    if user.password_reset_required {
        return Err(AppError::unauthorized("비밀번호를 재설정해야 합니다."));
    }
    Ok(())
}

/// 토큰 발급 (로그인과 같은 검사, 실패 사유는 구분하지 않음)
pub async fn obtain_token(state: &AppState, req: LoginRequest) -> AppResult<TokenPair> {
    login(state, req).await.map_err(|e| match e {
        AppError::Unauthorized(_) => {
            AppError::unauthorized("이메일 또는 비밀번호가 올바르지 않습니다.")
        }
        other => other,
    })
}

fn issue_pair(state: &AppState, user_id: i64) -> AppResult<TokenPair> {
    let (access_token, refresh_token) = state.tokens.issue_pair(user_id)?;
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// refresh 토큰으로 새 access 토큰 발급
pub async fn refresh(state: &AppState, refresh_token: &str) -> AppResult<String> {
    let claims = state.tokens.decode(refresh_token, TokenType::Refresh)?;
    if store::is_blacklisted(&state.db_manager, claims.jti()?).await? {
        return Err(AppError::unauthorized("로그아웃된 토큰입니다."));
    }
    state.tokens.issue(claims.user_id()?, TokenType::Access)
}

/// refresh 토큰 블랙리스트 등록
pub async fn logout(state: &AppState, user: &User, refresh_token: Option<&str>) -> AppResult<()> {
    let Some(token) = refresh_token.filter(|t| !t.is_empty()) else {
        return Ok(());
    };
    let claims = state.tokens.decode(token, TokenType::Refresh)?;
    if claims.user_id()? != user.id {
        return Err(AppError::unauthorized("유효하지 않은 토큰입니다."));
    }
    store::blacklist_token(&state.db_manager, claims.jti()?, user.id, claims.expires_at()).await?;
    info!("{:<12} --> 로그아웃 user: {}", "Identity", user.id);
    Ok(())
}
// endregion: --- Session

// region:    --- Password Reset
/// 재설정 토큰 발급 (기존 토큰 대체) 후 링크 메일 발송
pub async fn request_password_reset(state: &AppState, email: &str) -> AppResult<()> {
    let user = store::find_by_email(&state.db_manager, &verification::normalize_email(email))
        .await?
        .ok_or_else(|| AppError::not_found("이메일을 찾을 수 없습니다."))?;

    let token = Uuid::new_v4();
    let expiry = Utc::now() + Duration::minutes(state.config.security.password_reset_ttl_minutes);
    store::replace_reset_token(&state.db_manager, user.id, token, expiry).await?;

    match state
        .templates
        .reset_password(&user.username, &user.email, &token.to_string())
    {
        Ok(rendered) => {
            let email = OutgoingEmail::new(&user.email, rendered.subject, rendered.text)
                .with_html(rendered.html);
            mailer::dispatch(state.mailer.as_ref(), email).await;
        }
        Err(e) => error!("{:<12} --> 재설정 메일 본문 생성 실패: {}", "Identity", e),
    }
    info!("{:<12} --> 비밀번호 재설정 요청 user: {}", "Identity", user.id);
    Ok(())
}

pub async fn confirm_password_reset(state: &AppState, token: &str, new_password: &str) -> AppResult<()> {
    let invalid = || AppError::bad_request("유효하지 않은 토큰입니다.", "INVALID_TOKEN");
    let token = Uuid::parse_str(token.trim_end_matches('/')).map_err(|_| invalid())?;
    let reset = store::find_reset_token(&state.db_manager, token)
        .await?
        .ok_or_else(invalid)?;

    if verification::is_expired(Some(reset.expiry), Utc::now()) {
        return Err(AppError::bad_request("토큰이 만료되었습니다.", "TOKEN_EXPIRED"));
    }

    let hash = state.passwords.hash(new_password)?;
    store::complete_password_reset(&state.db_manager, reset.id, reset.user_id, hash).await?;
    info!("{:<12} --> 비밀번호 재설정 완료 user: {}", "Identity", reset.user_id);
    Ok(())
}

pub async fn enforce_password_reset(state: &AppState, email: &str) -> AppResult<()> {
    if !store::require_password_reset(&state.db_manager, &verification::normalize_email(email)).await? {
        return Err(AppError::not_found("사용자가 존재하지 않습니다."));
    }
    info!("{:<12} --> 비밀번호 재설정 강제: {}", "Identity", email);
    Ok(())
}
// endregion: --- Password Reset

// region:    --- External
/// Google ID 토큰으로 로그인 (없으면 인증된 사용자로 생성)
pub async fn google_login(state: &AppState, id_token: Option<&str>) -> AppResult<TokenPair> {
    let id_token = id_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::bad_request("토큰이 필요합니다.", "TOKEN_REQUIRED"))?;
    let profile = state.identity.google_profile(id_token).await?;
    let email = profile
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .map(verification::normalize_email)
        .ok_or_else(|| AppError::bad_request("이메일이 필요합니다.", "EMAIL_REQUIRED"))?;

    let user = match store::find_by_email(&state.db_manager, &email).await? {
        Some(user) => user,
        None => {
            let base = verification::google_username(profile.name.as_deref(), profile.family_name.as_deref());
            let username = unique_username(state, &base).await?;
            let user = store::insert(
                &state.db_manager,
                &NewUser {
                    email,
                    username,
                    password_hash: None,
                    is_active: true,
                    is_verified: true,
                    is_phone_verified: false,
                    phone_number: String::new(),
                    email_verification_token: None,
                    email_verification_expiry: None,
                    phone_verification_code: None,
                    phone_verification_expiry: None,
                },
            )
            .await?;
            info!("{:<12} --> Google 사용자 생성 user: {}", "Identity", user.id);
            user
        }
    };

    issue_pair(state, user.id)
}

async fn unique_username(state: &AppState, base: &str) -> AppResult<String> {
    if !store::username_exists(&state.db_manager, base).await? {
        return Ok(base.to_string());
    }
    for suffix in 1..100 {
        let candidate = format!("{}_{}", base, suffix);
        if !store::username_exists(&state.db_manager, &candidate).await? {
            return Ok(candidate);
        }
    }
    Ok(format!("{}_{}", base, Uuid::new_v4().simple()))
}

pub async fn verify_recaptcha(state: &AppState, response: Option<&str>) -> AppResult<()> {
    let response = response
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::bad_request("reCAPTCHA 응답이 없습니다.", "INVALID_RECAPTCHA"))?;
    if !state.identity.verify_recaptcha(response).await? {
        return Err(AppError::bad_request("reCAPTCHA 검증 실패", "RECAPTCHA_FAILED"));
    }
    Ok(())
}
// endregion: --- External

// region:    --- Admin
pub async fn list_users(state: &AppState, page: PageQuery, path: &str) -> AppResult<Page<User>> {
    let count = store::count(&state.db_manager).await?;
    let window = PageWindow::resolve(&page, count, state.page_size())?;
    let users = store::list(&state.db_manager, window.limit, window.offset).await?;
    Ok(Page::new(window, count, users, path))
}

pub async fn get_user(state: &AppState, user_id: i64) -> AppResult<User> {
    store::find_by_id(&state.db_manager, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("사용자가 존재하지 않습니다."))
}

/// 관리자 사용자 생성 (미인증 항목은 인증 메일/SMS 발송)
pub async fn create_user(state: &AppState, req: UserCreateRequest) -> AppResult<User> {
    req.validate()?;
    let now = Utc::now();
    let security = &state.config.security;
    let phone_number = req.phone_number.unwrap_or_default();
    let needs_phone_code = !phone_number.is_empty() && !req.is_phone_verified;

    let user = store::insert(
        &state.db_manager,
        &NewUser {
            email: verification::normalize_email(&req.email),
            username: req.username.trim().to_string(),
            password_hash: Some(state.passwords.hash(&req.password)?),
            is_active: true,
            is_verified: req.is_verified,
            is_phone_verified: req.is_phone_verified,
            phone_number,
            email_verification_token: (!req.is_verified).then(Uuid::new_v4),
            email_verification_expiry: (!req.is_verified)
                .then(|| now + Duration::hours(security.email_verification_ttl_hours)),
            phone_verification_code: needs_phone_code.then(verification::generate_phone_code),
            phone_verification_expiry: needs_phone_code
                .then(|| now + Duration::minutes(security.phone_verification_ttl_minutes)),
        },
    )
    .await?;
    info!("{:<12} --> 관리자 사용자 생성 user: {}", "Identity", user.id);

    send_verification_email(state, &user);
    send_phone_code(state, &user);
    Ok(user)
}

pub async fn update_user(state: &AppState, user_id: i64, mut patch: UserPatch) -> AppResult<User> {
    patch.validate()?;
    patch.email = patch.email.map(|e| verification::normalize_email(&e));
    store::update(&state.db_manager, user_id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("사용자가 존재하지 않습니다."))
}

pub async fn delete_user(state: &AppState, user_id: i64) -> AppResult<()> {
    if !store::delete(&state.db_manager, user_id).await? {
        return Err(AppError::not_found("사용자가 존재하지 않습니다."));
    }
    info!("{:<12} --> 사용자 삭제 user: {}", "Identity", user_id);
    Ok(())
}
// endregion: --- Admin

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            email: "ala@example.com".into(),
            username: "ala".into(),
            password_hash: None,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            is_verified: true,
            email_verification_token: None,
            email_verification_expiry: None,
            phone_number: "+48123456789".into(),
            phone_verification_code: None,
            phone_verification_expiry: None,
            is_phone_verified: true,
            password_reset_required: false,
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn verified_active_user_can_login() {
        assert!(ensure_can_login(&user()).is_ok());
    }

    #[test]
    fn login_gates_reject_with_unauthorized() {
        let gates: Vec<fn(&mut User)> = vec![
            |u| u.is_active = false,
            |u| u.is_verified = false,
            |u| u.is_phone_verified = false,
            |u| u.password_reset_required = true,
        ];
        for gate in gates {
            let mut u = user();
            gate(&mut u);
            let err = ensure_can_login(&u).unwrap_err();
            assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn phone_checks_require_pending_number() {
        let mut u = user();
        assert_eq!(ensure_phone_pending(&u).unwrap_err().code(), "ALREADY_VERIFIED");
        u.phone_number.clear();
        assert_eq!(ensure_phone_pending(&u).unwrap_err().code(), "NO_PHONE");
        u.phone_number = "+48123456789".into();
        u.is_phone_verified = false;
        assert!(ensure_phone_pending(&u).is_ok());
    }
}
