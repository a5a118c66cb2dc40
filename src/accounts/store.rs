/// 사용자, 재설정 토큰, 토큰 블랙리스트 저장소
// region:    --- Imports
use super::model::{NewUser, PasswordResetToken, User, UserPatch};
use super::queries;
use crate::database::DatabaseManager;
use chrono::{DateTime, Utc};
use uuid::Uuid;
// endregion: --- Imports

type StoreResult<T> = Result<T, sqlx::Error>;

// region:    --- Users
pub async fn find_by_id(db_manager: &DatabaseManager, user_id: i64) -> StoreResult<Option<User>> {
    sqlx::query_as::<_, User>(queries::GET_USER_BY_ID)
        .bind(user_id)
        .fetch_optional(db_manager.pool())
        .await
}

pub async fn find_by_email(db_manager: &DatabaseManager, email: &str) -> StoreResult<Option<User>> {
    sqlx::query_as::<_, User>(queries::GET_USER_BY_EMAIL)
        .bind(email)
        .fetch_optional(db_manager.pool())
        .await
}

pub async fn find_by_email_token(
    db_manager: &DatabaseManager,
    token: Uuid,
) -> StoreResult<Option<User>> {
    sqlx::query_as::<_, User>(queries::GET_USER_BY_EMAIL_TOKEN)
        .bind(token)
        .fetch_optional(db_manager.pool())
        .await
}

pub async fn list(db_manager: &DatabaseManager, limit: i64, offset: i64) -> StoreResult<Vec<User>> {
    sqlx::query_as::<_, User>(queries::LIST_USERS)
        .bind(limit)
        .bind(offset)
        .fetch_all(db_manager.pool())
        .await
}

pub async fn count(db_manager: &DatabaseManager) -> StoreResult<i64> {
    sqlx::query_scalar(queries::COUNT_USERS)
        .fetch_one(db_manager.pool())
        .await
}

pub async fn insert(db_manager: &DatabaseManager, user: &NewUser) -> StoreResult<User> {
    sqlx::query_as::<_, User>(queries::INSERT_USER)
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.is_verified)
        .bind(user.is_phone_verified)
        .bind(&user.phone_number)
        .bind(user.email_verification_token)
        .bind(user.email_verification_expiry)
        .bind(&user.phone_verification_code)
        .bind(user.phone_verification_expiry)
        .fetch_one(db_manager.pool())
        .await
}

pub async fn update(
    db_manager: &DatabaseManager,
    user_id: i64,
    patch: &UserPatch,
) -> StoreResult<Option<User>> {
    sqlx::query_as::<_, User>(queries::UPDATE_USER)
        .bind(&patch.email)
        .bind(&patch.username)
        .bind(patch.is_active)
        .bind(patch.is_staff)
        .bind(patch.is_superuser)
        .bind(patch.is_verified)
        .bind(patch.is_phone_verified)
        .bind(&patch.phone_number)
        .bind(user_id)
        .fetch_optional(db_manager.pool())
        .await
}

pub async fn delete(db_manager: &DatabaseManager, user_id: i64) -> StoreResult<bool> {
    let result = sqlx::query(queries::DELETE_USER)
        .bind(user_id)
        .execute(db_manager.pool())
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn username_exists(db_manager: &DatabaseManager, username: &str) -> StoreResult<bool> {
    sqlx::query_scalar(queries::USERNAME_EXISTS)
        .bind(username)
        .fetch_one(db_manager.pool())
        .await
}

pub async fn mark_email_verified(db_manager: &DatabaseManager, user_id: i64) -> StoreResult<()> {
    sqlx::query(queries::MARK_EMAIL_VERIFIED)
        .bind(user_id)
        .execute(db_manager.pool())
        .await?;
    Ok(())
}

pub async fn set_email_token(
    db_manager: &DatabaseManager,
    user_id: i64,
    token: Uuid,
    expiry: DateTime<Utc>,
) -> StoreResult<()> {
    sqlx::query(queries::SET_EMAIL_TOKEN)
        .bind(token)
        .bind(expiry)
        .bind(user_id)
        .execute(db_manager.pool())
        .await?;
    Ok(())
}

pub async fn set_phone_code(
    db_manager: &DatabaseManager,
    user_id: i64,
    code: &str,
    expiry: DateTime<Utc>,
) -> StoreResult<()> {
    sqlx::query(queries::SET_PHONE_CODE)
        .bind(code)
        .bind(expiry)
        .bind(user_id)
        .execute(db_manager.pool())
        .await?;
    Ok(())
}

pub async fn mark_phone_verified(db_manager: &DatabaseManager, user_id: i64) -> StoreResult<()> {
    sqlx::query(queries::MARK_PHONE_VERIFIED)
        .bind(user_id)
        .execute(db_manager.pool())
        .await?;
    Ok(())
}

pub async fn require_password_reset(db_manager: &DatabaseManager, email: &str) -> StoreResult<bool> {
    let result = sqlx::query(queries::REQUIRE_PASSWORD_RESET)
        .bind(email)
        .execute(db_manager.pool())
        .await?;
    Ok(result.rows_affected() > 0)
}
// endregion: --- Users

// region:    --- Password Reset Tokens
/// 사용자의 기존 토큰을 지우고 새 토큰 저장
pub async fn replace_reset_token(
    db_manager: &DatabaseManager,
    user_id: i64,
    token: Uuid,
    expiry: DateTime<Utc>,
) -> StoreResult<()> {
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query(queries::DELETE_RESET_TOKENS_FOR_USER)
                    .bind(user_id)
                    .execute(&mut **tx)
                    .await?;
                sqlx::query(queries::INSERT_RESET_TOKEN)
                    .bind(user_id)
                    .bind(token)
                    .bind(expiry)
                    .execute(&mut **tx)
                    .await?;
                Ok::<_, sqlx::Error>(())
            })
        })
        .await
}

pub async fn find_reset_token(
    db_manager: &DatabaseManager,
    token: Uuid,
) -> StoreResult<Option<PasswordResetToken>> {
    sqlx::query_as::<_, PasswordResetToken>(queries::GET_RESET_TOKEN)
        .bind(token)
        .fetch_optional(db_manager.pool())
        .await
}

/// 새 비밀번호 저장과 토큰 삭제를 함께 처리
pub async fn complete_password_reset(
    db_manager: &DatabaseManager,
    reset_token_id: i64,
    user_id: i64,
    password_hash: String,
) -> StoreResult<()> {
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query(queries::SET_PASSWORD)
                    .bind(password_hash)
                    .bind(user_id)
                    .execute(&mut **tx)
                    .await?;
                sqlx::query(queries::DELETE_RESET_TOKEN)
                    .bind(reset_token_id)
                    .execute(&mut **tx)
                    .await?;
                Ok::<_, sqlx::Error>(())
            })
        })
        .await
}
// endregion: --- Password Reset Tokens

// region:    --- Token Blacklist
pub async fn blacklist_token(
    db_manager: &DatabaseManager,
    jti: Uuid,
    user_id: i64,
    expires_at: DateTime<Utc>,
) -> StoreResult<()> {
    sqlx::query(queries::BLACKLIST_TOKEN)
        .bind(jti)
        .bind(user_id)
        .bind(expires_at)
        .execute(db_manager.pool())
        .await?;
    Ok(())
}

pub async fn is_blacklisted(db_manager: &DatabaseManager, jti: Uuid) -> StoreResult<bool> {
    sqlx::query_scalar(queries::IS_BLACKLISTED)
        .bind(jti)
        .fetch_one(db_manager.pool())
        .await
}
// endregion: --- Token Blacklist
