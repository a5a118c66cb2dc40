macro_rules! user_columns {
    () => {
        "id, email, username, password_hash, is_active, is_staff, is_superuser, is_verified, \
         email_verification_token, email_verification_expiry, phone_number, \
         phone_verification_code, phone_verification_expiry, is_phone_verified, \
         password_reset_required, date_joined"
    };
}

// region:    --- Users
pub const GET_USER_BY_ID: &str = concat!("SELECT ", user_columns!(), " FROM users WHERE id = $1");

pub const GET_USER_BY_EMAIL: &str =
    concat!("SELECT ", user_columns!(), " FROM users WHERE email = $1");

pub const GET_USER_BY_EMAIL_TOKEN: &str = concat!(
    "SELECT ",
    user_columns!(),
    " FROM users WHERE email_verification_token = $1"
);

pub const LIST_USERS: &str = concat!(
    "SELECT ",
    user_columns!(),
    " FROM users ORDER BY id LIMIT $1 OFFSET $2"
);

pub const COUNT_USERS: &str = "SELECT COUNT(*) FROM users";

pub const INSERT_USER: &str = concat!(
    "INSERT INTO users (email, username, password_hash, is_active, is_verified, is_phone_verified, \
     phone_number, email_verification_token, email_verification_expiry, \
     phone_verification_code, phone_verification_expiry) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING ",
    user_columns!()
);

/// 전달된 필드만 갱신
pub const UPDATE_USER: &str = concat!(
    "UPDATE users SET email = COALESCE($1, email), username = COALESCE($2, username), \
     is_active = COALESCE($3, is_active), is_staff = COALESCE($4, is_staff), \
     is_superuser = COALESCE($5, is_superuser), is_verified = COALESCE($6, is_verified), \
     is_phone_verified = COALESCE($7, is_phone_verified), \
     phone_number = COALESCE($8, phone_number) WHERE id = $9 RETURNING ",
    user_columns!()
);

pub const DELETE_USER: &str = "DELETE FROM users WHERE id = $1";

pub const USERNAME_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)";

/// 이메일 인증 완료 (토큰 제거)
pub const MARK_EMAIL_VERIFIED: &str = r#"
    UPDATE users
    SET is_verified = TRUE, is_active = TRUE,
        email_verification_token = NULL, email_verification_expiry = NULL
    WHERE id = $1
"#;

pub const SET_EMAIL_TOKEN: &str =
    "UPDATE users SET email_verification_token = $1, email_verification_expiry = $2 WHERE id = $3";

pub const SET_PHONE_CODE: &str =
    "UPDATE users SET phone_verification_code = $1, phone_verification_expiry = $2 WHERE id = $3";

pub const MARK_PHONE_VERIFIED: &str = r#"
    UPDATE users
    SET is_phone_verified = TRUE, phone_verification_code = NULL, phone_verification_expiry = NULL
    WHERE id = $1
"#;

pub const SET_PASSWORD: &str =
    "UPDATE users SET password_hash = $1, password_reset_required = FALSE WHERE id = $2";

pub const REQUIRE_PASSWORD_RESET: &str =
    "UPDATE users SET password_reset_required = TRUE WHERE email = $1";
// endregion: --- Users

// region:    --- Password Reset Tokens
pub const DELETE_RESET_TOKENS_FOR_USER: &str = "DELETE FROM password_reset_tokens WHERE user_id = $1";

pub const INSERT_RESET_TOKEN: &str =
    "INSERT INTO password_reset_tokens (user_id, token, expiry) VALUES ($1, $2, $3)";

pub const GET_RESET_TOKEN: &str =
    "SELECT id, user_id, token, created_at, expiry FROM password_reset_tokens WHERE token = $1";

pub const DELETE_RESET_TOKEN: &str = "DELETE FROM password_reset_tokens WHERE id = $1";
// endregion: --- Password Reset Tokens

// region:    --- Token Blacklist
pub const BLACKLIST_TOKEN: &str = r#"
    INSERT INTO token_blacklist (jti, user_id, expires_at)
    VALUES ($1, $2, $3)
    ON CONFLICT (jti) DO NOTHING
"#;

pub const IS_BLACKLISTED: &str = "SELECT EXISTS(SELECT 1 FROM token_blacklist WHERE jti = $1)";

pub const PURGE_EXPIRED_BLACKLIST: &str = "DELETE FROM token_blacklist WHERE expires_at < $1";
// endregion: --- Token Blacklist
