/// JWT access/refresh 토큰 발급 및 검증
// region:    --- Imports
use crate::config::SecurityConfig;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;
// endregion: --- Imports

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub jti: String,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> AppResult<i64> {
        self.sub
            .parse()
            .map_err(|_| AppError::unauthorized("유효하지 않은 토큰입니다."))
    }

    pub fn jti(&self) -> AppResult<Uuid> {
        Uuid::parse_str(&self.jti).map_err(|_| AppError::unauthorized("유효하지 않은 토큰입니다."))
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_else(Utc::now)
    }
}

pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &SecurityConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_token_ttl_minutes),
            refresh_ttl: Duration::days(config.refresh_token_ttl_days),
        }
    }

    pub fn issue(&self, user_id: i64, token_type: TokenType) -> AppResult<String> {
        let now = Utc::now();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            token_type,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::internal(format!("토큰 생성 실패: {}", e)))
    }

    /// access + refresh 쌍 발급
    pub fn issue_pair(&self, user_id: i64) -> AppResult<(String, String)> {
        Ok((
            self.issue(user_id, TokenType::Access)?,
            self.issue(user_id, TokenType::Refresh)?,
        ))
    }

    /// 서명, 만료, 토큰 종류 검증
    pub fn decode(&self, token: &str, expected: TokenType) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!("{:<12} --> 토큰 검증 실패: {}", "Identity", e);
            AppError::unauthorized("유효하지 않은 토큰입니다.")
        })?;
        if data.claims.token_type != expected {
            return Err(AppError::unauthorized("토큰 종류가 올바르지 않습니다."));
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn service() -> TokenService {
        let mut config = Config::defaults().unwrap();
        config.security.jwt_secret = "test-secret".into();
        TokenService::new(&config.security)
    }

    #[test]
    fn access_token_round_trip_carries_user() {
        let tokens = service();
        let token = tokens.issue(42, TokenType::Access).unwrap();
        let claims = tokens.decode(&token, TokenType::Access).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert!(claims.jti().is_ok());
    }

    #[test]
    fn refresh_token_is_not_accepted_as_access() {
        let tokens = service();
        let (_, refresh) = tokens.issue_pair(7).unwrap();
        let err = tokens.decode(&refresh, TokenType::Access).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = service().issue(1, TokenType::Access).unwrap();
        let mut config = Config::defaults().unwrap();
        config.security.jwt_secret = "other-secret".into();
        let other = TokenService::new(&config.security);
        assert!(other.decode(&token, TokenType::Access).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut config = Config::defaults().unwrap();
        config.security.jwt_secret = "test-secret".into();
        config.security.access_token_ttl_minutes = -10;
        let tokens = TokenService::new(&config.security);
        let token = tokens.issue(1, TokenType::Access).unwrap();
        assert!(tokens.decode(&token, TokenType::Access).is_err());
    }
}
