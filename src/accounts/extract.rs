/// Bearer 토큰 기반 인증 추출기
// region:    --- Imports
use super::model::User;
use super::store;
use super::token::TokenType;
use crate::error::AppError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;
// endregion: --- Imports

/// 로그인한 활성 사용자
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// 스태프 사용자
#[derive(Debug, Clone)]
pub struct StaffUser(pub User);

pub fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            AppError::unauthorized("인증 정보가 제공되지 않았습니다.")
        })?;
        let claims = state.tokens.decode(token, TokenType::Access)?;
        let user_id = claims.user_id()?;

        let user = store::find_by_id(&state.db_manager, user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("사용자를 찾을 수 없습니다."))?;
        if !user.is_active {
            warn!("{:<12} --> 비활성 사용자 요청 user: {}", "Identity", user.id);
            return Err(AppError::unauthorized("비활성화된 계정입니다."));
        }
        Ok(AuthUser(user))
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_staff {
            return Err(AppError::forbidden("권한이 없습니다."));
        }
        Ok(StaffUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/accounts/user");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(bearer_token(&parts(Some("Bearer abc.def"))), Some("abc.def"));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_ignored() {
        assert_eq!(bearer_token(&parts(Some("Basic dXNlcg=="))), None);
        assert_eq!(bearer_token(&parts(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts(None)), None);
    }
}
