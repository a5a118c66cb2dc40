/// HTTP 응답으로 변환되는 애플리케이션 에러
// region:    --- Imports
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;
// endregion: --- Imports

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("입력값 검증 실패")]
    Validation(#[from] ValidationErrors),

    #[error("{message}")]
    BadRequest { message: String, code: &'static str },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("데이터베이스 오류: {0}")]
    Database(sqlx::Error),

    #[error("내부 오류: {0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, code: &'static str) -> Self {
        Self::BadRequest {
            message: message.into(),
            code,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::BadRequest { code, .. } => code,
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) | Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Self::NotFound("요청한 데이터를 찾을 수 없습니다.".into()),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Self::Conflict("이미 존재하는 데이터입니다.".into())
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                Self::NotFound("참조하는 데이터를 찾을 수 없습니다.".into())
            }
            other => Self::Database(other),
        }
    }
}

// region:    --- Extractor Rejections
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(
            format!("요청 본문을 해석할 수 없습니다: {}", rejection.body_text()),
            "INVALID_BODY",
        )
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(
            format!("쿼리 파라미터가 올바르지 않습니다: {}", rejection.body_text()),
            "INVALID_QUERY",
        )
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(
            format!("경로 파라미터가 올바르지 않습니다: {}", rejection.body_text()),
            "INVALID_PATH",
        )
    }
}
// endregion: --- Extractor Rejections

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::Validation(errors) => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
                "fields": errors,
            }),
            // 내부 오류 상세는 응답에 노출하지 않는다
            Self::Database(_) | Self::Internal(_) => {
                error!("{:<12} --> {}", "Error", self);
                serde_json::json!({
                    "error": "서버 내부 오류가 발생했습니다.",
                    "code": self.code(),
                })
            }
            _ => serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            AppError::bad_request("x", "LOW_BID").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::unauthorized("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn row_not_found_becomes_404() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn bad_request_keeps_code() {
        let err = AppError::bad_request("경매가 이미 종료되었습니다.", "ALREADY_ENDED");
        assert_eq!(err.code(), "ALREADY_ENDED");
        assert_eq!(err.to_string(), "경매가 이미 종료되었습니다.");
    }
}
