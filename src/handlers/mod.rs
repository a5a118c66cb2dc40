/// HTTP 핸들러 (라우트별 모듈)
pub mod accounts;
pub mod auctions;
pub mod content;
pub mod extract;
pub mod forms;
pub mod items;
pub mod users;
pub mod watchers;

use axum::Json;
use serde_json::{json, Value};

/// `{"message": ...}` 응답 본문
pub fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}
