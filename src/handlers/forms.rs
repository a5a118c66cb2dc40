/// 문의/출품 요청 폼 핸들러
// region:    --- Imports
use super::extract::AppJson;
use super::message;
use crate::accounts::extract::AuthUser;
use crate::error::AppResult;
use crate::forms::{self, AuctionRequestForm, ContactForm};
use crate::state::AppState;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;
// endregion: --- Imports

pub async fn send_contact_email(
    State(state): State<AppState>,
    AppJson(form): AppJson<ContactForm>,
) -> AppResult<Json<Value>> {
    forms::send_contact_message(&state, form).await?;
    Ok(message("메일이 발송되었습니다."))
}

pub async fn send_auction_request(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = AuctionRequestForm::from_multipart(multipart).await?;
    forms::send_auction_request(&state, form).await?;
    Ok((StatusCode::CREATED, message("출품 요청이 접수되었습니다.")))
}
