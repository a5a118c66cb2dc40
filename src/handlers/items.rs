/// 상품 핸들러
// region:    --- Imports
use super::extract::{AppJson, AppPath, AppQuery};
use super::message;
use crate::accounts::extract::{AuthUser, StaffUser};
use crate::bidding::admin;
use crate::bidding::commands::handle_item_buy_now;
use crate::bidding::model::{Item, ItemInput, ItemPatch, SelectedIds};
use crate::error::AppResult;
use crate::pagination::{Page, PageQuery};
use crate::query;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;
// endregion: --- Imports

pub async fn list_items(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<PageQuery>,
) -> AppResult<Json<Page<Item>>> {
    let page = query::handlers::list_items(&state.db_manager, page, state.page_size(), "/api/items").await?;
    Ok(Json(page))
}

pub async fn create_item(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppJson(input): AppJson<ItemInput>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let item = admin::create_item(&state.db_manager, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_item(State(state): State<AppState>, AppPath(item_id): AppPath<i64>) -> AppResult<Json<Item>> {
    Ok(Json(query::handlers::get_item(&state.db_manager, item_id).await?))
}

pub async fn update_item(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppPath(item_id): AppPath<i64>,
    AppJson(patch): AppJson<ItemPatch>,
) -> AppResult<Json<Item>> {
    patch.validate()?;
    Ok(Json(admin::update_item(&state.db_manager, item_id, patch).await?))
}

pub async fn delete_item(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppPath(item_id): AppPath<i64>,
) -> AppResult<StatusCode> {
    admin::delete_item(&state.db_manager, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_selected_items(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppJson(selected): AppJson<SelectedIds>,
) -> AppResult<StatusCode> {
    admin::delete_selected_items(&state.db_manager, &selected.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 상품 즉시 구매 (이미 구매된 상품은 403)
pub async fn buy_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(item_id): AppPath<i64>,
) -> AppResult<impl IntoResponse> {
    handle_item_buy_now(item_id, user.id, &state.db_manager).await?;
    Ok((StatusCode::CREATED, message("구매가 완료되었습니다.")))
}
