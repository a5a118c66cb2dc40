/// 관리자 사용자 관리 핸들러
// region:    --- Imports
use super::extract::{AppJson, AppPath, AppQuery};
use crate::accounts::commands;
use crate::accounts::extract::StaffUser;
use crate::accounts::model::{UserAdminView, UserCreateRequest, UserPatch};
use crate::error::AppResult;
use crate::pagination::{Page, PageQuery};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
// endregion: --- Imports

const USERS_PATH: &str = "/accounts/users";

pub async fn list_users(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppQuery(page): AppQuery<PageQuery>,
) -> AppResult<Json<Page<UserAdminView>>> {
    let page = commands::list_users(&state, page, USERS_PATH).await?;
    Ok(Json(page.map(UserAdminView::from)))
}

pub async fn create_user(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppJson(req): AppJson<UserCreateRequest>,
) -> AppResult<(StatusCode, Json<UserAdminView>)> {
    let user = commands::create_user(&state, req).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn get_user(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppPath(user_id): AppPath<i64>,
) -> AppResult<Json<UserAdminView>> {
    Ok(Json(commands::get_user(&state, user_id).await?.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppPath(user_id): AppPath<i64>,
    AppJson(patch): AppJson<UserPatch>,
) -> AppResult<Json<UserAdminView>> {
    Ok(Json(commands::update_user(&state, user_id, patch).await?.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppPath(user_id): AppPath<i64>,
) -> AppResult<StatusCode> {
    commands::delete_user(&state, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
