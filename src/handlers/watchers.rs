/// 경매 관심 목록 핸들러
// region:    --- Imports
use super::extract::{AppJson, AppPath, AppQuery};
use crate::accounts::extract::{AuthUser, StaffUser};
use crate::accounts::model::User;
use crate::error::{AppError, AppResult};
use crate::pagination::{Page, PageQuery};
use crate::state::AppState;
use crate::watchers::model::{
    AuctionIdQuery, AuctionWatcher, SearchQuery, WatcherInput, WatcherPatch, WatcherUsername,
};
use crate::watchers::store;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
// endregion: --- Imports

/// 소유자 또는 스태프만 수정/삭제 가능
fn ensure_owner_or_staff(watcher: &AuctionWatcher, user: &User) -> AppResult<()> {
    if watcher.user_id != user.id && !user.is_staff {
        return Err(AppError::forbidden("권한이 없습니다."));
    }
    Ok(())
}

fn required_auction_id(query: &AuctionIdQuery) -> AppResult<i64> {
    query
        .auction_id
        .ok_or_else(|| AppError::bad_request("auction_id 파라미터가 필요합니다.", "PARAM_REQUIRED"))
}

pub async fn list_watchers(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppQuery(page): AppQuery<PageQuery>,
) -> AppResult<Json<Page<AuctionWatcher>>> {
    let page = store::list(&state.db_manager, page, state.page_size(), "/api/auction-watchers").await?;
    Ok(Json(page))
}

pub async fn create_watcher(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(input): AppJson<WatcherInput>,
) -> AppResult<(StatusCode, Json<AuctionWatcher>)> {
    let watcher = store::upsert(&state.db_manager, input.auction, user.id, input.notify_via_email).await?;
    Ok((StatusCode::CREATED, Json(watcher)))
}

pub async fn get_watcher(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    AppPath(watcher_id): AppPath<i64>,
) -> AppResult<Json<AuctionWatcher>> {
    Ok(Json(store::get(&state.db_manager, watcher_id).await?))
}

pub async fn update_watcher(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(watcher_id): AppPath<i64>,
    AppJson(patch): AppJson<WatcherPatch>,
) -> AppResult<Json<AuctionWatcher>> {
    let watcher = store::get(&state.db_manager, watcher_id).await?;
    ensure_owner_or_staff(&watcher, &user)?;
    Ok(Json(store::update(&state.db_manager, watcher_id, &patch).await?))
}

pub async fn delete_watcher(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(watcher_id): AppPath<i64>,
) -> AppResult<StatusCode> {
    let watcher = store::get(&state.db_manager, watcher_id).await?;
    ensure_owner_or_staff(&watcher, &user)?;
    store::delete(&state.db_manager, watcher_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 스태프는 사용자 이름 검색, 그 외는 본인 목록
pub async fn search_watchers(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppQuery(search): AppQuery<SearchQuery>,
) -> AppResult<Json<Vec<AuctionWatcher>>> {
    let watchers = if user.is_staff {
        let q = search
            .q
            .ok_or_else(|| AppError::bad_request("q 파라미터가 필요합니다.", "PARAM_REQUIRED"))?;
        store::search_by_username(&state.db_manager, &q).await?
    } else {
        store::by_user(&state.db_manager, user.id).await?
    };
    Ok(Json(watchers))
}

pub async fn check_notification(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppQuery(query): AppQuery<AuctionIdQuery>,
) -> AppResult<Json<Value>> {
    let auction_id = required_auction_id(&query)?;
    let body = match store::for_user_and_auction(&state.db_manager, auction_id, user.id).await? {
        Some(watcher) => json!({ "notify_via_email": watcher.notify_via_email, "id": watcher.id }),
        None => json!({ "notify_via_email": false }),
    };
    Ok(Json(body))
}

/// 파라미터 누락(400)을 권한(403)보다 먼저 검사
pub async fn watchers_for_auction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppQuery(query): AppQuery<AuctionIdQuery>,
) -> AppResult<Json<Vec<WatcherUsername>>> {
    let auction_id = required_auction_id(&query)?;
    if !user.is_staff {
        return Err(AppError::forbidden("권한이 없습니다."));
    }
    Ok(Json(store::usernames_for_auction(&state.db_manager, auction_id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: i64, is_staff: bool) -> User {
        User {
            id,
            email: format!("user{}@example.com", id),
            username: format!("user{}", id),
            password_hash: None,
            is_active: true,
            is_staff,
            is_superuser: false,
            is_verified: true,
            email_verification_token: None,
            email_verification_expiry: None,
            phone_number: String::new(),
            phone_verification_code: None,
            phone_verification_expiry: None,
            is_phone_verified: true,
            password_reset_required: false,
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn only_owner_or_staff_may_modify() {
        let watcher = AuctionWatcher {
            id: 1,
            auction_id: 10,
            user_id: 7,
            notify_via_email: true,
        };
        assert!(ensure_owner_or_staff(&watcher, &user(7, false)).is_ok());
        assert!(ensure_owner_or_staff(&watcher, &user(8, true)).is_ok());
        let err = ensure_owner_or_staff(&watcher, &user(8, false)).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn auction_id_param_is_required() {
        let err = required_auction_id(&AuctionIdQuery { auction_id: None }).unwrap_err();
        assert_eq!(err.code(), "PARAM_REQUIRED");
        assert_eq!(required_auction_id(&AuctionIdQuery { auction_id: Some(3) }).unwrap(), 3);
    }
}
