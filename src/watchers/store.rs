/// 관심 목록 저장소
// region:    --- Imports
use super::model::{AuctionWatcher, WatcherPatch, WatcherUsername};
use super::queries;
use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::pagination::{Page, PageQuery, PageWindow};
use tracing::info;
// endregion: --- Imports

pub async fn list(
    db_manager: &DatabaseManager,
    page: PageQuery,
    page_size: i64,
    path: &'static str,
) -> AppResult<Page<AuctionWatcher>> {
    let count: i64 = sqlx::query_scalar(queries::COUNT_WATCHERS)
        .fetch_one(db_manager.pool())
        .await?;
    let window = PageWindow::resolve(&page, count, page_size)?;
    let results = sqlx::query_as::<_, AuctionWatcher>(queries::LIST_WATCHERS)
        .bind(window.limit)
        .bind(window.offset)
        .fetch_all(db_manager.pool())
        .await?;
    Ok(Page::new(window, count, results, path))
}

pub async fn get(db_manager: &DatabaseManager, watcher_id: i64) -> AppResult<AuctionWatcher> {
    sqlx::query_as::<_, AuctionWatcher>(queries::GET_WATCHER)
        .bind(watcher_id)
        .fetch_optional(db_manager.pool())
        .await?
        .ok_or_else(|| AppError::not_found("관심 등록을 찾을 수 없습니다."))
}

/// 관심 등록 (이미 있으면 알림 설정만 갱신)
pub async fn upsert(
    db_manager: &DatabaseManager,
    auction_id: i64,
    user_id: i64,
    notify_via_email: bool,
) -> AppResult<AuctionWatcher> {
    let watcher = sqlx::query_as::<_, AuctionWatcher>(queries::UPSERT_WATCHER)
        .bind(auction_id)
        .bind(user_id)
        .bind(notify_via_email)
        .fetch_one(db_manager.pool())
        .await
        .map_err(|e| match AppError::from(e) {
            // 존재하지 않는 경매 참조
            AppError::NotFound(_) => AppError::not_found("경매를 찾을 수 없습니다."),
            other => other,
        })?;
    info!(
        "{:<12} --> 관심 등록 auction: {}, user: {}",
        "Command", auction_id, user_id
    );
    Ok(watcher)
}

pub async fn update(
    db_manager: &DatabaseManager,
    watcher_id: i64,
    patch: &WatcherPatch,
) -> AppResult<AuctionWatcher> {
    sqlx::query_as::<_, AuctionWatcher>(queries::UPDATE_WATCHER)
        .bind(patch.auction)
        .bind(patch.notify_via_email)
        .bind(watcher_id)
        .fetch_optional(db_manager.pool())
        .await?
        .ok_or_else(|| AppError::not_found("관심 등록을 찾을 수 없습니다."))
}

pub async fn delete(db_manager: &DatabaseManager, watcher_id: i64) -> AppResult<()> {
    let result = sqlx::query(queries::DELETE_WATCHER)
        .bind(watcher_id)
        .execute(db_manager.pool())
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("관심 등록을 찾을 수 없습니다."));
    }
    Ok(())
}

pub async fn by_user(db_manager: &DatabaseManager, user_id: i64) -> AppResult<Vec<AuctionWatcher>> {
    Ok(sqlx::query_as::<_, AuctionWatcher>(queries::GET_WATCHERS_BY_USER)
        .bind(user_id)
        .fetch_all(db_manager.pool())
        .await?)
}

pub async fn search_by_username(
    db_manager: &DatabaseManager,
    fragment: &str,
) -> AppResult<Vec<AuctionWatcher>> {
    Ok(sqlx::query_as::<_, AuctionWatcher>(queries::SEARCH_WATCHERS_BY_USERNAME)
        .bind(escape_like(fragment))
        .fetch_all(db_manager.pool())
        .await?)
}

pub async fn for_user_and_auction(
    db_manager: &DatabaseManager,
    auction_id: i64,
    user_id: i64,
) -> AppResult<Option<AuctionWatcher>> {
    Ok(sqlx::query_as::<_, AuctionWatcher>(queries::GET_WATCHER_FOR_USER)
        .bind(auction_id)
        .bind(user_id)
        .fetch_optional(db_manager.pool())
        .await?)
}

pub async fn usernames_for_auction(
    db_manager: &DatabaseManager,
    auction_id: i64,
) -> AppResult<Vec<WatcherUsername>> {
    Ok(sqlx::query_as::<_, WatcherUsername>(queries::GET_WATCHER_USERNAMES)
        .bind(auction_id)
        .fetch_all(db_manager.pool())
        .await?)
}

/// ILIKE 패턴 문자 이스케이프
pub fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("ala"), "ala");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
    }
}
