/// 관리자용 경매/상품/입찰 쓰기 작업
// region:    --- Imports
use super::model::{Auction, AuctionInput, AuctionPatch, Item, ItemInput, ItemPatch};
use super::rules;
use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::query::queries;
use tracing::info;
// endregion: --- Imports

pub const DEFAULT_IMAGE: &str = "default.jpg";

// region:    --- Auctions
pub async fn create_auction(db_manager: &DatabaseManager, input: AuctionInput) -> AppResult<Auction> {
    let buy_now_price = rules::resolve_buy_now_price(input.buy_now_price, input.current_bid);
    let auction = sqlx::query_as::<_, Auction>(queries::INSERT_AUCTION)
        .bind(&input.title)
        .bind(&input.artist)
        .bind(input.year)
        .bind(&input.medium)
        .bind(&input.dimensions)
        .bind(&input.description)
        .bind(input.image.as_deref().unwrap_or(DEFAULT_IMAGE))
        .bind(input.current_bid)
        .bind(input.end_date)
        .bind(buy_now_price)
        .fetch_one(db_manager.pool())
        .await?;

    info!("{:<12} --> 경매 생성 id: {}", "Command", auction.id);
    Ok(auction)
}

/// 부분 수정 후 즉시 구매가가 비어 있으면 기본값을 다시 적용
pub async fn update_auction(
    db_manager: &DatabaseManager,
    auction_id: i64,
    patch: AuctionPatch,
) -> AppResult<Auction> {
    let auction = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let mut auction = sqlx::query_as::<_, Auction>(queries::LOCK_AUCTION)
                    .bind(auction_id)
                    .fetch_optional(&mut **tx)
                    .await?
                    .ok_or_else(|| AppError::not_found("경매를 찾을 수 없습니다."))?;

                apply_auction_patch(&mut auction, patch);

                sqlx::query_as::<_, Auction>(queries::UPDATE_AUCTION)
                    .bind(&auction.title)
                    .bind(&auction.artist)
                    .bind(auction.year)
                    .bind(&auction.medium)
                    .bind(&auction.dimensions)
                    .bind(&auction.description)
                    .bind(&auction.image)
                    .bind(auction.current_bid)
                    .bind(auction.end_date)
                    .bind(auction.buy_now_price)
                    .bind(auction.id)
                    .fetch_one(&mut **tx)
                    .await
                    .map_err(AppError::from)
            })
        })
        .await?;

    info!("{:<12} --> 경매 수정 id: {}", "Command", auction.id);
    Ok(auction)
}

pub fn apply_auction_patch(auction: &mut Auction, patch: AuctionPatch) {
    if let Some(title) = patch.title {
        auction.title = title;
    }
    if let Some(artist) = patch.artist {
        auction.artist = artist;
    }
    if let Some(year) = patch.year {
        auction.year = year;
    }
    if let Some(medium) = patch.medium {
        auction.medium = medium;
    }
    if let Some(dimensions) = patch.dimensions {
        auction.dimensions = dimensions;
    }
    if let Some(description) = patch.description {
        auction.description = description;
    }
    if let Some(image) = patch.image {
        auction.image = image;
    }
    if let Some(current_bid) = patch.current_bid {
        auction.current_bid = current_bid;
    }
    if let Some(end_date) = patch.end_date {
        auction.end_date = end_date;
    }
    if let Some(buy_now_price) = patch.buy_now_price {
        auction.buy_now_price = buy_now_price;
    }
    auction.buy_now_price = Some(rules::resolve_buy_now_price(
        auction.buy_now_price,
        auction.current_bid,
    ));
}

pub async fn delete_auction(db_manager: &DatabaseManager, auction_id: i64) -> AppResult<()> {
    let result = sqlx::query(queries::DELETE_AUCTION)
        .bind(auction_id)
        .execute(db_manager.pool())
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("경매를 찾을 수 없습니다."));
    }
    info!("{:<12} --> 경매 삭제 id: {}", "Command", auction_id);
    Ok(())
}

pub async fn delete_selected_auctions(db_manager: &DatabaseManager, ids: &[i64]) -> AppResult<u64> {
    ensure_ids(ids)?;
    let result = sqlx::query(queries::DELETE_AUCTIONS_BY_IDS)
        .bind(ids)
        .execute(db_manager.pool())
        .await?;
    info!("{:<12} --> 경매 선택 삭제: {}건", "Command", result.rows_affected());
    Ok(result.rows_affected())
}
// endregion: --- Auctions

// region:    --- Items
pub async fn create_item(db_manager: &DatabaseManager, input: ItemInput) -> AppResult<Item> {
    let item = sqlx::query_as::<_, Item>(queries::INSERT_ITEM)
        .bind(&input.title)
        .bind(&input.artist)
        .bind(input.year)
        .bind(&input.medium)
        .bind(&input.dimensions)
        .bind(&input.description)
        .bind(input.image.as_deref().unwrap_or(DEFAULT_IMAGE))
        .bind(input.price)
        .fetch_one(db_manager.pool())
        .await?;

    info!("{:<12} --> 상품 생성 id: {}", "Command", item.id);
    Ok(item)
}

pub async fn update_item(db_manager: &DatabaseManager, item_id: i64, patch: ItemPatch) -> AppResult<Item> {
    // buyer 필드: 누락이면 유지, null 이면 해제
    let (buyer_present, buyer_id) = match patch.buyer {
        None => (false, None),
        Some(buyer) => (true, buyer),
    };

    let item = sqlx::query_as::<_, Item>(queries::UPDATE_ITEM)
        .bind(patch.title)
        .bind(patch.artist)
        .bind(patch.year)
        .bind(patch.medium)
        .bind(patch.dimensions)
        .bind(patch.description)
        .bind(patch.image)
        .bind(patch.price)
        .bind(buyer_present)
        .bind(buyer_id)
        .bind(item_id)
        .fetch_optional(db_manager.pool())
        .await?
        .ok_or_else(|| AppError::not_found("상품을 찾을 수 없습니다."))?;

    info!("{:<12} --> 상품 수정 id: {}", "Command", item.id);
    Ok(item)
}

pub async fn delete_item(db_manager: &DatabaseManager, item_id: i64) -> AppResult<()> {
    let result = sqlx::query(queries::DELETE_ITEM)
        .bind(item_id)
        .execute(db_manager.pool())
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("상품을 찾을 수 없습니다."));
    }
    info!("{:<12} --> 상품 삭제 id: {}", "Command", item_id);
    Ok(())
}

pub async fn delete_selected_items(db_manager: &DatabaseManager, ids: &[i64]) -> AppResult<u64> {
    ensure_ids(ids)?;
    let result = sqlx::query(queries::DELETE_ITEMS_BY_IDS)
        .bind(ids)
        .execute(db_manager.pool())
        .await?;
    info!("{:<12} --> 상품 선택 삭제: {}건", "Command", result.rows_affected());
    Ok(result.rows_affected())
}
// endregion: --- Items

// region:    --- Bids
pub async fn delete_bid(db_manager: &DatabaseManager, bid_id: i64) -> AppResult<()> {
    let result = sqlx::query(queries::DELETE_BID)
        .bind(bid_id)
        .execute(db_manager.pool())
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("입찰을 찾을 수 없습니다."));
    }
    info!("{:<12} --> 입찰 삭제 id: {}", "Command", bid_id);
    Ok(())
}

pub async fn delete_selected_bids(db_manager: &DatabaseManager, ids: &[i64]) -> AppResult<u64> {
    ensure_ids(ids)?;
    let result = sqlx::query(queries::DELETE_BIDS_BY_IDS)
        .bind(ids)
        .execute(db_manager.pool())
        .await?;
    info!("{:<12} --> 입찰 선택 삭제: {}건", "Command", result.rows_affected());
    Ok(result.rows_affected())
}
// endregion: --- Bids

pub fn ensure_ids(ids: &[i64]) -> AppResult<()> {
    if ids.is_empty() {
        return Err(AppError::bad_request("삭제할 ID 목록이 비어 있습니다.", "NO_IDS"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn auction() -> Auction {
        Auction {
            id: 7,
            title: "Martwa natura".into(),
            artist: "Jan".into(),
            year: 1999,
            medium: "akwarela".into(),
            dimensions: "30x40".into(),
            description: String::new(),
            image: DEFAULT_IMAGE.into(),
            current_bid: dec!(100.00),
            end_date: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            buy_now_price: Some(dec!(500.00)),
        }
    }

    #[test]
    fn patch_keeps_untouched_fields() {
        let mut a = auction();
        apply_auction_patch(
            &mut a,
            AuctionPatch {
                title: Some("Nowy tytuł".into()),
                ..Default::default()
            },
        );
        assert_eq!(a.title, "Nowy tytuł");
        assert_eq!(a.artist, "Jan");
        assert_eq!(a.buy_now_price, Some(dec!(500.00)));
    }

    #[test]
    fn cleared_buy_now_price_gets_default() {
        let mut a = auction();
        apply_auction_patch(
            &mut a,
            AuctionPatch {
                current_bid: Some(dec!(200.00)),
                buy_now_price: Some(None),
                ..Default::default()
            },
        );
        assert_eq!(a.buy_now_price, Some(dec!(600.00)));
    }

    #[test]
    fn empty_id_list_is_rejected() {
        let err = ensure_ids(&[]).unwrap_err();
        assert_eq!(err.code(), "NO_IDS");
        assert!(ensure_ids(&[1, 2]).is_ok());
    }
}
