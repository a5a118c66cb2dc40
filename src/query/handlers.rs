// region:    --- Imports
use super::queries;
use crate::bidding::model::{
    Auction, AuctionBidEntry, AuctionBidsSummary, AuctionStatus, AuctionWithStatus, BidWithAuction,
    BidWithBidder, Item, MyAuctionEntry,
};
use crate::bidding::rules;
use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::pagination::{Page, PageQuery, PageWindow};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

// endregion: --- Imports

// region:    --- Query Handlers

/// 경매 목록 조회 (건수와 페이지를 같은 트랜잭션에서 조회)
pub async fn list_auctions(
    db_manager: &DatabaseManager,
    page: PageQuery,
    page_size: i64,
    path: &'static str,
) -> AppResult<Page<Auction>> {
    info!("{:<12} --> 경매 목록 조회 page: {:?}", "Query", page.page);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let count: i64 = sqlx::query_scalar(queries::COUNT_AUCTIONS)
                    .fetch_one(&mut **tx)
                    .await?;
                let window = PageWindow::resolve(&page, count, page_size)?;
                let results = sqlx::query_as::<_, Auction>(queries::LIST_AUCTIONS)
                    .bind(window.limit)
                    .bind(window.offset)
                    .fetch_all(&mut **tx)
                    .await?;
                Ok::<_, AppError>(Page::new(window, count, results, path))
            })
        })
        .await
}

/// 경매 조회
pub async fn get_auction(db_manager: &DatabaseManager, auction_id: i64) -> AppResult<Auction> {
    info!("{:<12} --> 경매 조회 id: {}", "Query", auction_id);
    sqlx::query_as::<_, Auction>(queries::GET_AUCTION)
        .bind(auction_id)
        .fetch_optional(db_manager.pool())
        .await?
        .ok_or_else(|| AppError::not_found("경매를 찾을 수 없습니다."))
}

/// 상품 목록 조회
pub async fn list_items(
    db_manager: &DatabaseManager,
    page: PageQuery,
    page_size: i64,
    path: &'static str,
) -> AppResult<Page<Item>> {
    info!("{:<12} --> 상품 목록 조회 page: {:?}", "Query", page.page);
    db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let count: i64 = sqlx::query_scalar(queries::COUNT_ITEMS)
                    .fetch_one(&mut **tx)
                    .await?;
                let window = PageWindow::resolve(&page, count, page_size)?;
                let results = sqlx::query_as::<_, Item>(queries::LIST_ITEMS)
                    .bind(window.limit)
                    .bind(window.offset)
                    .fetch_all(&mut **tx)
                    .await?;
                Ok::<_, AppError>(Page::new(window, count, results, path))
            })
        })
        .await
}

/// 상품 조회
pub async fn get_item(db_manager: &DatabaseManager, item_id: i64) -> AppResult<Item> {
    info!("{:<12} --> 상품 조회 id: {}", "Query", item_id);
    sqlx::query_as::<_, Item>(queries::GET_ITEM)
        .bind(item_id)
        .fetch_optional(db_manager.pool())
        .await?
        .ok_or_else(|| AppError::not_found("상품을 찾을 수 없습니다."))
}

#[derive(Debug, sqlx::FromRow)]
struct UserBidRow {
    bid_id: i64,
    user_id: i64,
    amount: Decimal,
    bid_date: DateTime<Utc>,
    #[sqlx(flatten)]
    auction: Auction,
}

async fn fetch_user_bids(db_manager: &DatabaseManager, user_id: i64) -> AppResult<Vec<UserBidRow>> {
    Ok(sqlx::query_as::<_, UserBidRow>(queries::GET_USER_BIDS_WITH_AUCTION)
        .bind(user_id)
        .fetch_all(db_manager.pool())
        .await?)
}

/// 내 입찰 목록 (경매 정보 및 상태 포함)
pub async fn get_user_bids(
    db_manager: &DatabaseManager,
    user_id: i64,
    now: DateTime<Utc>,
) -> AppResult<Vec<BidWithAuction>> {
    info!("{:<12} --> 사용자 입찰 목록 조회 user: {}", "Query", user_id);
    let rows = fetch_user_bids(db_manager, user_id).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let status = rules::derive_status(
                row.amount,
                row.auction.current_bid,
                row.auction.end_date,
                now,
            );
            BidWithAuction {
                id: row.bid_id,
                user_id: row.user_id,
                amount: row.amount,
                date: row.bid_date,
                auction: AuctionWithStatus {
                    auction: row.auction,
                    status,
                },
            }
        })
        .collect())
}

/// 내가 입찰한 경매 목록
pub async fn get_my_auctions(
    db_manager: &DatabaseManager,
    user_id: i64,
    now: DateTime<Utc>,
) -> AppResult<Vec<MyAuctionEntry>> {
    info!("{:<12} --> 사용자 경매 목록 조회 user: {}", "Query", user_id);
    let rows = fetch_user_bids(db_manager, user_id).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let a = row.auction;
            let status = rules::derive_status(row.amount, a.current_bid, a.end_date, now);
            MyAuctionEntry {
                id: a.id,
                title: a.title,
                current_bid: a.current_bid,
                is_winner: status == AuctionStatus::Won,
                status,
                image: a.image,
            }
        })
        .collect())
}

/// 경매 입찰 이력 조회
pub async fn get_auction_bid_history(
    db_manager: &DatabaseManager,
    auction_id: i64,
) -> AppResult<Vec<AuctionBidEntry>> {
    info!("{:<12} --> 입찰 이력 조회 auction: {}", "Query", auction_id);
    get_auction(db_manager, auction_id).await?;
    Ok(sqlx::query_as::<_, AuctionBidEntry>(queries::GET_AUCTION_BID_HISTORY)
        .bind(auction_id)
        .fetch_all(db_manager.pool())
        .await?)
}

/// 경매별 입찰 요약
pub async fn get_bids_by_auction(db_manager: &DatabaseManager) -> AppResult<Vec<AuctionBidsSummary>> {
    info!("{:<12} --> 경매별 입찰 요약 조회", "Query");
    let rows = sqlx::query_as::<_, BidWithBidder>(queries::GET_BIDS_WITH_BIDDERS)
        .fetch_all(db_manager.pool())
        .await?;
    Ok(group_bids_by_auction(rows))
}

/// 경매 ID, 금액 내림차순으로 정렬된 입찰을 경매별로 묶는다
pub fn group_bids_by_auction(rows: Vec<BidWithBidder>) -> Vec<AuctionBidsSummary> {
    let mut summaries: Vec<(i64, AuctionBidsSummary)> = Vec::new();
    for bid in rows {
        match summaries.last_mut() {
            Some((auction_id, summary)) if *auction_id == bid.auction_id => {
                summary.bids.push(bid);
                continue;
            }
            _ => {}
        }
        summaries.push((
            bid.auction_id,
            AuctionBidsSummary {
                auction: bid.auction_title.clone(),
                highest_bid_user: bid.email.clone(),
                bids: vec![bid],
            },
        ));
    }
    summaries.into_iter().map(|(_, summary)| summary).collect()
}

// endregion: --- Query Handlers

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bid(id: i64, auction_id: i64, email: &str, amount: Decimal) -> BidWithBidder {
        BidWithBidder {
            id,
            auction_id,
            user_id: id,
            username: email.split('@').next().unwrap_or_default().to_string(),
            email: email.to_string(),
            amount,
            date: Utc::now(),
            auction_title: format!("Aukcja {}", auction_id),
        }
    }

    #[test]
    fn groups_keep_highest_bidder_first() {
        let rows = vec![
            bid(1, 10, "ala@example.com", dec!(300)),
            bid(2, 10, "ola@example.com", dec!(200)),
            bid(3, 11, "ela@example.com", dec!(50)),
        ];
        let grouped = group_bids_by_auction(rows);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].auction, "Aukcja 10");
        assert_eq!(grouped[0].highest_bid_user, "ala@example.com");
        assert_eq!(grouped[0].bids.len(), 2);
        assert_eq!(grouped[1].highest_bid_user, "ela@example.com");
    }

    #[test]
    fn no_bids_means_no_groups() {
        assert!(group_bids_by_auction(Vec::new()).is_empty());
    }
}
