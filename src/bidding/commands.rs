/// 입찰 관련 커맨드 처리
/// 1. 입찰
/// 2. 경매 즉시 구매
/// 3. 상품 즉시 구매
// region:    --- Imports
use super::model::{Auction, Item};
use super::rules;
use crate::auction::events::AuctionEvent;
use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::notification::NotificationQueue;
use crate::query::queries;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgConnection;
use tracing::{info, warn};
// endregion: --- Imports

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Clone, Copy)]
pub struct PlaceBidCommand {
    pub auction_id: i64,
    pub bidder_id: i64,
    pub bid_amount: Decimal,
}

/// 즉시 구매 명령
#[derive(Debug, Clone, Copy)]
pub struct BuyNowCommand {
    pub auction_id: i64,
    pub buyer_id: i64,
}

/// 입찰/즉시 구매 처리 결과
#[derive(Debug, Serialize)]
pub struct BidReceipt {
    pub success: bool,
    pub current_bid: Decimal,
    pub end_date: DateTime<Utc>,
}

/// 1. 입찰
///
/// 경매 행을 잠근 상태에서 검증, 입찰 저장, 현재가 갱신을 하나의 트랜잭션으로 처리한다.
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    db_manager: &DatabaseManager,
    notifier: &NotificationQueue,
) -> AppResult<BidReceipt> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);

    let (receipt, timestamp) = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let auction = lock_auction(&mut **tx, cmd.auction_id).await?;
                let now = Utc::now();

                let end_date = rules::validate_bid(&auction, cmd.bid_amount, now)?;
                if end_date != auction.end_date {
                    info!(
                        "{:<12} --> 종료 직전 입찰로 종료 시간 연장 auction: {} -> {}",
                        "Command", auction.id, end_date
                    );
                }

                upsert_bid(&mut **tx, auction.id, cmd.bidder_id, cmd.bid_amount, now).await?;
                sqlx::query(queries::UPDATE_AUCTION_AFTER_BID)
                    .bind(cmd.bid_amount)
                    .bind(end_date)
                    .bind(auction.id)
                    .execute(&mut **tx)
                    .await?;

                Ok::<_, AppError>((
                    BidReceipt {
                        success: true,
                        current_bid: cmd.bid_amount,
                        end_date,
                    },
                    now,
                ))
            })
        })
        .await?;

    notifier.schedule(AuctionEvent::BidPlaced {
        auction_id: cmd.auction_id,
        bidder_id: cmd.bidder_id,
        amount: cmd.bid_amount,
        timestamp,
    });

    info!(
        "{:<12} --> 입찰 완료 auction: {}, amount: {}",
        "Command", cmd.auction_id, cmd.bid_amount
    );
    Ok(receipt)
}

/// 2. 경매 즉시 구매(낙찰)
///
/// 관심 사용자 알림은 예약하지 않는다.
pub async fn handle_buy_now(cmd: BuyNowCommand, db_manager: &DatabaseManager) -> AppResult<BidReceipt> {
    info!("{:<12} --> 즉시 구매 요청 처리 시작: {:?}", "Command", cmd);

    let receipt = db_manager
        .transaction(|tx| {
            Box::pin(async move {
                let auction = lock_auction(&mut **tx, cmd.auction_id).await?;
                let now = Utc::now();

                let price = rules::validate_buy_now(&auction, now)?;

                upsert_bid(&mut **tx, auction.id, cmd.buyer_id, price, now).await?;
                sqlx::query(queries::UPDATE_AUCTION_AFTER_BID)
                    .bind(price)
                    .bind(now)
                    .bind(auction.id)
                    .execute(&mut **tx)
                    .await?;

                Ok::<_, AppError>(BidReceipt {
                    success: true,
                    current_bid: price,
                    end_date: now,
                })
            })
        })
        .await?;

    info!(
        "{:<12} --> 즉시 구매 완료 auction: {}, price: {}",
        "Command", cmd.auction_id, receipt.current_bid
    );
    Ok(receipt)
}

/// 3. 상품 즉시 구매
///
/// 구매자가 없는 경우에만 갱신되는 단일 UPDATE 로 중복 구매를 막는다.
pub async fn handle_item_buy_now(
    item_id: i64,
    buyer_id: i64,
    db_manager: &DatabaseManager,
) -> AppResult<Item> {
    info!(
        "{:<12} --> 상품 즉시 구매 요청 item: {}, buyer: {}",
        "Command", item_id, buyer_id
    );

    let claimed = sqlx::query_as::<_, Item>(queries::CLAIM_ITEM)
        .bind(buyer_id)
        .bind(item_id)
        .fetch_optional(db_manager.pool())
        .await?;

    match claimed {
        Some(item) => Ok(item),
        None => {
            let exists = sqlx::query_as::<_, Item>(queries::GET_ITEM)
                .bind(item_id)
                .fetch_optional(db_manager.pool())
                .await?;
            match exists {
                Some(_) => {
                    warn!("{:<12} --> 이미 판매된 상품 item: {}", "Command", item_id);
                    Err(AppError::forbidden("이미 판매된 상품입니다."))
                }
                None => Err(AppError::not_found("상품을 찾을 수 없습니다.")),
            }
        }
    }
}
// endregion: --- Commands

// region:    --- Helpers
async fn lock_auction(conn: &mut PgConnection, auction_id: i64) -> AppResult<Auction> {
    sqlx::query_as::<_, Auction>(queries::LOCK_AUCTION)
        .bind(auction_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found("경매를 찾을 수 없습니다."))
}

async fn upsert_bid(
    conn: &mut PgConnection,
    auction_id: i64,
    user_id: i64,
    amount: Decimal,
    date: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(queries::UPSERT_BID)
        .bind(auction_id)
        .bind(user_id)
        .bind(amount)
        .bind(date)
        .execute(conn)
        .await?;
    Ok(())
}
// endregion: --- Helpers
