/// 경매 및 입찰 핸들러
// region:    --- Imports
use super::extract::{AppJson, AppPath, AppQuery};
use crate::accounts::extract::{AuthUser, StaffUser};
use crate::bidding::admin;
use crate::bidding::commands::{handle_buy_now, handle_place_bid, BidReceipt, BuyNowCommand, PlaceBidCommand};
use crate::bidding::model::{
    Auction, AuctionBidEntry, AuctionBidsSummary, AuctionInput, AuctionPatch, BidWithAuction,
    MyAuctionEntry, SelectedIds,
};
use crate::error::{AppError, AppResult};
use crate::pagination::{Page, PageQuery};
use crate::query;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use validator::Validate;
// endregion: --- Imports

#[derive(Debug, Deserialize)]
pub struct PlaceBidRequest {
    #[serde(default)]
    pub bid: Option<Decimal>,
}

// region:    --- Auctions
pub async fn list_auctions(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<PageQuery>,
) -> AppResult<Json<Page<Auction>>> {
    let page = query::handlers::list_auctions(&state.db_manager, page, state.page_size(), "/api/auctions").await?;
    Ok(Json(page))
}

pub async fn create_auction(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppJson(input): AppJson<AuctionInput>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let auction = admin::create_auction(&state.db_manager, input).await?;
    Ok((StatusCode::CREATED, Json(auction)))
}

pub async fn get_auction(State(state): State<AppState>, AppPath(auction_id): AppPath<i64>) -> AppResult<Json<Auction>> {
    Ok(Json(query::handlers::get_auction(&state.db_manager, auction_id).await?))
}

pub async fn update_auction(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppPath(auction_id): AppPath<i64>,
    AppJson(patch): AppJson<AuctionPatch>,
) -> AppResult<Json<Auction>> {
    patch.validate()?;
    Ok(Json(admin::update_auction(&state.db_manager, auction_id, patch).await?))
}

pub async fn delete_auction(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppPath(auction_id): AppPath<i64>,
) -> AppResult<StatusCode> {
    admin::delete_auction(&state.db_manager, auction_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_selected_auctions(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppJson(selected): AppJson<SelectedIds>,
) -> AppResult<StatusCode> {
    admin::delete_selected_auctions(&state.db_manager, &selected.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}
// endregion: --- Auctions

// region:    --- Bidding
/// 입찰 요청 처리
pub async fn place_bid(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(auction_id): AppPath<i64>,
    AppJson(req): AppJson<PlaceBidRequest>,
) -> AppResult<(StatusCode, Json<BidReceipt>)> {
    let bid_amount = req
        .bid
        .ok_or_else(|| AppError::bad_request("입찰 금액이 필요합니다.", "BID_REQUIRED"))?;
    let cmd = PlaceBidCommand {
        auction_id,
        bidder_id: user.id,
        bid_amount,
    };
    let receipt = handle_place_bid(cmd, &state.db_manager, &state.notifier).await?;
    info!("{:<12} --> 입찰 완료 auction: {}, user: {}", "Handler", auction_id, user.id);
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// 즉시 구매 요청 처리
pub async fn buy_now(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(auction_id): AppPath<i64>,
) -> AppResult<(StatusCode, Json<BidReceipt>)> {
    let cmd = BuyNowCommand {
        auction_id,
        buyer_id: user.id,
    };
    let receipt = handle_buy_now(cmd, &state.db_manager).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn my_bids(State(state): State<AppState>, AuthUser(user): AuthUser) -> AppResult<Json<Vec<BidWithAuction>>> {
    Ok(Json(query::handlers::get_user_bids(&state.db_manager, user.id, Utc::now()).await?))
}

pub async fn auction_bids(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    AppPath(auction_id): AppPath<i64>,
) -> AppResult<Json<Vec<AuctionBidEntry>>> {
    Ok(Json(query::handlers::get_auction_bid_history(&state.db_manager, auction_id).await?))
}

pub async fn my_auctions(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<MyAuctionEntry>>> {
    Ok(Json(query::handlers::get_my_auctions(&state.db_manager, user.id, Utc::now()).await?))
}
// endregion: --- Bidding

// region:    --- Bids
pub async fn bids_by_auction(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
) -> AppResult<Json<Vec<AuctionBidsSummary>>> {
    Ok(Json(query::handlers::get_bids_by_auction(&state.db_manager).await?))
}

pub async fn delete_selected_bids(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppJson(selected): AppJson<SelectedIds>,
) -> AppResult<StatusCode> {
    admin::delete_selected_bids(&state.db_manager, &selected.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_bid(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
    AppPath(bid_id): AppPath<i64>,
) -> AppResult<StatusCode> {
    admin::delete_bid(&state.db_manager, bid_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
// endregion: --- Bids
