use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// 경매 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Auction {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub year: i32,
    pub medium: String,
    pub dimensions: String,
    pub description: String,
    pub image: String,
    pub current_bid: Decimal,
    pub end_date: DateTime<Utc>,
    pub buy_now_price: Option<Decimal>,
}

// 입찰 모델 (경매/사용자 당 1건)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    #[serde(rename = "auction")]
    pub auction_id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

// 즉시 구매 전용 상품 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub year: i32,
    pub medium: String,
    pub dimensions: String,
    pub description: String,
    pub image: String,
    pub price: Decimal,
    #[serde(rename = "buyer")]
    pub buyer_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 입찰자 관점의 경매 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    Won,
    Ongoing,
    Ended,
}

// 경매 + 입찰자 관점 상태
#[derive(Debug, Serialize)]
pub struct AuctionWithStatus {
    #[serde(flatten)]
    pub auction: Auction,
    pub status: AuctionStatus,
}

// 내 입찰 목록 항목
#[derive(Debug, Serialize)]
pub struct BidWithAuction {
    pub id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub auction: AuctionWithStatus,
}

// 내 경매 목록 항목
#[derive(Debug, Serialize)]
pub struct MyAuctionEntry {
    pub id: i64,
    pub title: String,
    pub current_bid: Decimal,
    pub status: AuctionStatus,
    pub is_winner: bool,
    pub image: String,
}

// 경매별 입찰 이력 항목
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct AuctionBidEntry {
    pub bidder: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
}

// 입찰자 정보가 포함된 입찰
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BidWithBidder {
    pub id: i64,
    #[serde(rename = "auction")]
    pub auction_id: i64,
    #[serde(rename = "user")]
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    #[serde(skip)]
    pub auction_title: String,
}

// 경매별 최고 입찰 요약
#[derive(Debug, Serialize)]
pub struct AuctionBidsSummary {
    pub auction: String,
    pub highest_bid_user: String,
    pub bids: Vec<BidWithBidder>,
}

// region:    --- Inputs
/// 경매 생성 입력
#[derive(Debug, Deserialize, Validate)]
pub struct AuctionInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub artist: String,
    pub year: i32,
    #[validate(length(min = 1, max = 200))]
    pub medium: String,
    #[validate(length(min = 1, max = 200))]
    pub dimensions: String,
    pub description: String,
    pub image: Option<String>,
    #[validate(custom(function = "validate_non_negative"))]
    pub current_bid: Decimal,
    pub end_date: DateTime<Utc>,
    #[validate(custom(function = "validate_non_negative"))]
    pub buy_now_price: Option<Decimal>,
}

/// 경매 수정 입력 (PUT/PATCH 공용)
///
/// `buy_now_price` 는 명시적인 null 로 비울 수 있으며, 비워지면 기본값이 다시 적용된다.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AuctionPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub artist: Option<String>,
    pub year: Option<i32>,
    #[validate(length(min = 1, max = 200))]
    pub medium: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub dimensions: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[validate(custom(function = "validate_non_negative"))]
    pub current_bid: Option<Decimal>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "double_option")]
    pub buy_now_price: Option<Option<Decimal>>,
}

/// 상품 생성 입력
#[derive(Debug, Deserialize, Validate)]
pub struct ItemInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub artist: String,
    pub year: i32,
    #[validate(length(min = 1, max = 200))]
    pub medium: String,
    #[validate(length(min = 1, max = 200))]
    pub dimensions: String,
    pub description: String,
    pub image: Option<String>,
    #[validate(custom(function = "validate_non_negative"))]
    pub price: Decimal,
}

/// 상품 수정 입력
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ItemPatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub artist: Option<String>,
    pub year: Option<i32>,
    #[validate(length(min = 1, max = 200))]
    pub medium: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub dimensions: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[validate(custom(function = "validate_non_negative"))]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "double_option")]
    pub buyer: Option<Option<i64>>,
}

/// 선택 삭제 입력
#[derive(Debug, Deserialize)]
pub struct SelectedIds {
    #[serde(default)]
    pub ids: Vec<i64>,
}
// endregion: --- Inputs

pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("음수는 허용되지 않습니다.".into());
        return Err(err);
    }
    Ok(())
}

/// 필드 누락(None)과 명시적 null(Some(None))을 구분
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn negative_price_fails_validation() {
        assert!(validate_non_negative(&dec!(-0.01)).is_err());
        assert!(validate_non_negative(&dec!(0)).is_ok());
        assert!(validate_non_negative(&dec!(12.50)).is_ok());
    }

    #[test]
    fn patch_distinguishes_missing_and_null() {
        let missing: AuctionPatch = serde_json::from_str(r#"{"title": "Nowy"}"#).unwrap();
        assert!(missing.buy_now_price.is_none());

        let cleared: AuctionPatch = serde_json::from_str(r#"{"buy_now_price": null}"#).unwrap();
        assert_eq!(cleared.buy_now_price, Some(None));

        let set: AuctionPatch = serde_json::from_str(r#"{"buy_now_price": "450.00"}"#).unwrap();
        assert_eq!(set.buy_now_price, Some(Some(dec!(450.00))));
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&AuctionStatus::Won).unwrap(), "\"won\"");
        assert_eq!(
            serde_json::to_string(&AuctionStatus::Ongoing).unwrap(),
            "\"ongoing\""
        );
    }
}
