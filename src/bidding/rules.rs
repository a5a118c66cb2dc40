/// 입찰 규칙 (순수 함수, 현재 시각은 호출자가 전달)
/// 1. 입찰 검증 및 종료 시간 연장
/// 2. 즉시 구매 검증
/// 3. 입찰자 관점 상태 계산
// region:    --- Imports
use super::model::{Auction, AuctionStatus};
use crate::error::AppError;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;
// endregion: --- Imports

// 종료 직전 입찰로 간주하는 구간 (분)
pub const ANTI_SNIPE_WINDOW_MINUTES: i64 = 5;
// 종료 직전 입찰 시 연장 시간 (분)
pub const ANTI_SNIPE_EXTENSION_MINUTES: i64 = 2;
// 즉시 구매가 미지정 시 현재가 대비 배수
pub const BUY_NOW_MULTIPLIER: Decimal = dec!(3);
// 금액 컬럼 NUMERIC(10,2) 의 상한과 소수 자릿수
pub const MAX_AMOUNT: Decimal = dec!(99999999.99);
pub const AMOUNT_SCALE: u32 = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BidRejection {
    #[error("입찰 금액은 소수점 둘째 자리까지, 99,999,999.99 이하만 허용됩니다.")]
    InvalidAmount,
    #[error("입찰 금액은 현재 가격보다 높아야 합니다.")]
    LowBid,
    #[error("경매가 이미 종료되었습니다.")]
    AlreadyEnded,
    #[error("즉시 구매가 불가능한 경매입니다.")]
    NoBuyNowPrice,
}

impl From<BidRejection> for AppError {
    fn from(rejection: BidRejection) -> Self {
        let code = match rejection {
            BidRejection::InvalidAmount => "INVALID_AMOUNT",
            BidRejection::LowBid => "LOW_BID",
            BidRejection::AlreadyEnded => "ALREADY_ENDED",
            BidRejection::NoBuyNowPrice => "NO_BUY_NOW_PRICE",
        };
        AppError::bad_request(rejection.to_string(), code)
    }
}

/// 즉시 구매가 기본값 (현재가의 3배)
pub fn default_buy_now_price(current_bid: Decimal) -> Decimal {
    (current_bid * BUY_NOW_MULTIPLIER).round_dp(2)
}

/// 지정값이 없으면 기본값 적용
pub fn resolve_buy_now_price(given: Option<Decimal>, current_bid: Decimal) -> Decimal {
    given.unwrap_or_else(|| default_buy_now_price(current_bid))
}

/// 저장 가능한 금액인지 (소수 둘째 자리 이하, 상한 이하)
pub fn is_storable_amount(amount: Decimal) -> bool {
    amount.normalize().scale() <= AMOUNT_SCALE && amount <= MAX_AMOUNT
}

pub fn has_ended(end_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > end_date
}

/// 종료 5분 전 이후의 입찰은 종료 시간을 정확히 2분 연장
pub fn anti_snipe_extension(end_date: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now >= end_date - Duration::minutes(ANTI_SNIPE_WINDOW_MINUTES) {
        end_date + Duration::minutes(ANTI_SNIPE_EXTENSION_MINUTES)
    } else {
        end_date
    }
}

/// 1. 입찰 검증
///
/// 통과 시 적용할 종료 시간을 반환한다.
pub fn validate_bid(
    auction: &Auction,
    amount: Decimal,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, BidRejection> {
    if !is_storable_amount(amount) {
        return Err(BidRejection::InvalidAmount);
    }
    if amount <= auction.current_bid {
        return Err(BidRejection::LowBid);
    }
    if has_ended(auction.end_date, now) {
        return Err(BidRejection::AlreadyEnded);
    }
    Ok(anti_snipe_extension(auction.end_date, now))
}

/// 2. 즉시 구매 검증
///
/// 통과 시 낙찰가(즉시 구매가)를 반환한다.
pub fn validate_buy_now(auction: &Auction, now: DateTime<Utc>) -> Result<Decimal, BidRejection> {
    if has_ended(auction.end_date, now) {
        return Err(BidRejection::AlreadyEnded);
    }
    match auction.buy_now_price {
        Some(price) if price > Decimal::ZERO => Ok(price),
        _ => Err(BidRejection::NoBuyNowPrice),
    }
}

/// 3. 입찰자 관점 상태
pub fn derive_status(
    bid_amount: Decimal,
    current_bid: Decimal,
    end_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AuctionStatus {
    if bid_amount == current_bid && end_date < now {
        AuctionStatus::Won
    } else if end_date > now {
        AuctionStatus::Ongoing
    } else {
        AuctionStatus::Ended
    }
}

/// 낙찰 여부 (상태가 won 인 경우)
pub fn is_winner(
    bid_amount: Decimal,
    current_bid: Decimal,
    end_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    derive_status(bid_amount, current_bid, end_date, now) == AuctionStatus::Won
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn auction(current_bid: Decimal, end_date: DateTime<Utc>) -> Auction {
        Auction {
            id: 1,
            title: "Pejzaż".into(),
            artist: "Anna".into(),
            year: 2021,
            medium: "olej".into(),
            dimensions: "50x70".into(),
            description: String::new(),
            image: "default.jpg".into(),
            current_bid,
            end_date,
            buy_now_price: Some(default_buy_now_price(current_bid)),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn bid_not_higher_than_current_is_rejected() {
        let a = auction(dec!(100.00), now() + Duration::hours(1));
        assert_eq!(validate_bid(&a, dec!(100.00), now()), Err(BidRejection::LowBid));
        assert_eq!(validate_bid(&a, dec!(99.99), now()), Err(BidRejection::LowBid));
        assert!(validate_bid(&a, dec!(100.01), now()).is_ok());
    }

    #[test]
    fn bid_with_more_than_two_decimals_is_rejected() {
        let a = auction(dec!(100.00), now() + Duration::hours(1));
        assert_eq!(
            validate_bid(&a, dec!(100.004), now()),
            Err(BidRejection::InvalidAmount)
        );
        // 뒤쪽 0 은 자릿수로 세지 않음
        assert!(validate_bid(&a, dec!(100.100), now()).is_ok());
    }

    #[test]
    fn bid_above_column_limit_is_rejected() {
        let a = auction(dec!(100.00), now() + Duration::hours(1));
        assert_eq!(
            validate_bid(&a, dec!(1000000000), now()),
            Err(BidRejection::InvalidAmount)
        );
        assert!(validate_bid(&a, MAX_AMOUNT, now()).is_ok());
        let err: AppError = BidRejection::InvalidAmount.into();
        assert_eq!(err.code(), "INVALID_AMOUNT");
    }

    #[test]
    fn bid_on_ended_auction_is_rejected() {
        let a = auction(dec!(100.00), now() - Duration::seconds(1));
        assert_eq!(
            validate_bid(&a, dec!(150.00), now()),
            Err(BidRejection::AlreadyEnded)
        );
    }

    #[test]
    fn late_bid_extends_end_date_by_two_minutes() {
        let end = now() + Duration::minutes(3);
        let a = auction(dec!(10.00), end);
        let new_end = validate_bid(&a, dec!(11.00), now()).unwrap();
        assert_eq!(new_end - end, Duration::minutes(2));

        // 경계: 정확히 5분 전
        let end = now() + Duration::minutes(5);
        assert_eq!(anti_snipe_extension(end, now()), end + Duration::minutes(2));
    }

    #[test]
    fn early_bid_keeps_end_date() {
        let end = now() + Duration::minutes(5) + Duration::seconds(1);
        let a = auction(dec!(10.00), end);
        assert_eq!(validate_bid(&a, dec!(11.00), now()).unwrap(), end);
    }

    #[test]
    fn buy_now_requires_price() {
        let mut a = auction(dec!(10.00), now() + Duration::hours(1));
        a.buy_now_price = None;
        assert_eq!(validate_buy_now(&a, now()), Err(BidRejection::NoBuyNowPrice));

        a.buy_now_price = Some(Decimal::ZERO);
        assert_eq!(validate_buy_now(&a, now()), Err(BidRejection::NoBuyNowPrice));

        a.buy_now_price = Some(dec!(30.00));
        assert_eq!(validate_buy_now(&a, now()), Ok(dec!(30.00)));
    }

    #[test]
    fn buy_now_on_ended_auction_is_rejected() {
        let a = auction(dec!(10.00), now() - Duration::minutes(1));
        assert_eq!(validate_buy_now(&a, now()), Err(BidRejection::AlreadyEnded));
    }

    #[test]
    fn buy_now_default_is_three_times_current_bid() {
        assert_eq!(default_buy_now_price(dec!(125.50)), dec!(376.50));
        assert_eq!(resolve_buy_now_price(None, dec!(10)), dec!(30));
        assert_eq!(resolve_buy_now_price(Some(dec!(55)), dec!(10)), dec!(55));
    }

    #[test]
    fn status_derivation() {
        let past = now() - Duration::minutes(1);
        let future = now() + Duration::minutes(1);
        assert_eq!(derive_status(dec!(50), dec!(50), past, now()), AuctionStatus::Won);
        assert_eq!(derive_status(dec!(40), dec!(50), past, now()), AuctionStatus::Ended);
        assert_eq!(
            derive_status(dec!(50), dec!(50), future, now()),
            AuctionStatus::Ongoing
        );
        assert!(is_winner(dec!(50), dec!(50), past, now()));
        assert!(!is_winner(dec!(50), dec!(50), future, now()));
    }

    #[test]
    fn rejection_maps_to_bad_request_code() {
        let err: AppError = BidRejection::LowBid.into();
        assert_eq!(err.code(), "LOW_BID");
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }
}
