// region:    --- Auctions
/// 경매 목록 조회
pub const LIST_AUCTIONS: &str = r#"
    SELECT id, title, artist, year, medium, dimensions, description, image,
           current_bid, end_date, buy_now_price
    FROM auctions
    ORDER BY id
    LIMIT $1 OFFSET $2
"#;

pub const COUNT_AUCTIONS: &str = "SELECT COUNT(*) FROM auctions";

/// 경매 조회
pub const GET_AUCTION: &str = r#"
    SELECT id, title, artist, year, medium, dimensions, description, image,
           current_bid, end_date, buy_now_price
    FROM auctions
    WHERE id = $1
"#;

/// 입찰 처리용 경매 행 잠금
pub const LOCK_AUCTION: &str = r#"
    SELECT id, title, artist, year, medium, dimensions, description, image,
           current_bid, end_date, buy_now_price
    FROM auctions
    WHERE id = $1
    FOR UPDATE
"#;

pub const INSERT_AUCTION: &str = r#"
    INSERT INTO auctions (title, artist, year, medium, dimensions, description, image,
                          current_bid, end_date, buy_now_price)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
    RETURNING id, title, artist, year, medium, dimensions, description, image,
              current_bid, end_date, buy_now_price
"#;

pub const UPDATE_AUCTION: &str = r#"
    UPDATE auctions
    SET title = $1, artist = $2, year = $3, medium = $4, dimensions = $5,
        description = $6, image = $7, current_bid = $8, end_date = $9, buy_now_price = $10
    WHERE id = $11
    RETURNING id, title, artist, year, medium, dimensions, description, image,
              current_bid, end_date, buy_now_price
"#;

/// 입찰/즉시 구매 후 현재가 및 종료 시간 갱신
pub const UPDATE_AUCTION_AFTER_BID: &str =
    "UPDATE auctions SET current_bid = $1, end_date = $2 WHERE id = $3";

pub const DELETE_AUCTION: &str = "DELETE FROM auctions WHERE id = $1";

pub const DELETE_AUCTIONS_BY_IDS: &str = "DELETE FROM auctions WHERE id = ANY($1)";

/// 즉시 구매가가 비어 있는 경매에 기본값 채우기
pub const BACKFILL_BUY_NOW_PRICE: &str = r#"
    UPDATE auctions
    SET buy_now_price = ROUND(current_bid * $1, 2)
    WHERE buy_now_price IS NULL
"#;
// endregion: --- Auctions

// region:    --- Bids
/// 경매/사용자 당 1건 유지
pub const UPSERT_BID: &str = r#"
    INSERT INTO bids (auction_id, user_id, amount, date)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (auction_id, user_id)
    DO UPDATE SET amount = EXCLUDED.amount, date = EXCLUDED.date
"#;

/// 사용자 입찰 + 경매 정보
pub const GET_USER_BIDS_WITH_AUCTION: &str = r#"
    SELECT b.id AS bid_id, b.user_id, b.amount, b.date AS bid_date,
           a.id, a.title, a.artist, a.year, a.medium, a.dimensions, a.description, a.image,
           a.current_bid, a.end_date, a.buy_now_price
    FROM bids b
    JOIN auctions a ON a.id = b.auction_id
    WHERE b.user_id = $1
    ORDER BY b.date DESC
"#;

/// 경매 입찰 이력 (금액 내림차순)
pub const GET_AUCTION_BID_HISTORY: &str = r#"
    SELECT u.username AS bidder, b.amount, b.date
    FROM bids b
    JOIN users u ON u.id = b.user_id
    WHERE b.auction_id = $1
    ORDER BY b.amount DESC
"#;

/// 입찰이 있는 모든 경매의 입찰 (경매별, 금액 내림차순)
pub const GET_BIDS_WITH_BIDDERS: &str = r#"
    SELECT b.id, b.auction_id, b.user_id, u.username, u.email, b.amount, b.date,
           a.title AS auction_title
    FROM bids b
    JOIN users u ON u.id = b.user_id
    JOIN auctions a ON a.id = b.auction_id
    ORDER BY b.auction_id, b.amount DESC, b.date
"#;

pub const DELETE_BID: &str = "DELETE FROM bids WHERE id = $1";

pub const DELETE_BIDS_BY_IDS: &str = "DELETE FROM bids WHERE id = ANY($1)";
// endregion: --- Bids

// region:    --- Items
/// 상품 목록 조회
pub const LIST_ITEMS: &str = r#"
    SELECT id, title, artist, year, medium, dimensions, description, image,
           price, buyer_id, created_at, updated_at
    FROM items
    ORDER BY id
    LIMIT $1 OFFSET $2
"#;

pub const COUNT_ITEMS: &str = "SELECT COUNT(*) FROM items";

/// 상품 조회
pub const GET_ITEM: &str = r#"
    SELECT id, title, artist, year, medium, dimensions, description, image,
           price, buyer_id, created_at, updated_at
    FROM items
    WHERE id = $1
"#;

pub const INSERT_ITEM: &str = r#"
    INSERT INTO items (title, artist, year, medium, dimensions, description, image, price)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
    RETURNING id, title, artist, year, medium, dimensions, description, image,
              price, buyer_id, created_at, updated_at
"#;

/// 전달된 필드만 갱신 ($9 가 true 일 때 buyer_id 를 $10 으로 교체)
pub const UPDATE_ITEM: &str = r#"
    UPDATE items
    SET title = COALESCE($1, title),
        artist = COALESCE($2, artist),
        year = COALESCE($3, year),
        medium = COALESCE($4, medium),
        dimensions = COALESCE($5, dimensions),
        description = COALESCE($6, description),
        image = COALESCE($7, image),
        price = COALESCE($8, price),
        buyer_id = CASE WHEN $9 THEN $10 ELSE buyer_id END,
        updated_at = NOW()
    WHERE id = $11
    RETURNING id, title, artist, year, medium, dimensions, description, image,
              price, buyer_id, created_at, updated_at
"#;

/// 구매자가 없을 때만 구매자 지정
pub const CLAIM_ITEM: &str = r#"
    UPDATE items
    SET buyer_id = $1, updated_at = NOW()
    WHERE id = $2 AND buyer_id IS NULL
    RETURNING id, title, artist, year, medium, dimensions, description, image,
              price, buyer_id, created_at, updated_at
"#;

pub const DELETE_ITEM: &str = "DELETE FROM items WHERE id = $1";

pub const DELETE_ITEMS_BY_IDS: &str = "DELETE FROM items WHERE id = ANY($1)";
// endregion: --- Items

// region:    --- Notification
/// 가장 최근 입찰자
pub const GET_LATEST_BIDDER: &str = r#"
    SELECT user_id
    FROM bids
    WHERE auction_id = $1
    ORDER BY date DESC
    LIMIT 1
"#;
// endregion: --- Notification
