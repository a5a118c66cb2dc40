// region:    --- Watchers
pub const LIST_WATCHERS: &str = r#"
    SELECT id, auction_id, user_id, notify_via_email
    FROM auction_watchers
    ORDER BY id
    LIMIT $1 OFFSET $2
"#;

pub const COUNT_WATCHERS: &str = "SELECT COUNT(*) FROM auction_watchers";

pub const GET_WATCHER: &str =
    "SELECT id, auction_id, user_id, notify_via_email FROM auction_watchers WHERE id = $1";

/// 경매/사용자 당 1건 유지
pub const UPSERT_WATCHER: &str = r#"
    INSERT INTO auction_watchers (auction_id, user_id, notify_via_email)
    VALUES ($1, $2, $3)
    ON CONFLICT (auction_id, user_id)
    DO UPDATE SET notify_via_email = EXCLUDED.notify_via_email
    RETURNING id, auction_id, user_id, notify_via_email
"#;

pub const UPDATE_WATCHER: &str = r#"
    UPDATE auction_watchers
    SET auction_id = COALESCE($1, auction_id),
        notify_via_email = COALESCE($2, notify_via_email)
    WHERE id = $3
    RETURNING id, auction_id, user_id, notify_via_email
"#;

pub const DELETE_WATCHER: &str = "DELETE FROM auction_watchers WHERE id = $1";

pub const GET_WATCHERS_BY_USER: &str = r#"
    SELECT id, auction_id, user_id, notify_via_email
    FROM auction_watchers
    WHERE user_id = $1
    ORDER BY id
"#;

/// 사용자명 부분 일치 (대소문자 무시)
pub const SEARCH_WATCHERS_BY_USERNAME: &str = r#"
    SELECT w.id, w.auction_id, w.user_id, w.notify_via_email
    FROM auction_watchers w
    JOIN users u ON u.id = w.user_id
    WHERE u.username ILIKE '%' || $1 || '%'
    ORDER BY w.id
"#;

pub const GET_WATCHER_FOR_USER: &str = r#"
    SELECT id, auction_id, user_id, notify_via_email
    FROM auction_watchers
    WHERE auction_id = $1 AND user_id = $2
"#;

pub const GET_WATCHER_USERNAMES: &str = r#"
    SELECT u.username, w.notify_via_email
    FROM auction_watchers w
    JOIN users u ON u.id = w.user_id
    WHERE w.auction_id = $1
    ORDER BY w.id
"#;

/// 알림 대상 후보
pub const GET_WATCHER_CONTACTS: &str = r#"
    SELECT w.user_id, u.email, w.notify_via_email
    FROM auction_watchers w
    JOIN users u ON u.id = w.user_id
    WHERE w.auction_id = $1
"#;

/// 종료된 경매의 관심 등록 삭제
pub const DELETE_WATCHERS_OF_ENDED: &str = r#"
    DELETE FROM auction_watchers w
    USING auctions a
    WHERE a.id = w.auction_id AND a.end_date <= $1
"#;
// endregion: --- Watchers

// region:    --- Notification Logs
/// 최근 발송이 없을 때만 발송 시각을 기록 (기록된 경우에만 행 반환)
pub const CLAIM_NOTIFICATION_SLOT: &str = r#"
    INSERT INTO notification_logs (user_email, auction_id, last_notified_at)
    VALUES ($1, $2, $3)
    ON CONFLICT (user_email, auction_id)
    DO UPDATE SET last_notified_at = EXCLUDED.last_notified_at
    WHERE notification_logs.last_notified_at < $4
    RETURNING id
"#;

/// 종료된 경매의 알림 기록 삭제
pub const DELETE_LOGS_OF_ENDED: &str = r#"
    DELETE FROM notification_logs n
    USING auctions a
    WHERE a.id = n.auction_id AND a.end_date <= $1
"#;
// endregion: --- Notification Logs
