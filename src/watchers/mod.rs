/// 경매 관심 목록 및 알림 발송 기록
pub mod model;
pub mod queries;
pub mod store;
