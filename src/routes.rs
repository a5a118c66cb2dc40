/// 라우터 구성
// region:    --- Imports
use crate::handlers::{accounts, auctions, content, forms, items, users, watchers};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
// endregion: --- Imports

/// 출품 요청 첨부 이미지 2장을 고려한 본문 크기 제한 (20MB)
const BODY_LIMIT: usize = 1024 * 1024 * 20;

pub fn build_router(state: AppState) -> Router {
    // SPA 에서 호출하므로 모든 origin 허용
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/accounts", account_routes())
        .nest("/api", api_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}

fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route("/logout", post(accounts::logout))
        .route("/token", post(accounts::obtain_token))
        .route("/token/refresh", post(accounts::refresh_token))
        .route("/verify-email/:token", get(accounts::verify_email))
        .route("/resend-verification-email", post(accounts::resend_verification_email))
        .route("/verify-phone", post(accounts::verify_phone))
        .route("/resend-phone-code", post(accounts::resend_phone_code))
        .route("/check-email-verification", post(accounts::check_email_verification))
        .route("/reset-password", post(accounts::request_password_reset))
        .route("/reset-password/:token", post(accounts::confirm_password_reset))
        .route("/enforce-password-reset", post(accounts::enforce_password_reset))
        .route("/google/login", post(accounts::google_login))
        .route("/verify-recaptcha", post(accounts::verify_recaptcha))
        .route("/user", get(accounts::current_user))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // 경매
        .route("/auctions", get(auctions::list_auctions).post(auctions::create_auction))
        .route("/auctions/delete-selected", post(auctions::delete_selected_auctions))
        .route("/auctions/my-bids", get(auctions::my_bids))
        .route(
            "/auctions/:id",
            get(auctions::get_auction)
                .put(auctions::update_auction)
                .patch(auctions::update_auction)
                .delete(auctions::delete_auction),
        )
        .route("/auctions/:id/place-bid", post(auctions::place_bid))
        .route("/auctions/:id/buy-now", post(auctions::buy_now))
        .route("/auctions/:id/bids", get(auctions::auction_bids))
        .route("/my-auctions", get(auctions::my_auctions))
        // 입찰
        .route("/bids/by-auction", get(auctions::bids_by_auction))
        .route("/bids/delete-selected", post(auctions::delete_selected_bids))
        .route("/bids/:id", delete(auctions::delete_bid))
        // 상품
        .route("/items", get(items::list_items).post(items::create_item))
        .route("/items/delete-selected", post(items::delete_selected_items))
        .route(
            "/items/:id",
            get(items::get_item)
                .put(items::update_item)
                .patch(items::update_item)
                .delete(items::delete_item),
        )
        .route("/items/:id/buy-now", post(items::buy_item))
        // 관심 목록
        .route(
            "/auction-watchers",
            get(watchers::list_watchers).post(watchers::create_watcher),
        )
        .route("/auction-watchers/search", get(watchers::search_watchers))
        .route("/auction-watchers/check-notification", get(watchers::check_notification))
        .route("/auction-watchers/watchers-for-auction", get(watchers::watchers_for_auction))
        .route(
            "/auction-watchers/:id",
            get(watchers::get_watcher)
                .put(watchers::update_watcher)
                .patch(watchers::update_watcher)
                .delete(watchers::delete_watcher),
        )
        // 콘텐츠
        .route("/sections", get(content::list_sections).post(content::create_section))
        .route("/get_sections", get(content::list_sections))
        .route(
            "/sections/:id",
            get(content::get_section)
                .put(content::update_section)
                .patch(content::update_section)
                .delete(content::delete_section),
        )
        .route("/categories", get(content::list_categories).post(content::create_category))
        .route(
            "/gallery-items",
            get(content::list_gallery_items).post(content::create_gallery_item),
        )
        .route(
            "/gallery-items/:id",
            get(content::get_gallery_item)
                .put(content::update_gallery_item)
                .patch(content::update_gallery_item)
                .delete(content::delete_gallery_item),
        )
        .route("/exhibitions", get(content::list_exhibitions).post(content::create_exhibition))
        .route(
            "/exhibitions/:id",
            get(content::get_exhibition)
                .put(content::update_exhibition)
                .patch(content::update_exhibition)
                .delete(content::delete_exhibition),
        )
        .route("/faq", get(content::list_faqs).post(content::create_faq))
        .route(
            "/faq/:id",
            get(content::get_faq)
                .put(content::update_faq)
                .patch(content::update_faq)
                .delete(content::delete_faq),
        )
        // 폼
        .route("/send-email", post(forms::send_contact_email))
        .route("/send-auction-request", post(forms::send_auction_request))
}
