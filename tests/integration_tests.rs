use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use gallery_auction::accounts::token::TokenType;
use gallery_auction::config::Config;
use gallery_auction::database::DatabaseManager;
use gallery_auction::routes::build_router;
use gallery_auction::state::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

/// 연결을 미루는 풀로 앱 구성 (DB 접근 전에 끝나는 경로 검증용)
fn lazy_app() -> (Router, AppState) {
    let mut config = Config::defaults().expect("기본 설정");
    config.security.jwt_secret = "integration-secret".into();
    let db_manager = DatabaseManager::connect_lazy(&config.database).expect("lazy pool");
    let (state, _receiver) = AppState::build(config, db_manager).expect("앱 상태");
    (build_router(state.clone()), state)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// region:    --- Authentication
#[tokio::test]
async fn current_user_requires_token() {
    let (app, _) = lazy_app();
    let request = Request::get("/accounts/user").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn forged_token_is_rejected() {
    let (app, _) = lazy_app();
    let request = Request::get("/api/my-auctions")
        .header(header::AUTHORIZATION, "Bearer not.a.jwt")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_token_cannot_authenticate_requests() {
    let (app, state) = lazy_app();
    let refresh = state.tokens.issue(1, TokenType::Refresh).unwrap();
    let request = Request::get("/accounts/user")
        .header(header::AUTHORIZATION, format!("Bearer {}", refresh))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn place_bid_requires_login() {
    let (app, _) = lazy_app();
    let request = json_request(Method::POST, "/api/auctions/1/place-bid", json!({ "bid": "150.00" }));
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn staff_routes_require_login() {
    let (app, _) = lazy_app();
    let request = json_request(Method::POST, "/api/auctions/delete-selected", json!({ "ids": [1] }));
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_refresh_token_is_unauthorized() {
    let (app, _) = lazy_app();
    let request = json_request(Method::POST, "/accounts/token/refresh", json!({ "refresh": "garbage" }));
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
// endregion: --- Authentication

// region:    --- Validation
#[tokio::test]
async fn register_rejects_mismatched_passwords() {
    let (app, _) = lazy_app();
    let request = json_request(
        Method::POST,
        "/accounts/register",
        json!({
            "email": "ala@example.com",
            "username": "ala",
            "password": "password123",
            "confirm_password": "password321",
            "phone_number": "+48123456789"
        }),
    );
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION");
    assert!(body["fields"].get("confirm_password").is_some());
}

#[tokio::test]
async fn register_rejects_phone_without_country_code() {
    let (app, _) = lazy_app();
    let request = json_request(
        Method::POST,
        "/accounts/register",
        json!({
            "email": "ala@example.com",
            "username": "ala",
            "password": "password123",
            "confirm_password": "password123",
            "phone_number": "48123456789"
        }),
    );
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"].get("phone_number").is_some());
}

#[tokio::test]
async fn register_with_missing_fields_is_bad_request() {
    let (app, _) = lazy_app();
    let request = json_request(
        Method::POST,
        "/accounts/register",
        json!({ "email": "ala@example.com", "username": "ala", "password": "password123" }),
    );
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_BODY");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn contact_form_without_content_type_is_bad_request() {
    let (app, _) = lazy_app();
    let request = Request::post("/api/send-email")
        .body(Body::from(r#"{"firstName":"Anna"}"#))
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_BODY");
}

#[tokio::test]
async fn non_numeric_auction_id_is_bad_request() {
    let (app, _) = lazy_app();
    let request = Request::get("/api/auctions/abc").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_PATH");
}

#[tokio::test]
async fn malformed_verification_token_is_bad_request() {
    let (app, _) = lazy_app();
    let request = Request::get("/accounts/verify-email/not-a-token").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn recaptcha_response_is_required() {
    let (app, _) = lazy_app();
    let request = json_request(Method::POST, "/accounts/verify-recaptcha", json!({}));
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_RECAPTCHA");
}

#[tokio::test]
async fn google_login_requires_token() {
    let (app, _) = lazy_app();
    let request = json_request(Method::POST, "/accounts/google/login", json!({}));
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "TOKEN_REQUIRED");
}

#[tokio::test]
async fn contact_form_is_validated() {
    let (app, _) = lazy_app();
    let request = json_request(
        Method::POST,
        "/api/send-email",
        json!({ "firstName": "Al", "lastName": "Nowak", "email": "not-an-email", "text": "Hi" }),
    );
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"].get("email").is_some());
}

#[tokio::test]
async fn valid_contact_form_is_sent() {
    let (app, _) = lazy_app();
    let request = json_request(
        Method::POST,
        "/api/send-email",
        json!({ "firstName": "Anna", "lastName": "Nowak", "email": "anna@example.com", "text": "Dzien dobry" }),
    );
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (app, _) = lazy_app();
    let request = Request::get("/api/does-not-exist").body(Body::empty()).unwrap();
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
// endregion: --- Validation

// region:    --- Database
// DATABASE_URL(GALLERY_DATABASE__URL) 이 설정된 환경에서만 실행
async fn db_app() -> (Router, AppState) {
    let mut config = Config::load().expect("설정");
    config.database.recreate_on_start = true;
    let db_manager = DatabaseManager::new(&config.database).await.expect("db");
    db_manager.initialize_database().await.expect("스키마");
    let (state, _receiver) = AppState::build(config, db_manager).expect("앱 상태");
    (build_router(state.clone()), state)
}

async fn insert_user(state: &AppState, email: &str, is_staff: bool) -> (i64, String) {
    let hash = state.passwords.hash("password123").unwrap();
    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (email, username, password_hash, is_staff, is_verified, is_phone_verified, phone_number) \
         VALUES ($1, $1, $2, $3, TRUE, TRUE, '+48123456789') RETURNING id",
    )
    .bind(email)
    .bind(hash)
    .bind(is_staff)
    .fetch_one(state.db_manager.pool())
    .await
    .unwrap();
    let token = state.tokens.issue(user_id, TokenType::Access).unwrap();
    (user_id, token)
}

fn authed(method: Method, uri: &str, token: &str, body: Value) -> Request<Body> {
    let mut request = json_request(method, uri, body);
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", token).parse().unwrap(),
    );
    request
}

#[tokio::test]
#[ignore]
async fn auction_bidding_flow() {
    let (app, state) = db_app().await;
    let (_, staff) = insert_user(&state, "staff@example.com", true).await;
    let (_, bidder) = insert_user(&state, "bidder@example.com", false).await;

    // 종료 3분 전 경매 생성
    let end_date = Utc::now() + Duration::minutes(3);
    let (status, auction) = send(
        app.clone(),
        authed(
            Method::POST,
            "/api/auctions",
            &staff,
            json!({
                "title": "Nokturn", "artist": "Piotr", "year": 2018, "medium": "grafika",
                "dimensions": "20x30", "description": "", "current_bid": "100.00",
                "end_date": end_date
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(auction["buy_now_price"], "300.00");
    let id = auction["id"].as_i64().unwrap();

    // 현재가 이하 입찰 거절
    let (status, body) = send(
        app.clone(),
        authed(Method::POST, &format!("/api/auctions/{}/place-bid", id), &bidder, json!({ "bid": "100.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "LOW_BID");

    // 컬럼에 저장할 수 없는 금액 거절
    for bid in ["100.004", "1000000000"] {
        let (status, body) = send(
            app.clone(),
            authed(Method::POST, &format!("/api/auctions/{}/place-bid", id), &bidder, json!({ "bid": bid })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_AMOUNT");
    }

    // 마감 직전 입찰은 종료 시각 2분 연장
    let (status, receipt) = send(
        app.clone(),
        authed(Method::POST, &format!("/api/auctions/{}/place-bid", id), &bidder, json!({ "bid": "150.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let extended: chrono::DateTime<Utc> = serde_json::from_value(receipt["end_date"].clone()).unwrap();
    let original: chrono::DateTime<Utc> = serde_json::from_value(auction["end_date"].clone()).unwrap();
    assert_eq!(extended - original, Duration::minutes(2));

    // 즉시 구매 후 종료
    let (status, receipt) = send(
        app.clone(),
        authed(Method::POST, &format!("/api/auctions/{}/buy-now", id), &bidder, json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(receipt["current_bid"], "300.00");

    let (status, body) = send(
        app,
        authed(Method::POST, &format!("/api/auctions/{}/place-bid", id), &bidder, json!({ "bid": "400.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ALREADY_ENDED");
}

#[tokio::test]
#[ignore]
async fn watchers_for_auction_checks_param_before_staff() {
    let (app, state) = db_app().await;
    let (_, user) = insert_user(&state, "watcher@example.com", false).await;

    let request = authed(Method::GET, "/api/auction-watchers/watchers-for-auction", &user, json!({}));
    let (status, _) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = authed(
        Method::GET,
        "/api/auction-watchers/watchers-for-auction?auction_id=1",
        &user,
        json!({}),
    );
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
// endregion: --- Database
