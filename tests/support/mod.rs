//! 統合テスト用のユーティリティ

use authgate::audit::types::{ApiLogEntry, ApiLogFilter};
use authgate::config::AuthConfig;
use authgate::db::api_logs::ApiLogStorage;
use authgate::AppState;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use sqlx::sqlite::SqlitePoolOptions;
use std::time::Duration;
use tower::ServiceExt;

/// 統合テスト用のJWT秘密鍵
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// インメモリDBでアプリケーション状態を構築する
#[allow(dead_code)]
pub async fn test_state() -> AppState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("failed to create in-memory database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    AppState::new(
        pool,
        AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            token_ttl_minutes: 30,
        },
    )
}

/// テスト用のRouterと状態を構築する
#[allow(dead_code)]
pub async fn test_app() -> (Router, AppState) {
    let state = test_state().await;
    let app = authgate::api::create_app(state.clone());
    (app, state)
}

/// POST /register を実行する
#[allow(dead_code)]
pub async fn register(
    app: &Router,
    username: &str,
    email: &str,
    full_name: &str,
    password: &str,
) -> Response<Body> {
    let body = serde_json::json!({
        "username": username,
        "email": email,
        "full_name": full_name,
        "password": password,
    });
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// POST /token を実行する（フォームエンコード）
#[allow(dead_code)]
pub async fn request_token(app: &Router, username: &str, password: &str) -> Response<Body> {
    let form = format!("username={}&password={}", username, password);
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/token")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// 登録とトークン取得をまとめて行い、アクセストークンを返す
#[allow(dead_code)]
pub async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let response = register(
        app,
        username,
        &format!("{}@example.com", username),
        &format!("{} Example", username),
        password,
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let response = request_token(app, username, password).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// Bearerトークン付きでGETリクエストを実行する
#[allow(dead_code)]
pub async fn get_with_bearer(app: &Router, uri: &str, token: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

/// 認証ヘッダーなしでGETリクエストを実行する
#[allow(dead_code)]
pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// レスポンスボディをJSONとして読み出す
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// 監査ログが指定件数に達するまで待機して返す
///
/// ライターは非同期にコミットするため、件数が揃うまでポーリングする。
#[allow(dead_code)]
pub async fn wait_for_logs(storage: &ApiLogStorage, expected: usize) -> Vec<ApiLogEntry> {
    for _ in 0..50 {
        let entries = storage
            .query(&ApiLogFilter::default())
            .await
            .expect("failed to query audit logs");
        if entries.len() >= expected {
            return entries;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("audit log did not reach {} entries in time", expected);
}
