//! REST APIハンドラー
//!
//! ルーターの組み立て。保護ルートはAuth Guardの内側、
//! 監査ミドルウェアは全ルートを包む最外層に置く。

use crate::AppState;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

/// APIエラーレスポンス型
pub mod error;

/// 認証API（登録・トークン発行）
pub mod auth;

/// ユーザーAPI（本人情報・保護ルート）
pub mod users;

/// 監査ログAPI
pub mod logs;

/// アプリケーションのRouterを構築する
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/users/me", get(users::me))
        .route("/protected", get(users::protected))
        .route("/logs/", get(logs::list_logs))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::auth::middleware::require_user,
        ));

    Router::new()
        .route("/", get(root))
        .route("/register", post(auth::register))
        .route("/token", post(auth::token))
        .merge(protected)
        // 認証失敗を含む全リクエストを記録するため最外層に置く
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            crate::audit::middleware::audit_middleware,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET / - 案内メッセージ
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to the Authgate API"
    }))
}
