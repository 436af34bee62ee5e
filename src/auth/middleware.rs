// 認証ミドルウェア（Auth Guard）

use crate::common::auth::User;
use crate::common::error::GateError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::error::AppError;

/// 認証済みユーザー（リクエスト拡張データ経由でハンドラーへ渡す）
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Auth Guardミドルウェア
///
/// Authorizationヘッダーから "Bearer {token}" を抽出してJWT検証を行い、
/// サブジェクトをCredential Storeで解決して有効アカウントであることを
/// 確認する。結果はキャッシュしない（無効化フラグの陳腐化をゼロに保つ）。
///
/// # Arguments
/// * `State(state)` - アプリケーション状態（db_pool, jwt_secret）
/// * `request` - HTTPリクエスト
/// * `next` - 次のミドルウェア/ハンドラー
///
/// # Returns
/// * `Ok(Response)` - 認証成功、requestにCurrentUserを追加
/// * `Err(Response)` - 認証失敗、401 Unauthorized / 403 Forbidden
pub async fn require_user(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    // ボディを含むRequest全体をawait越しに借用しない（Sendを維持する）
    let user = resolve_user(&state, request.headers())
        .await
        .map_err(|e| AppError(e).into_response())?;

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

/// リクエストヘッダーを認証済みの有効なユーザーに解決する
async fn resolve_user(state: &AppState, headers: &HeaderMap) -> Result<User, GateError> {
    let token = crate::auth::bearer_token(headers).ok_or(GateError::MissingCredential)?;

    let claims = crate::auth::jwt::validate_jwt(token, &state.jwt_secret).map_err(|e| {
        tracing::warn!("JWT verification failed: {}", e);
        GateError::from(e)
    })?;

    let user = crate::db::users::find_by_username(&state.db_pool, &claims.sub)
        .await?
        .ok_or_else(|| GateError::UnknownSubject(claims.sub.clone()))?;

    if !user.is_active {
        return Err(GateError::AccountDisabled);
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware as axum_middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn create_test_state() -> AppState {
        let pool = crate::db::test_utils::test_db_pool().await;
        AppState::new(pool, crate::config::AuthConfig::for_tests())
    }

    fn build_guarded_app(state: AppState) -> Router {
        Router::new()
            .route("/guarded", get(|| async { "ok" }))
            .layer(axum_middleware::from_fn_with_state(state, require_user))
    }

    async fn seed_user(state: &AppState, username: &str, is_active: bool) {
        let hash = crate::auth::password::hash_password("password123").unwrap();
        let user = crate::db::users::create(
            &state.db_pool,
            username,
            &format!("{}@example.com", username),
            "Test User",
            &hash,
        )
        .await
        .unwrap();
        if !is_active {
            crate::db::users::set_active(&state.db_pool, user.id, false)
                .await
                .unwrap();
        }
    }

    async fn send(app: Router, auth_header: Option<String>) -> StatusCode {
        let mut builder = Request::builder().uri("/guarded");
        if let Some(value) = auth_header {
            builder = builder.header("authorization", value);
        }
        let response = app
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        response.status()
    }

    #[tokio::test]
    async fn test_missing_header_rejected_401() {
        let state = create_test_state().await;
        let app = build_guarded_app(state);
        assert_eq!(send(app, None).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_malformed_header_rejected_401() {
        let state = create_test_state().await;
        let app = build_guarded_app(state);
        assert_eq!(
            send(app, Some("Token abc".to_string())).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_valid_token_for_active_user_passes() {
        let state = create_test_state().await;
        seed_user(&state, "alice", true).await;
        let token = crate::auth::jwt::create_jwt("alice", 30, &state.jwt_secret).unwrap();
        let app = build_guarded_app(state);
        assert_eq!(
            send(app, Some(format!("Bearer {}", token))).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_unknown_subject_rejected_401() {
        let state = create_test_state().await;
        let token = crate::auth::jwt::create_jwt("ghost", 30, &state.jwt_secret).unwrap();
        let app = build_guarded_app(state);
        assert_eq!(
            send(app, Some(format!("Bearer {}", token))).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_disabled_user_rejected_403() {
        let state = create_test_state().await;
        seed_user(&state, "bob", false).await;
        let token = crate::auth::jwt::create_jwt("bob", 30, &state.jwt_secret).unwrap();
        let app = build_guarded_app(state);
        assert_eq!(
            send(app, Some(format!("Bearer {}", token))).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_disable_takes_effect_on_next_request() {
        // 解決結果はキャッシュしないため、無効化は直後のリクエストに反映される
        let state = create_test_state().await;
        seed_user(&state, "carol", true).await;
        let token = crate::auth::jwt::create_jwt("carol", 30, &state.jwt_secret).unwrap();

        let app = build_guarded_app(state.clone());
        assert_eq!(
            send(app.clone(), Some(format!("Bearer {}", token))).await,
            StatusCode::OK
        );

        let user = crate::db::users::find_by_username(&state.db_pool, "carol")
            .await
            .unwrap()
            .unwrap();
        crate::db::users::set_active(&state.db_pool, user.id, false)
            .await
            .unwrap();

        assert_eq!(
            send(app, Some(format!("Bearer {}", token))).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_guard_runs_on_spawned_task() {
        // tokio::spawnはSendなfutureを要求する。ガードのfutureが
        // リクエストボディの借用でSendを失っていないことの検証
        let state = create_test_state().await;
        seed_user(&state, "erin", true).await;
        let token = crate::auth::jwt::create_jwt("erin", 30, &state.jwt_secret).unwrap();
        let app = build_guarded_app(state);

        let handle =
            tokio::spawn(async move { send(app, Some(format!("Bearer {}", token))).await });
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_expired_token_rejected_401() {
        let state = create_test_state().await;
        seed_user(&state, "dave", true).await;
        let token = crate::auth::jwt::create_jwt("dave", -5, &state.jwt_secret).unwrap();
        let app = build_guarded_app(state);
        assert_eq!(
            send(app, Some(format!("Bearer {}", token))).await,
            StatusCode::UNAUTHORIZED
        );
    }
}
