//! 認証APIハンドラー
//!
//! ユーザー登録とパスワード認証によるトークン発行。
//! 認証失敗時はユーザーの存在有無に関わらず同一のレスポンスを
//! 返し、ユーザー名の列挙を防ぐ。

use crate::api::error::{ApiResult, AppError};
use crate::auth::{jwt, password};
use crate::common::auth::UserPublic;
use crate::common::error::GateError;
use crate::{db, AppState};
use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};

/// ユーザー登録リクエスト
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// ユーザー名（一意）
    pub username: String,
    /// メールアドレス（一意）
    pub email: String,
    /// 表示名
    pub full_name: String,
    /// 平文パスワード（保存前にハッシュ化される）
    pub password: String,
}

/// トークン発行リクエスト（フォームエンコード）
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    /// ユーザー名
    pub username: String,
    /// 平文パスワード
    pub password: String,
}

/// トークン発行レスポンス
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// 署名済みアクセストークン
    pub access_token: String,
    /// トークン種別（常に"bearer"）
    pub token_type: String,
}

/// POST /register - ユーザー登録
///
/// ユーザー名・メールアドレスの重複は400を返す。レスポンスに
/// パスワードハッシュは含まれない。
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Json<UserPublic>> {
    if db::users::find_by_username(&state.db_pool, &request.username)
        .await?
        .is_some()
    {
        return Err(AppError(GateError::Validation(
            "Username already registered".to_string(),
        )));
    }
    if db::users::find_by_email(&state.db_pool, &request.email)
        .await?
        .is_some()
    {
        return Err(AppError(GateError::Validation(
            "Email already registered".to_string(),
        )));
    }

    let hashed = password::hash_password(&request.password)?;
    let user = db::users::create(
        &state.db_pool,
        &request.username,
        &request.email,
        &request.full_name,
        &hashed,
    )
    .await?;

    tracing::info!("Registered user: {}", user.username);
    Ok(Json(user.to_public()))
}

/// POST /token - パスワード認証によるトークン発行
///
/// OAuth2パスワードフロー互換のフォームを受け付ける。未知の
/// ユーザーとパスワード不一致は区別できない401を返す。
pub async fn token(
    State(state): State<AppState>,
    Form(request): Form<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = db::users::find_by_username(&state.db_pool, &request.username).await?;

    let user = match user {
        Some(user) if password::verify_password(&request.password, &user.hashed_password)? => user,
        _ => {
            tracing::warn!("Failed login attempt for username: {}", request.username);
            return Err(AppError(GateError::Authentication(
                "Incorrect username or password".to_string(),
            )));
        }
    };

    let access_token = jwt::create_jwt(&user.username, state.token_ttl_minutes, &state.jwt_secret)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
