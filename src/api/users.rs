//! ユーザーAPIハンドラー
//!
//! いずれもAuth Guardの内側にあり、`CurrentUser`拡張は
//! ガードが必ず挿入している。

use crate::auth::middleware::CurrentUser;
use crate::common::auth::UserPublic;
use axum::{Extension, Json};
use serde_json::json;

/// GET /users/me - 認証済みユーザー本人の公開プロフィール
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserPublic> {
    Json(user.to_public())
}

/// GET /protected - 認証確認用のサンプル保護ルート
pub async fn protected(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<serde_json::Value> {
    Json(json!({
        "message": format!("Hello {}, this is a protected route!", user.full_name)
    }))
}
