// 認証モジュール

/// パスワードハッシュ化・検証（bcrypt）
pub mod password;

/// JWT生成・検証（jsonwebtoken）
pub mod jwt;

/// 認証ミドルウェア（Auth Guard）
pub mod middleware;

use axum::http::{header, HeaderMap};

/// Authorizationヘッダーから "Bearer {token}" のトークン部分を抽出する
///
/// ヘッダーが存在しない、またはBearer形式でない場合は`None`。
/// Auth Guardと監査ログの両方がこの関数を共有する。
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}
