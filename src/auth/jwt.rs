// JWT生成と検証（jsonwebtoken実装）

use crate::common::auth::Claims;
use crate::common::error::GateError;
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

/// トークン検証エラー
///
/// 失敗モードを呼び出し側で区別できるよう分類する。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// 署名が一致しない（改ざん・偽造）
    #[error("token signature is invalid")]
    InvalidSignature,
    /// 有効期限切れ
    #[error("token has expired")]
    Expired,
    /// トークンとして解釈できない
    #[error("token is malformed")]
    Malformed,
}

/// JWTトークンを生成
///
/// # Arguments
/// * `subject` - サブジェクト（ユーザー名）
/// * `ttl_minutes` - 有効期限（分）
/// * `secret` - JWTシークレットキー
///
/// # Returns
/// * `Ok(String)` - JWTトークン（3つのドット区切り部分）
/// * `Err(GateError)` - 生成失敗
pub fn create_jwt(subject: &str, ttl_minutes: i64, secret: &str) -> Result<String, GateError> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(chrono::Duration::minutes(ttl_minutes))
        .ok_or_else(|| GateError::Internal("Failed to calculate expiration time".to_string()))?;

    let claims = Claims {
        sub: subject.to_string(),
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| GateError::Internal(format!("Failed to create JWT: {}", e)))
}

/// JWTトークンを検証
///
/// 署名整合性と有効期限を確認し、クレームを返す。
///
/// # Arguments
/// * `token` - 検証するJWTトークン
/// * `secret` - JWTシークレットキー
///
/// # Returns
/// * `Ok(Claims)` - 検証済みクレーム
/// * `Err(TokenError)` - 検証失敗（署名不一致、期限切れ、形式不正）
pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    // expは厳密比較。期限切れトークンに猶予を与えない
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })
}
