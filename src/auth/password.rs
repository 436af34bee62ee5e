// パスワードハッシュ化と検証（bcrypt実装）

use crate::common::error::GateError;
use bcrypt::{hash, verify};

/// パスワードハッシュ化のコスト（12推奨、200-300ms）
const HASH_COST: u32 = 12;

/// パスワードをbcryptでハッシュ化
///
/// # Arguments
/// * `password` - ハッシュ化するパスワード
///
/// # Returns
/// * `Ok(String)` - bcryptハッシュ文字列（$2b$で始まる）
/// * `Err(GateError)` - ハッシュ化失敗
pub fn hash_password(password: &str) -> Result<String, GateError> {
    hash(password, HASH_COST)
        .map_err(|e| GateError::PasswordHash(format!("Failed to hash password: {}", e)))
}

/// パスワードを検証
///
/// 平文比較は行わない。ハッシュ側のソルトを使って再計算し比較する。
///
/// # Arguments
/// * `password` - 検証する平文パスワード
/// * `hash` - bcryptハッシュ文字列
///
/// # Returns
/// * `Ok(true)` - パスワード一致
/// * `Ok(false)` - パスワード不一致
/// * `Err(GateError)` - 検証失敗
pub fn verify_password(password: &str, hash: &str) -> Result<bool, GateError> {
    verify(password, hash)
        .map_err(|e| GateError::PasswordHash(format!("Failed to verify password: {}", e)))
}
