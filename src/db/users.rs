// ユーザーCRUD操作（Credential Store）

use crate::common::auth::User;
use crate::common::error::GateError;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// ユーザーを作成
///
/// username・emailはそれぞれUNIQUE制約で保護される。重複時は
/// どちらの項目が衝突したか分かるValidationエラーを返す。
///
/// # Arguments
/// * `pool` - データベース接続プール
/// * `username` - ユーザー名
/// * `email` - メールアドレス
/// * `full_name` - フルネーム
/// * `hashed_password` - bcryptハッシュ化されたパスワード
///
/// # Returns
/// * `Ok(User)` - 作成されたユーザー（is_active=true）
/// * `Err(GateError)` - 作成失敗（重複など）
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    full_name: &str,
    hashed_password: &str,
) -> Result<User, GateError> {
    let id = Uuid::new_v4();
    let created_at = Utc::now();

    sqlx::query(
        "INSERT INTO users (id, username, email, full_name, hashed_password, is_active, created_at)
         VALUES (?, ?, ?, ?, ?, 1, ?)",
    )
    .bind(id.to_string())
    .bind(username)
    .bind(email)
    .bind(full_name)
    .bind(hashed_password)
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await
    .map_err(|e| {
        let msg = e.to_string();
        if msg.contains("UNIQUE constraint failed: users.username") {
            GateError::Validation("Username already registered".to_string())
        } else if msg.contains("UNIQUE constraint failed: users.email") {
            GateError::Validation("Email already registered".to_string())
        } else {
            GateError::Database(format!("Failed to create user: {}", e))
        }
    })?;

    Ok(User {
        id,
        username: username.to_string(),
        email: email.to_string(),
        full_name: full_name.to_string(),
        hashed_password: hashed_password.to_string(),
        is_active: true,
        created_at,
    })
}

/// ユーザー名でユーザーを検索
///
/// # Returns
/// * `Ok(Some(User))` - ユーザーが見つかった
/// * `Ok(None)` - ユーザーが見つからなかった
/// * `Err(GateError)` - 検索失敗
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, GateError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, full_name, hashed_password, is_active, created_at
         FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .map_err(|e| GateError::Database(format!("Failed to find user: {}", e)))?;

    row.map(UserRow::into_user).transpose()
}

/// メールアドレスでユーザーを検索
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, GateError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, full_name, hashed_password, is_active, created_at
         FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| GateError::Database(format!("Failed to find user: {}", e)))?;

    row.map(UserRow::into_user).transpose()
}

/// アカウント有効フラグを更新
///
/// Auth Guardは解決結果をキャッシュしないため、無効化は
/// 直後の保護ルート呼び出しから反映される。
pub async fn set_active(pool: &SqlitePool, id: Uuid, is_active: bool) -> Result<(), GateError> {
    sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
        .bind(is_active as i32)
        .bind(id.to_string())
        .execute(pool)
        .await
        .map_err(|e| GateError::Database(format!("Failed to update is_active: {}", e)))?;

    Ok(())
}

// SQLiteからの行取得用の内部型
#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    full_name: String,
    hashed_password: String,
    is_active: i32,
    created_at: String,
}

impl UserRow {
    fn into_user(self) -> Result<User, GateError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| GateError::Database(format!("Invalid user id: {}", e)))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| GateError::Database(format!("Invalid created_at: {}", e)))?
            .with_timezone(&Utc);

        Ok(User {
            id,
            username: self.username,
            email: self.email,
            full_name: self.full_name,
            hashed_password: self.hashed_password,
            is_active: self.is_active != 0,
            created_at,
        })
    }
}
