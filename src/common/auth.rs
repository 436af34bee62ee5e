//! 認証関連のデータモデル

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ユーザー
///
/// Credential Storeが唯一の所有者。登録後は本システムの範囲では不変。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// ユーザーID
    pub id: Uuid,
    /// ユーザー名（グローバル一意）
    pub username: String,
    /// メールアドレス（グローバル一意）
    pub email: String,
    /// フルネーム
    pub full_name: String,
    /// パスワードハッシュ（bcrypt）
    pub hashed_password: String,
    /// アカウント有効フラグ
    pub is_active: bool,
    /// 作成日時
    pub created_at: DateTime<Utc>,
}

impl User {
    /// クライアント向けの公開ビューを生成する（ハッシュは含めない）
    pub fn to_public(&self) -> UserPublic {
        UserPublic {
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            disabled: !self.is_active,
        }
    }
}

/// ユーザーの公開ビュー（レスポンス用）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    /// ユーザー名
    pub username: String,
    /// メールアドレス
    pub email: String,
    /// フルネーム
    pub full_name: String,
    /// アカウント無効フラグ（is_activeの反転）
    pub disabled: bool,
}

/// JWTクレーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// サブジェクト（ユーザー名）
    pub sub: String,
    /// 発行時刻（UNIX秒）
    pub iat: usize,
    /// 有効期限（UNIX秒）
    pub exp: usize,
}
