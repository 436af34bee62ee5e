//! Authgate Server
//!
//! 認証ゲート付きHTTP API。ユーザー登録・トークン発行・保護ルートと、
//! 全リクエストを非同期に記録する監査ログを提供する。

#![warn(missing_docs)]

/// 共通型定義
pub mod common;

/// REST APIハンドラー
pub mod api;

/// 認証・認可機能
pub mod auth;

/// 監査ログシステム
pub mod audit;

/// データベースアクセス
pub mod db;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// ロギング初期化ユーティリティ
pub mod logging;

/// サーバー起動・シャットダウンハンドリング
pub mod server;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// データベース接続プール
    pub db_pool: sqlx::SqlitePool,
    /// JWT署名秘密鍵（起動後は読み取り専用、ログ出力禁止）
    pub jwt_secret: String,
    /// アクセストークンの有効期限（分）
    pub token_ttl_minutes: i64,
    /// 監査ログライター
    pub audit_writer: audit::writer::ApiLogWriter,
    /// 監査ログストレージ
    pub audit_storage: std::sync::Arc<db::api_logs::ApiLogStorage>,
}

impl AppState {
    /// 接続プールと認証設定からアプリケーション状態を構築する
    pub fn new(db_pool: sqlx::SqlitePool, auth_config: config::AuthConfig) -> Self {
        let audit_storage =
            std::sync::Arc::new(db::api_logs::ApiLogStorage::new(db_pool.clone()));
        let audit_writer = audit::writer::ApiLogWriter::new(
            db::api_logs::ApiLogStorage::new(db_pool.clone()),
            audit::writer::ApiLogWriterConfig::default(),
        );

        Self {
            db_pool,
            jwt_secret: auth_config.jwt_secret,
            token_ttl_minutes: auth_config.token_ttl_minutes,
            audit_writer,
            audit_storage,
        }
    }
}
