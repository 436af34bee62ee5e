//! データベースアクセス層
//!
//! SQLiteベースのデータ永続化

/// ユーザー管理（Credential Store）
pub mod users;

/// 監査ログストレージ（Audit Store）
pub mod api_logs;

/// データベースマイグレーション
pub mod migrations;
