// 監査ログモジュール

/// 監査ログの型定義
pub mod types;

/// 監査ログミドルウェア（Audit Interceptor）
pub mod middleware;

/// 監査ログの非同期ライター
pub mod writer;

/// 値が取得できない場合に記録するセンチネル
pub const NOT_AVAILABLE: &str = "N/A";
