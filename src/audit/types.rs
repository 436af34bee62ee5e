//! 監査ログの型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 監査ログエントリ
///
/// リクエスト1件につき必ず1件生成される追記専用レコード。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiLogEntry {
    /// レコードID（DB挿入後に設定）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// リクエストボディ（JSONとして解釈できた場合のみ）
    pub input_data: Option<serde_json::Value>,
    /// ベアラートークン文字列（欠落・不正時は "N/A"）
    pub token: String,
    /// 予約フィールド（現状は常に "N/A"）
    pub prediction: String,
    /// リクエスト処理時間（秒）
    pub process_time: f64,
    /// 記録時刻
    pub created_at: DateTime<Utc>,
}

/// 監査ログフィルタ
///
/// 両端は閉区間。Noneの境界は制約なし。
#[derive(Debug, Clone, Default)]
pub struct ApiLogFilter {
    /// この日時以降（含む）
    pub start_date: Option<DateTime<Utc>>,
    /// この日時以前（含む）
    pub end_date: Option<DateTime<Utc>>,
}
