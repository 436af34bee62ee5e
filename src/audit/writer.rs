//! 監査ログの非同期ライター
//!
//! mpscチャネルでエントリを受信し、レスポンス送出後にバックグラウンドで
//! DBへ書き込む。書き込み1件ごとにプールから独立した接続を取得するため、
//! リクエスト間でストレージハンドルを共有しない。

use crate::audit::types::ApiLogEntry;
use crate::db::api_logs::ApiLogStorage;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// 監査ログライター設定
pub struct ApiLogWriterConfig {
    /// チャネル容量（超過分は破棄）。デフォルト: 10000
    pub buffer_capacity: usize,
}

impl Default for ApiLogWriterConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: crate::config::get_env_parse("AUTHGATE_AUDIT_BUFFER_CAPACITY", 10_000),
        }
    }
}

/// 監査ログの非同期ライター
///
/// mpscチャネル経由でApiLogEntryを受信し、1件ずつDBへ書き込む。
/// 書き込み失敗は運用ログに出すのみで、クライアント応答には影響しない。
/// Clone可能（senderのクローン）。
#[derive(Clone)]
pub struct ApiLogWriter {
    sender: mpsc::Sender<ApiLogEntry>,
}

impl ApiLogWriter {
    /// 新しいApiLogWriterを作成し、バックグラウンドタスクを起動
    pub fn new(storage: ApiLogStorage, config: ApiLogWriterConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.buffer_capacity);

        tokio::spawn(Self::background_task(rx, storage));

        Self { sender: tx }
    }

    /// エントリをチャネルに送信（非同期、ブロックしない）
    pub fn send(&self, entry: ApiLogEntry) {
        if let Err(e) = self.sender.try_send(entry) {
            warn!("Failed to enqueue audit log entry: {}", e);
        }
    }

    /// バックグラウンド書き込みタスク
    ///
    /// チャネルが閉じられたら残りを書き切って終了する。
    async fn background_task(mut rx: mpsc::Receiver<ApiLogEntry>, storage: ApiLogStorage) {
        while let Some(entry) = rx.recv().await {
            if let Err(e) = storage.insert(&entry).await {
                warn!("Failed to write audit log entry: {}. Entry lost.", e);
            }
        }
        info!("Audit log writer background task stopped");
    }
}
