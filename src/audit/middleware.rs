//! 監査ログミドルウェア（Audit Interceptor）
//!
//! 全リクエスト/レスポンスペアのボディと処理時間を記録する。
//! レスポンスボディは一度読み切ってバッファし、同一バイト列で
//! クライアントへ再生する（レスポンスサイズに比例してメモリを使う
//! トレードオフ。巨大レスポンスにはスケールしない）。
//! ログ書き込みはレスポンス構築後にチャネルへ引き渡すのみで、
//! クライアントは書き込み完了を待たない。

use crate::audit::types::ApiLogEntry;
use crate::audit::NOT_AVAILABLE;
use crate::AppState;
use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::time::Instant;
use tracing::{trace, warn};

/// 監査ログミドルウェア
///
/// リクエストボディのJSON解釈はベストエフォートで、失敗しても
/// リクエストは継続する。ハンドラーがエラーレスポンスを返しても
/// エントリは必ず1件生成される。
pub async fn audit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    // トークン抽出はAuth Guardと同じパースを使うが独立しており、
    // 欠落・不正時はセンチネルを記録するだけでリクエストを失敗させない
    let token = crate::auth::bearer_token(request.headers())
        .map(str::to_string)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    // リクエストボディを読み切り、ハンドラーへは同じバイト列を渡す
    let (parts, body) = request.into_parts();
    let req_bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to buffer request body for audit: {}", e);
            Bytes::new()
        }
    };
    let input_data: Option<serde_json::Value> = if req_bytes.is_empty() {
        None
    } else {
        serde_json::from_slice(&req_bytes).ok()
    };
    let request = Request::from_parts(parts, Body::from(req_bytes));

    // タイマーはハンドラー呼び出しを厳密に挟む
    let start = Instant::now();
    let response = next.run(request).await;
    let process_time = start.elapsed().as_secs_f64();

    // レスポンスボディを消費してバッファし、同一バイト列で再生する。
    // 読み取り失敗時は空ボディに降格するがリクエスト自体は失敗させない
    let (parts, body) = response.into_parts();
    let res_bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Failed to buffer response body for audit: {}", e);
            Bytes::new()
        }
    };
    let response = Response::from_parts(parts, Body::from(res_bytes));

    trace!(
        status = response.status().as_u16(),
        process_time,
        "audit log entry captured"
    );

    // predictionは予約フィールド。下流の推論結果が配線されるまで
    // センチネルを維持する
    let entry = ApiLogEntry {
        id: None,
        input_data,
        token,
        prediction: NOT_AVAILABLE.to_string(),
        process_time,
        created_at: Utc::now(),
    };

    // レスポンス送出とは独立した後追いタスクへ引き渡す
    state.audit_writer.send(entry);

    response
}
