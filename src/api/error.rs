// API error response wrapper

use crate::common::error::GateError;
use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// GateErrorをHTTPレスポンスへ変換するラッパー
///
/// クライアントへは`external_message()`（Validationは詳細文）のみ
/// 返し、内部詳細はサーバーログに留める。401には
/// `WWW-Authenticate: Bearer`チャレンジを付ける。
#[derive(Debug)]
pub struct AppError(pub GateError);

impl From<GateError> for AppError {
    fn from(err: GateError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        if status.is_server_error() {
            tracing::error!("Internal error: {}", self.0);
        }
        // Validationは重複ユーザー名等の詳細をそのまま返す
        let message = match &self.0 {
            GateError::Validation(detail) => detail.clone(),
            other => other.external_message().to_string(),
        };

        let body = Json(json!({ "error": message }));
        if self.0.wants_bearer_challenge() {
            (
                status,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                body,
            )
                .into_response()
        } else {
            (status, body).into_response()
        }
    }
}

/// ハンドラー用のResult型
pub type ApiResult<T> = Result<T, AppError>;
