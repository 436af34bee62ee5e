//! 監査ログAPIハンドラー

use crate::api::error::{ApiResult, AppError};
use crate::audit::types::{ApiLogEntry, ApiLogFilter};
use crate::common::error::GateError;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// GET /logs/ のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    /// 取得範囲の開始時刻（RFC 3339、両端含む）
    pub start_date: Option<String>,
    /// 取得範囲の終了時刻（RFC 3339、両端含む）
    pub end_date: Option<String>,
}

/// RFC 3339文字列をパースする。空文字列は未指定として扱う。
fn parse_date_param(name: &str, value: Option<String>) -> Result<Option<DateTime<Utc>>, AppError> {
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| {
                AppError(GateError::Validation(format!(
                    "Invalid {}: expected RFC 3339 timestamp",
                    name
                )))
            }),
    }
}

/// GET /logs/ - 監査ログの取得（新しい順）
///
/// 日付範囲は閉区間で解釈し、未指定の側は無制限とする。
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> ApiResult<Json<Vec<ApiLogEntry>>> {
    let filter = ApiLogFilter {
        start_date: parse_date_param("start_date", query.start_date)?,
        end_date: parse_date_param("end_date", query.end_date)?,
    };

    let entries = state.audit_storage.query(&filter).await?;
    Ok(Json(entries))
}
