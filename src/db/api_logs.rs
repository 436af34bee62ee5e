//! 監査ログストレージ（Audit Store）

use crate::audit::types::{ApiLogEntry, ApiLogFilter};
use crate::common::error::{GateError, GateResult};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// 監査ログのSQLiteストレージ
///
/// 書き込み1件ごとにプールから接続を取得する。ハンドルをリクエスト間で
/// 共有しないため、並行する書き込み同士が競合しない。
#[derive(Clone)]
pub struct ApiLogStorage {
    pool: SqlitePool,
}

impl ApiLogStorage {
    /// 新しいストレージを作成
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// エントリを1件挿入する
    pub async fn insert(&self, entry: &ApiLogEntry) -> GateResult<()> {
        let input_data = entry
            .input_data
            .as_ref()
            .map(|v| serde_json::to_string(v))
            .transpose()
            .map_err(|e| GateError::Internal(format!("Failed to serialize input_data: {}", e)))?;

        sqlx::query(
            r#"INSERT INTO api_logs (
                input_data, token, prediction, process_time, created_at
            ) VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(input_data)
        .bind(&entry.token)
        .bind(&entry.prediction)
        .bind(entry.process_time)
        .bind(entry.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| GateError::Database(format!("Failed to insert audit log: {}", e)))?;

        Ok(())
    }

    /// フィルタ条件に一致するエントリを新しい順に取得する
    ///
    /// 日付境界は両端とも閉区間。
    pub async fn query(&self, filter: &ApiLogFilter) -> GateResult<Vec<ApiLogEntry>> {
        let (where_clause, bind_values) = build_where_clause(filter);

        let sql = format!(
            "SELECT id, input_data, token, prediction, process_time, created_at
             FROM api_logs {} ORDER BY created_at DESC",
            where_clause
        );

        let mut query = sqlx::query_as::<_, ApiLogRow>(&sql);
        for val in &bind_values {
            query = query.bind(val.as_str());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| GateError::Database(format!("Failed to query audit logs: {}", e)))?;

        rows.into_iter().map(ApiLogRow::into_entry).collect()
    }
}

fn build_where_clause(filter: &ApiLogFilter) -> (String, Vec<String>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_values: Vec<String> = Vec::new();

    if let Some(ref start_date) = filter.start_date {
        conditions.push("created_at >= ?".to_string());
        bind_values.push(start_date.to_rfc3339());
    }

    if let Some(ref end_date) = filter.end_date {
        conditions.push("created_at <= ?".to_string());
        bind_values.push(end_date.to_rfc3339());
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values)
}

// SQLiteからの行取得用の内部型
#[derive(sqlx::FromRow)]
struct ApiLogRow {
    id: i64,
    input_data: Option<String>,
    token: String,
    prediction: String,
    process_time: f64,
    created_at: String,
}

impl ApiLogRow {
    fn into_entry(self) -> GateResult<ApiLogEntry> {
        let input_data = self
            .input_data
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| GateError::Database(format!("Invalid input_data JSON: {}", e)))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| GateError::Database(format!("Invalid created_at: {}", e)))?
            .with_timezone(&Utc);

        Ok(ApiLogEntry {
            id: Some(self.id),
            input_data,
            token: self.token,
            prediction: self.prediction,
            process_time: self.process_time,
            created_at,
        })
    }
}
