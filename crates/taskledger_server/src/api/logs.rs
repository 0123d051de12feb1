//! `/api/logs` handler.

use super::error::ApiError;
use super::AppState;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use taskledger_core::{AuditLogEntry, AuditLogService, PageRequest, SqliteAuditLogRepository};

#[derive(Debug, Default, Deserialize)]
pub struct LogListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogListResponse {
    pub logs: Vec<AuditLogEntry>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
}

pub async fn list_logs(
    State(state): State<AppState>,
    Query(params): Query<LogListParams>,
) -> Result<Json<LogListResponse>, ApiError> {
    let request = PageRequest::from_query(params.page.as_deref(), params.limit.as_deref());
    let page = state
        .run("Failed to fetch audit logs", move |conn| {
            Ok(AuditLogService::new(SqliteAuditLogRepository::new(conn)).list(request)?)
        })
        .await?;

    Ok(Json(LogListResponse {
        logs: page.items,
        total: page.total,
        page: page.page,
        total_pages: page.total_pages,
    }))
}
