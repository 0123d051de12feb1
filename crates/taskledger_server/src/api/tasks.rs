//! `/api/tasks` handlers.

use super::error::ApiError;
use super::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskledger_core::{
    PageRequest, SqliteAuditLogRepository, SqliteTaskRepository, Task, TaskId, TaskInput,
    TaskService,
};

/// Raw query values; numeric parsing happens in `PageRequest::from_query`.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListResponse {
    pub tasks: Vec<Task>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u64,
}

fn task_service(
    conn: &Connection,
) -> TaskService<SqliteTaskRepository<'_>, SqliteAuditLogRepository<'_>> {
    TaskService::new(
        SqliteTaskRepository::new(conn),
        SqliteAuditLogRepository::new(conn),
    )
}

/// Unparseable ids cannot reference a task, so they read as not found.
fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    TaskId::parse_str(raw).map_err(|_| ApiError::NotFound)
}

fn read_body(payload: Result<Json<TaskInput>, JsonRejection>) -> Result<TaskInput, ApiError> {
    payload
        .map(|Json(input)| input)
        .map_err(|rejection| ApiError::Validation(vec![rejection.body_text()]))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<TaskListParams>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let request = PageRequest::from_query(params.page.as_deref(), params.limit.as_deref());
    let page = state
        .run("Failed to fetch tasks", move |conn| {
            task_service(conn).list(request, params.search.as_deref())
        })
        .await?;

    Ok(Json(TaskListResponse {
        tasks: page.items,
        total: page.total,
        page: page.page,
        total_pages: page.total_pages,
    }))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_task_id(&id)?;
    let task = state
        .run("Failed to fetch task", move |conn| task_service(conn).get(id))
        .await?;
    Ok(Json(task))
}

pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let input = read_body(payload)?;
    let task = state
        .run("Failed to create task", move |conn| {
            task_service(conn).create(&input)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let input = read_body(payload)?;
    let id = parse_task_id(&id)?;
    let task = state
        .run("Failed to update task", move |conn| {
            task_service(conn).update(id, &input)
        })
        .await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_task_id(&id)?;
    state
        .run("Failed to delete task", move |conn| task_service(conn).delete(id))
        .await?;
    Ok(Json(json!({ "message": "Task deleted successfully" })))
}
