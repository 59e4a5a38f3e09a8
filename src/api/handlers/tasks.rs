//! Task API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::{ApiError, AppState};
use crate::error::SatchelError;
use crate::store::DEFAULT_UPCOMING_DAYS;
use crate::task::{NewTask, Task, TaskFilter, TaskSummary};

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Task list query parameters
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub subject: Option<String>,
}

/// Create task request
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// 缺失时交给引擎报 "title cannot be empty"，保证 400 带 JSON 错误体
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Delete response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Upcoming query parameters
#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    pub days: Option<u32>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/tasks
/// List tasks, optionally narrowed by status/priority/subject
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    // 空字符串参数在引擎里按"未提供"处理
    let filter = TaskFilter {
        status: query.status,
        priority: query.priority,
        subject: query.subject,
    };
    let tasks = state.store.filter(&filter)?;
    Ok(Json(tasks))
}

/// POST /api/tasks
/// Create a task
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let new = NewTask {
        title: body.title,
        description: body.description,
        subject: body.subject,
        due_date: body.due_date.filter(|d| !d.is_empty()),
        priority: body.priority,
    };
    let task = state.store.create(new)?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/tasks/{id}
/// Apply a field patch. The body passes through to the engine untouched, so
/// an unknown id answers 404 and an unknown field 400
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(fields): Json<Map<String, Value>>,
) -> Result<Json<Task>, ApiError> {
    let task = state.store.update(&id, &fields)?;
    Ok(Json(task))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    if state.store.delete(&id)? {
        Ok(Json(DeleteResponse { deleted: true }))
    } else {
        Err(SatchelError::not_found("Task not found").into())
    }
}

/// GET /api/summary
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TaskSummary>, ApiError> {
    Ok(Json(state.store.summary()?))
}

/// GET /api/upcoming?days=N
pub async fn get_upcoming(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UpcomingQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let days = query.days.unwrap_or(DEFAULT_UPCOMING_DAYS);
    Ok(Json(state.store.upcoming(days)?))
}
