//! AI assistant API handlers
//!
//! Provider calls are blocking HTTP with a 30s timeout, so they run on the
//! tokio blocking pool instead of stalling the async workers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::ai::ChatTurn;
use crate::api::{ApiError, AppState};
use crate::error::SatchelError;
use crate::task::{Priority, Task};

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Prior turns the client wants remembered; the assistant keeps the tail
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// Priority suggestion response
#[derive(Debug, Serialize)]
pub struct SuggestPriorityResponse {
    pub priority: Priority,
}

/// Subtask breakdown response
#[derive(Debug, Serialize)]
pub struct SubtasksResponse {
    pub subtasks: Vec<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// POST /api/ai/chat
/// Relay a chat message to the assistant with the full task list as context
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let tasks = state.store.list()?;
    let reply = tokio::task::spawn_blocking(move || {
        state.assistant.chat(&body.message, &tasks, &body.history)
    })
    .await
    .map_err(|e| SatchelError::service(format!("assistant call failed: {}", e)))??;
    Ok(Json(ChatResponse { reply }))
}

/// POST /api/ai/suggest-priority/{id}
/// Ask the assistant for a priority; degrades to medium inside the assistant
pub async fn suggest_priority(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SuggestPriorityResponse>, ApiError> {
    let task = find_task(&state, &id)?;
    let priority = tokio::task::spawn_blocking(move || state.assistant.suggest_priority(&task))
        .await
        .map_err(|e| SatchelError::service(format!("assistant call failed: {}", e)))?;
    Ok(Json(SuggestPriorityResponse { priority }))
}

/// POST /api/ai/subtasks/{id}
/// Ask the assistant to split a task; degrades to an empty list inside the
/// assistant
pub async fn generate_subtasks(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SubtasksResponse>, ApiError> {
    let task = find_task(&state, &id)?;
    let subtasks = tokio::task::spawn_blocking(move || state.assistant.generate_subtasks(&task))
        .await
        .map_err(|e| SatchelError::service(format!("assistant call failed: {}", e)))?;
    Ok(Json(SubtasksResponse { subtasks }))
}

/// Load a task or answer 404
fn find_task(state: &AppState, id: &str) -> Result<Task, ApiError> {
    Ok(state
        .store
        .get(id)?
        .ok_or_else(|| SatchelError::not_found("Task not found"))?)
}
