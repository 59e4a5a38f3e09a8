//! Web API module for Satchel

pub mod handlers;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use crate::ai::Assistant;
use crate::error::SatchelError;
use crate::store::TaskStore;

/// Shared state handed to every handler
///
/// Built once at server startup and injected through axum, so there is no
/// process-wide store instance. The store itself takes `&self` everywhere;
/// concurrent mutations follow the engine's last-writer-wins contract.
pub struct AppState {
    pub store: TaskStore,
    pub assistant: Assistant,
}

/// Error envelope returned by every failing route
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Engine error mapped onto an HTTP status with a JSON body
pub struct ApiError(SatchelError);

impl From<SatchelError> for ApiError {
    fn from(err: SatchelError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SatchelError::Validation(_) => StatusCode::BAD_REQUEST,
            SatchelError::NotFound(_) => StatusCode::NOT_FOUND,
            SatchelError::Service(_) | SatchelError::Io(_) | SatchelError::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Create the API router
pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Tasks API
        .route(
            "/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route(
            "/tasks/{id}",
            put(handlers::tasks::update_task).delete(handlers::tasks::delete_task),
        )
        .route("/summary", get(handlers::tasks::get_summary))
        .route("/upcoming", get(handlers::tasks::get_upcoming))
        // AI API
        .route("/ai/chat", post(handlers::ai::chat))
        .route(
            "/ai/suggest-priority/{id}",
            post(handlers::ai::suggest_priority),
        )
        .route("/ai/subtasks/{id}", post(handlers::ai::generate_subtasks))
        .with_state(state)
}

/// Create the full router (API nested under /api, permissive CORS)
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new().nest("/api", create_api_router(state)).layer(cors)
}

/// Start the web server
pub async fn start_server(port: u16, state: AppState) -> std::io::Result<()> {
    let app = create_router(Arc::new(state));
    let addr = format!("0.0.0.0:{}", port);

    println!("Satchel API server: http://localhost:{}/api", port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_mapping() {
        let cases = [
            (SatchelError::validation("bad input"), StatusCode::BAD_REQUEST),
            (SatchelError::not_found("missing"), StatusCode::NOT_FOUND),
            (
                SatchelError::service("upstream down"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
