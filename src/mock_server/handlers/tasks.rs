//! Async task and status handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::{error_response, SharedState};

/// GET /api/foreman_tasks/api/tasks/{id}
///
/// Each read consumes one of the task's remaining pending polls.
pub async fn get_task(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut state = state.write().await;
    match state.poll_task(&id) {
        Some(task) => Json(task).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            &format!("Resource task not found by id '{id}'"),
        ),
    }
}

/// GET /api/status
pub async fn status() -> impl IntoResponse {
    Json(json!({
        "result": "ok",
        "status": 200,
        "version": "3.9.0",
        "api_version": crate::API_VERSION
    }))
}
