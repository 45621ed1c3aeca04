//! Route handlers for the task API
//!
//! Every `/api` route requires a valid session and operates only on
//! the session owner's tasks. Tasks are returned with their derived
//! completion percentage attached.

use crate::auth::Session;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use taskpulse_common::truncate_string;
use taskpulse_core::{
    progress::StatusConflict, CreateTaskRequest, PomodoroRequest, Subtask, TaskStore,
    TaskWithProgress, TaskpulseConfig, TaskpulseError, UpdateTaskRequest, Uuid,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, instrument};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: TaskStore,
    pub config: Arc<TaskpulseConfig>,
}

/// Wrapper mapping core errors onto HTTP responses
#[derive(Debug)]
pub struct ApiError(TaskpulseError);

impl From<TaskpulseError> for ApiError {
    fn from(err: TaskpulseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            TaskpulseError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            TaskpulseError::Validation { message } => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            TaskpulseError::TaskNotFound { .. } => {
                (StatusCode::NOT_FOUND, "Task not found".to_string())
            }
            TaskpulseError::SubtaskNotFound { .. } => {
                (StatusCode::NOT_FOUND, "Subtask not found".to_string())
            }
            err => {
                // Cause goes to the log, not the client
                error!("internal error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(Serialize)]
struct TaskListResponse {
    tasks: Vec<TaskWithProgress>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskResponse {
    message: &'static str,
    task: TaskWithProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_conflict: Option<StatusConflict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtask: Option<Subtask>,
}

impl TaskResponse {
    fn new(message: &'static str, task: impl Into<TaskWithProgress>) -> Self {
        Self {
            message,
            task: task.into(),
            status_conflict: None,
            subtask: None,
        }
    }
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReorderResponse {
    message: &'static str,
    tasks: Vec<TaskWithProgress>,
}

#[derive(Deserialize)]
struct AddSubtaskRequest {
    title: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReorderRequest {
    task_ids: Vec<Uuid>,
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/order", put(reorder_tasks))
        .route(
            "/api/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route(
            "/api/tasks/:id/subtasks",
            post(add_subtask).put(replace_subtasks),
        )
        .route("/api/tasks/:id/pomodoro", post(record_pomodoro))
        .route("/health", get(crate::health::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[instrument(skip(state))]
async fn list_tasks(
    session: Session,
    State(state): State<AppState>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let tasks = state.store.list_tasks(&session.user_id).await?;
    Ok(Json(TaskListResponse {
        tasks: tasks.into_iter().map(TaskWithProgress::from).collect(),
    }))
}

#[instrument(skip(state, request))]
async fn create_task(
    session: Session,
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    info!(
        title = %truncate_string(&request.title, 40),
        "creating task"
    );
    let task = state.store.create_task(&session.user_id, request).await?;
    Ok(Json(TaskResponse::new("Task created successfully", task)))
}

#[instrument(skip(state))]
async fn get_task(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state.store.get_task(&session.user_id, id).await?;
    Ok(Json(TaskResponse::new("OK", task)))
}

#[instrument(skip(state, request))]
async fn update_task(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let outcome = state
        .store
        .update_task(&session.user_id, id, request)
        .await?;

    let mut response = TaskResponse::new("Task updated successfully", outcome.task);
    response.status_conflict = outcome.status_conflict;
    Ok(Json(response))
}

#[instrument(skip(state))]
async fn delete_task(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete_task(&session.user_id, id).await?;
    Ok(Json(MessageResponse {
        message: "Task deleted successfully",
    }))
}

#[instrument(skip(state, request))]
async fn add_subtask(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddSubtaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state
        .store
        .add_subtask(&session.user_id, id, &request.title)
        .await?;

    let mut response = TaskResponse::new("Subtask added successfully", task);
    response.subtask = response.task.task.subtasks.last().cloned();
    Ok(Json(response))
}

#[instrument(skip(state, body))]
async fn replace_subtasks(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<TaskResponse>, ApiError> {
    // The payload's `subtasks` must be an array; anything else is a
    // client error, not a decode failure
    let subtasks = body
        .get("subtasks")
        .filter(|value| value.is_array())
        .cloned()
        .ok_or_else(|| TaskpulseError::validation("Invalid subtasks data"))?;
    let subtasks: Vec<Subtask> = serde_json::from_value(subtasks)
        .map_err(|_| TaskpulseError::validation("Invalid subtasks data"))?;

    let task = state
        .store
        .replace_subtasks(&session.user_id, id, subtasks)
        .await?;
    Ok(Json(TaskResponse::new("Subtasks updated successfully", task)))
}

#[instrument(skip(state, request))]
async fn reorder_tasks(
    session: Session,
    State(state): State<AppState>,
    Json(request): Json<ReorderRequest>,
) -> Result<Json<ReorderResponse>, ApiError> {
    let tasks = state
        .store
        .reorder_tasks(&session.user_id, &request.task_ids)
        .await?;

    Ok(Json(ReorderResponse {
        message: "Tasks reordered successfully",
        tasks: tasks.into_iter().map(TaskWithProgress::from).collect(),
    }))
}

#[instrument(skip(state, request))]
async fn record_pomodoro(
    session: Session,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PomodoroRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state
        .store
        .record_pomodoro(&session.user_id, id, &request)
        .await?;
    Ok(Json(TaskResponse::new(
        "Pomodoro session recorded",
        task,
    )))
}
