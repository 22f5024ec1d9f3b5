//! Handlers for the `/tasks` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use taskboard_board::service::{parse_reorder_entries, ReorderOutcome};
use taskboard_core::types::DbId;
use taskboard_db::models::task::{
    BulkReorderInput, CreateTask, Task, TaskFilter, TransitionStatus, UpdateTask,
};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::query::TaskListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tasks
pub async fn list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<TaskListParams>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let filter = TaskFilter::try_from(params)?;
    let tasks = state.board.list_tasks(&filter).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /api/v1/tasks
pub async fn create(
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    input.normalize();
    input.validate()?;

    let task = state.board.create_task(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = state.board.get_task(id).await?;
    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/tasks/{id}
///
/// Descriptive fields only; status and order change through
/// `PATCH /tasks/{id}/status` and `PATCH /tasks/reorder`. A body carrying
/// `status` or `order` is rejected with a hint to those endpoints.
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    body: Result<AppJson<UpdateTask>, AppError>,
) -> AppResult<Json<DataResponse<Task>>> {
    let AppJson(mut input) = body.map_err(with_position_hint)?;
    input.normalize();
    input.validate()?;

    let task = state.board.update_task_fields(id, &input).await?;
    Ok(Json(DataResponse { data: task }))
}

fn with_position_hint(err: AppError) -> AppError {
    match err {
        AppError::BadRequest(msg)
            if msg.contains("unknown field `status`") || msg.contains("unknown field `order`") =>
        {
            AppError::BadRequest(format!(
                "{msg}. Use PATCH /api/v1/tasks/{{id}}/status or PATCH /api/v1/tasks/reorder \
                 to change status or order"
            ))
        }
        other => other,
    }
}

/// PATCH /api/v1/tasks/{id}/status
pub async fn transition_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<TransitionStatus>,
) -> AppResult<Json<DataResponse<Task>>> {
    let task = state
        .board
        .transition_status(id, &input.status, input.order)
        .await?;
    Ok(Json(DataResponse { data: task }))
}

/// PATCH /api/v1/tasks/reorder
///
/// The whole batch is parsed before anything is written. Entries are then
/// applied in order; if one fails, the response carries the error status
/// and code of that entry together with the tasks already updated.
pub async fn reorder(
    State(state): State<AppState>,
    AppJson(input): AppJson<BulkReorderInput>,
) -> AppResult<Response> {
    let entries = parse_reorder_entries(&input.tasks)?;
    let outcome = state.board.bulk_reorder(&entries).await;

    Ok(reorder_response(outcome))
}

fn reorder_response(outcome: ReorderOutcome) -> Response {
    let Some(failure) = outcome.failed.as_ref() else {
        return Json(DataResponse { data: outcome }).into_response();
    };

    let status = match failure.code {
        "NOT_FOUND" => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = json!({
        "error": failure.message,
        "code": failure.code,
        "data": outcome,
    });
    (status, Json(body)).into_response()
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    state.board.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
