//! Handlers for the `/projects` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use taskboard_board::query::{GroupedTasks, ProjectStats};
use taskboard_core::types::DbId;
use taskboard_db::models::project::{CreateProject, Project, UpdateProject};
use validator::Validate;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    AppJson(mut input): AppJson<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input.normalize();
    input.validate()?;

    let project = state.board.create_project(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = state.board.list_projects().await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state.board.get_project(id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(mut input): AppJson<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    input.normalize();
    input.validate()?;

    let project = state.board.update_project(id, &input).await?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// Removes every task of the project, then the project itself.
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    state.board.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{id}/stats
pub async fn stats(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<ProjectStats>>> {
    let stats = state.board.project_stats(id).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/projects/{id}/tasks
///
/// Tasks keyed by status column, each column in display order.
pub async fn grouped_tasks(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<DataResponse<GroupedTasks>>> {
    let grouped = state.board.grouped_by_status(id).await?;
    Ok(Json(DataResponse { data: grouped }))
}
