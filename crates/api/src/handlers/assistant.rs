//! Handlers for the `/assistant` endpoints.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use taskboard_board::assistant::{self, ProjectSummary, QuestionAnswer, TaskSuggestions};
use taskboard_core::board::validate_reference;
use taskboard_core::error::CoreError;
use taskboard_core::types::DbId;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub project_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub project_id: DbId,
    pub question: String,
    pub task_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    pub task_id: DbId,
}

fn check_reference(field: &str, id: DbId) -> Result<(), CoreError> {
    validate_reference(field, id).map_err(CoreError::Validation)
}

/// POST /api/v1/assistant/summarize
pub async fn summarize(
    State(state): State<AppState>,
    AppJson(input): AppJson<SummarizeRequest>,
) -> AppResult<Json<DataResponse<ProjectSummary>>> {
    check_reference("project_id", input.project_id)?;

    let summary = assistant::summarize(&*state.board, &*state.assistant, input.project_id).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/assistant/question
pub async fn ask(
    State(state): State<AppState>,
    AppJson(input): AppJson<QuestionRequest>,
) -> AppResult<Json<DataResponse<QuestionAnswer>>> {
    check_reference("project_id", input.project_id)?;
    if let Some(task_id) = input.task_id {
        check_reference("task_id", task_id)?;
    }

    let answer = assistant::ask(
        &*state.board,
        &*state.assistant,
        input.project_id,
        &input.question,
        input.task_id,
    )
    .await?;
    Ok(Json(DataResponse { data: answer }))
}

/// POST /api/v1/assistant/suggestions
pub async fn suggestions(
    State(state): State<AppState>,
    AppJson(input): AppJson<SuggestionRequest>,
) -> AppResult<Json<DataResponse<TaskSuggestions>>> {
    check_reference("task_id", input.task_id)?;

    let suggestions = assistant::suggest(&*state.board, &*state.assistant, input.task_id).await?;
    Ok(Json(DataResponse { data: suggestions }))
}
