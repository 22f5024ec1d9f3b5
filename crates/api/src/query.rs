//! Query parameter types for API handlers.

use serde::Deserialize;
use taskboard_core::board::{TaskPriority, TaskStatus};
use taskboard_core::error::CoreError;
use taskboard_core::types::DbId;
use taskboard_db::models::task::TaskFilter;

/// `GET /tasks?project_id=&status=&priority=&overdue=`.
///
/// Enumerations arrive as raw strings so unknown values are reported as
/// `INVALID_STATUS` / `VALIDATION_ERROR` rather than a generic bad request.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListParams {
    pub project_id: Option<DbId>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub overdue: Option<bool>,
}

impl TryFrom<TaskListParams> for TaskFilter {
    type Error = CoreError;

    fn try_from(params: TaskListParams) -> Result<Self, Self::Error> {
        Ok(TaskFilter {
            project_id: params.project_id,
            status: params.status.as_deref().map(TaskStatus::parse).transpose()?,
            priority: params
                .priority
                .as_deref()
                .map(TaskPriority::parse)
                .transpose()?,
            overdue: params.overdue,
        })
    }
}
