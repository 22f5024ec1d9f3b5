//! Task entity model and DTOs.
//!
//! Request DTOs carry `status` and `priority` as raw strings so that values
//! outside the closed enumerations surface as domain errors
//! (`InvalidStatus` / `Validation`) instead of body-deserialization failures.
//! The board service converts them into [`NewTask`] / [`TaskFieldsPatch`]
//! before anything reaches the store.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::board::{self, TaskPriority, TaskStatus};
use taskboard_core::types::{DbId, Timestamp};
use validator::{Validate, ValidationError};

use crate::models::{double_option, trim_in_place};

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    #[sqlx(try_from = "String")]
    pub priority: TaskPriority,
    pub project_id: DbId,
    /// Position within the `(project_id, status)` column; ascending.
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    pub due_date: Option<Timestamp>,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    /// Whether the task is past its due date and not yet done.
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        board::is_overdue(self.due_date, self.status, now)
    }
}

fn validate_tag_list(tags: &[String]) -> Result<(), ValidationError> {
    board::validate_tags(tags)
        .map_err(|msg| ValidationError::new("tag_length").with_message(Cow::Owned(msg)))
}

fn validate_order_value(order: i32) -> Result<(), ValidationError> {
    board::validate_order(order)
        .map_err(|msg| ValidationError::new("order").with_message(Cow::Owned(msg)))
}

fn validate_project_reference(project_id: &DbId) -> Result<(), ValidationError> {
    board::validate_reference("project_id", *project_id)
        .map_err(|msg| ValidationError::new("reference").with_message(Cow::Owned(msg)))
}

/// DTO for creating a new task.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 1000, message = "must be 1 to 1000 characters"))]
    pub description: String,
    #[validate(custom(function = "validate_project_reference"))]
    pub project_id: DbId,
    /// Defaults to `To Do` if omitted.
    pub status: Option<String>,
    /// Defaults to `Medium` if omitted.
    pub priority: Option<String>,
    /// Appended to the end of its column if omitted.
    #[validate(custom(function = "validate_order_value"))]
    pub order: Option<i32>,
    pub due_date: Option<Timestamp>,
    #[serde(default)]
    #[validate(custom(function = "validate_tag_list"))]
    pub tags: Vec<String>,
}

impl CreateTask {
    /// Trim text fields and tags before validation.
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.description);
        board::normalize_tags(&mut self.tags);
    }
}

/// DTO for updating a task's descriptive fields.
///
/// `status`, `order` and `project_id` are not accepted here: status and
/// order change through the transition and reorder operations, and a task
/// never moves between projects. Unknown keys are rejected rather than
/// ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTask {
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 1000, message = "must be 1 to 1000 characters"))]
    pub description: Option<String>,
    pub priority: Option<String>,
    /// `null` clears the due date; an absent key leaves it unchanged.
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<Timestamp>>,
    #[validate(custom(function = "validate_tag_list"))]
    pub tags: Option<Vec<String>>,
}

impl UpdateTask {
    pub fn normalize(&mut self) {
        if let Some(title) = self.title.as_mut() {
            trim_in_place(title);
        }
        if let Some(description) = self.description.as_mut() {
            trim_in_place(description);
        }
        if let Some(tags) = self.tags.as_mut() {
            board::normalize_tags(tags);
        }
    }
}

/// Body of `PATCH /tasks/{id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransitionStatus {
    pub status: String,
    pub order: Option<i32>,
}

/// One entry of a bulk reorder request.
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderEntryInput {
    pub id: DbId,
    pub status: String,
    pub order: i32,
}

/// Body of `PATCH /tasks/reorder`.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkReorderInput {
    pub tasks: Vec<ReorderEntryInput>,
}

/// Fully-resolved insert handed to the store.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub project_id: DbId,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub order: i32,
    pub due_date: Option<Timestamp>,
    pub tags: Vec<String>,
}

/// Fully-resolved field patch handed to the store. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct TaskFieldsPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<Timestamp>>,
    pub tags: Option<Vec<String>>,
}

/// Query filters for `GET /tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub project_id: Option<DbId>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// `true` keeps only overdue tasks, `false` only tasks that are not.
    pub overdue: Option<bool>,
}

impl TaskFilter {
    /// In-process equivalent of the SQL `WHERE` clause in `TaskRepo::list`.
    pub fn matches(&self, task: &Task, now: Timestamp) -> bool {
        self.project_id.map_or(true, |id| task.project_id == id)
            && self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
            && self.overdue.map_or(true, |o| task.is_overdue(now) == o)
    }
}
