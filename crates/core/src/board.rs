//! Task workflow constants, enumerations and validation functions.
//!
//! Covers the closed status and priority enumerations, field length limits,
//! column ordering rules, the overdue predicate and completion-rate math.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a project name in characters.
pub const MAX_PROJECT_NAME_LENGTH: usize = 100;

/// Maximum length of a project description in characters.
pub const MAX_PROJECT_DESCRIPTION_LENGTH: usize = 500;

/// Maximum length of a task title in characters.
pub const MAX_TASK_TITLE_LENGTH: usize = 100;

/// Maximum length of a task description in characters.
pub const MAX_TASK_DESCRIPTION_LENGTH: usize = 1000;

/// Maximum length of a single tag in characters.
pub const MAX_TAG_LENGTH: usize = 30;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Error returned when a string is not a member of a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind}. Must be one of: {allowed}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub allowed: String,
}

/// Column a task sits in. Any status may move to any other.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl TaskStatus {
    /// All statuses in board column order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    /// Parse a status, mapping failure to [`CoreError::InvalidStatus`].
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        value
            .parse()
            .map_err(|e: ParseEnumError| CoreError::InvalidStatus(e.to_string()))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "status",
                value: s.to_string(),
                allowed: join_names(TaskStatus::ALL.iter().map(|s| s.as_str())),
            })
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Task priority level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }

    /// Parse a priority, mapping failure to [`CoreError::Validation`].
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        value
            .parse()
            .map_err(|e: ParseEnumError| CoreError::Validation(e.to_string()))
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "priority",
                value: s.to_string(),
                allowed: join_names(TaskPriority::ALL.iter().map(|p| p.as_str())),
            })
    }
}

impl TryFrom<String> for TaskPriority {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate a tag list: every tag non-blank and at most [`MAX_TAG_LENGTH`]
/// characters.
pub fn validate_tags(tags: &[String]) -> Result<(), String> {
    if tags.iter().any(|t| t.trim().is_empty()) {
        return Err("Tags must not be empty".to_string());
    }
    match tags.iter().find(|t| t.chars().count() > MAX_TAG_LENGTH) {
        Some(tag) => Err(format!(
            "Tag '{tag}' exceeds maximum length of {MAX_TAG_LENGTH} characters"
        )),
        None => Ok(()),
    }
}

/// Validate that an order value is non-negative.
pub fn validate_order(order: i32) -> Result<(), String> {
    if order < 0 {
        return Err(format!("Order must be non-negative, got {order}"));
    }
    Ok(())
}

/// Validate that a referenced identifier is shaped like a database id.
pub fn validate_reference(field: &str, id: DbId) -> Result<(), String> {
    if id <= 0 {
        return Err(format!("{field} must be a positive identifier, got {id}"));
    }
    Ok(())
}

/// Trim every tag in place, keeping the original order.
pub fn normalize_tags(tags: &mut [String]) {
    for tag in tags.iter_mut() {
        let trimmed = tag.trim();
        if trimmed.len() != tag.len() {
            *tag = trimmed.to_string();
        }
    }
}

// ---------------------------------------------------------------------------
// Ordering and derived values
// ---------------------------------------------------------------------------

/// Order for a task appended to the end of its column.
///
/// `current_max` is the highest order in the `(project, status)` partition,
/// or `None` when the partition is empty.
pub fn next_order(current_max: Option<i32>) -> i32 {
    current_max.map_or(0, |max| max.saturating_add(1))
}

/// A task is overdue when its due date has passed and it is not done.
pub fn is_overdue(due_date: Option<Timestamp>, status: TaskStatus, now: Timestamp) -> bool {
    match due_date {
        Some(due) => due < now && status != TaskStatus::Done,
        None => false,
    }
}

/// Percentage of done tasks, rounded to the nearest integer. Zero for an
/// empty project.
pub fn completion_rate(done: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    ((done as f64 / total as f64) * 100.0).round() as i64
}
