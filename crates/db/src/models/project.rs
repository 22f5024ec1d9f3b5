//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::trim_in_place;

/// A project row from the `projects` table.
///
/// `task_count` is a cache maintained by the board service after every task
/// create or delete. Tasks are looked up by `project_id`, never embedded.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub task_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 500, message = "must be 1 to 500 characters"))]
    pub description: String,
}

impl CreateProject {
    /// Trim surrounding whitespace before validation.
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.description);
    }
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 500, message = "must be 1 to 500 characters"))]
    pub description: Option<String>,
}

impl UpdateProject {
    pub fn normalize(&mut self) {
        if let Some(name) = self.name.as_mut() {
            trim_in_place(name);
        }
        if let Some(description) = self.description.as_mut() {
            trim_in_place(description);
        }
    }
}
