//! Primitive aliases shared by every crate in the workspace.

/// Record identifiers are PostgreSQL BIGSERIAL values.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Entity label used in `NotFound` errors for projects.
pub const ENTITY_PROJECT: &str = "Project";

/// Entity label used in `NotFound` errors for tasks.
pub const ENTITY_TASK: &str = "Task";
