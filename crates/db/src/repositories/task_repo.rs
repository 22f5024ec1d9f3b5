//! Repository for the `tasks` table.

use sqlx::PgPool;
use taskboard_core::board::TaskStatus;
use taskboard_core::types::DbId;

use crate::models::task::{NewTask, Task, TaskFieldsPatch, TaskFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, status, priority, project_id, sort_order, \
                       due_date, tags, created_at, updated_at";

/// Provides CRUD and column-ordering operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a fully-resolved task, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks \
                (title, description, status, priority, project_id, sort_order, due_date, tags) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status.as_str())
            .bind(input.priority.as_str())
            .bind(input.project_id)
            .bind(input.order)
            .bind(input.due_date)
            .bind(&input.tags)
            .fetch_one(pool)
            .await
    }

    /// Find a task by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tasks matching `filter`, ordered by column position then newest first.
    pub async fn list(pool: &PgPool, filter: &TaskFilter) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks \
             WHERE ($1::BIGINT IS NULL OR project_id = $1) \
               AND ($2::TEXT IS NULL OR status = $2) \
               AND ($3::TEXT IS NULL OR priority = $3) \
               AND ($4::BOOLEAN IS NULL OR \
                    (due_date IS NOT NULL AND due_date < NOW() AND status <> 'Done') = $4) \
             ORDER BY sort_order ASC, created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(filter.project_id)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(filter.priority.map(|p| p.as_str()))
            .bind(filter.overdue)
            .fetch_all(pool)
            .await
    }

    /// List every task of a project in column order.
    ///
    /// Ties on `sort_order` fall back to creation time, then id.
    pub async fn list_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE project_id = $1 \
             ORDER BY sort_order ASC, created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a field patch. Only non-`None` fields are applied; a due date of
    /// `Some(None)` clears it.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_fields(
        pool: &PgPool,
        id: DbId,
        patch: &TaskFieldsPatch,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                priority = COALESCE($4, priority), \
                due_date = CASE WHEN $5 THEN $6 ELSE due_date END, \
                tags = COALESCE($7, tags), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&patch.title)
            .bind(&patch.description)
            .bind(patch.priority.map(|p| p.as_str()))
            .bind(patch.due_date.is_some())
            .bind(patch.due_date.flatten())
            .bind(&patch.tags)
            .fetch_optional(pool)
            .await
    }

    /// Move a task to `status`, and to `order` when given.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn set_position(
        pool: &PgPool,
        id: DbId,
        status: TaskStatus,
        order: Option<i32>,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET \
                status = $2, \
                sort_order = COALESCE($3, sort_order), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(order)
            .fetch_optional(pool)
            .await
    }

    /// Highest `sort_order` in a `(project, status)` column, `None` if empty.
    pub async fn max_order(
        pool: &PgPool,
        project_id: DbId,
        status: TaskStatus,
    ) -> Result<Option<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(sort_order) FROM tasks WHERE project_id = $1 AND status = $2",
        )
        .bind(project_id)
        .bind(status.as_str())
        .fetch_one(pool)
        .await
    }

    /// Number of tasks referencing a project, regardless of status.
    pub async fn count_by_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(pool)
            .await
    }

    /// Permanently delete a task by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every task of a project. Returns the number of rows removed.
    pub async fn delete_by_project(pool: &PgPool, project_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
