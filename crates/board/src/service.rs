//! Mutations of projects and tasks.
//!
//! [`BoardService`] is the only writer of task `status`/`order` and of the
//! project `task_count` cache. Callers validate field shapes first (the
//! `normalize` + `validate` pair on each DTO); the service resolves
//! references, parses the closed enumerations and keeps derived values in
//! step.

use serde::Serialize;
use taskboard_core::board::{self, TaskPriority, TaskStatus};
use taskboard_core::error::CoreError;
use taskboard_core::types::DbId;
use taskboard_db::models::project::{CreateProject, Project, UpdateProject};
use taskboard_db::models::task::{
    CreateTask, NewTask, ReorderEntryInput, Task, TaskFieldsPatch, TaskFilter, UpdateTask,
};
use taskboard_db::store::BoardStore;

use crate::error::BoardResult;
use crate::query::{self, GroupedTasks, ProjectStats};

/// A validated bulk-reorder entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderEntry {
    pub id: DbId,
    pub status: TaskStatus,
    pub order: i32,
}

/// Parse every entry of a reorder batch, rejecting the whole batch on the
/// first malformed entry. Nothing is applied when this fails.
pub fn parse_reorder_entries(entries: &[ReorderEntryInput]) -> Result<Vec<ReorderEntry>, CoreError> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let status = TaskStatus::parse(&entry.status).map_err(|err| match err {
                CoreError::InvalidStatus(msg) => {
                    CoreError::InvalidStatus(format!("entry {index}: {msg}"))
                }
                other => other,
            })?;
            board::validate_order(entry.order)
                .map_err(|msg| CoreError::Validation(format!("entry {index}: {msg}")))?;
            Ok(ReorderEntry {
                id: entry.id,
                status,
                order: entry.order,
            })
        })
        .collect()
}

/// Why a reorder batch stopped early.
#[derive(Debug, Clone, Serialize)]
pub struct ReorderFailure {
    /// Zero-based position of the failing entry in the submitted batch.
    pub index: usize,
    pub id: DbId,
    pub code: &'static str,
    pub message: String,
}

/// Result of a bulk reorder. Entries before `failed.index` were applied;
/// the failing entry and everything after it were not.
#[derive(Debug, Clone, Serialize)]
pub struct ReorderOutcome {
    pub updated: Vec<Task>,
    pub failed: Option<ReorderFailure>,
}

impl ReorderOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }
}

/// Task workflow rules over a [`BoardStore`].
#[derive(Debug, Clone)]
pub struct BoardService<S> {
    store: S,
}

impl<S: BoardStore> BoardService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    pub async fn create_project(&self, input: &CreateProject) -> BoardResult<Project> {
        let project = self.store.create_project(input).await?;
        tracing::info!(project_id = project.id, name = %project.name, "Project created");
        Ok(project)
    }

    pub async fn get_project(&self, id: DbId) -> BoardResult<Project> {
        self.store
            .get_project(id)
            .await?
            .ok_or_else(|| CoreError::project_not_found(id).into())
    }

    pub async fn list_projects(&self) -> BoardResult<Vec<Project>> {
        Ok(self.store.list_projects().await?)
    }

    pub async fn update_project(&self, id: DbId, input: &UpdateProject) -> BoardResult<Project> {
        let project = self
            .store
            .update_project(id, input)
            .await?
            .ok_or_else(|| CoreError::project_not_found(id))?;
        tracing::info!(project_id = id, "Project updated");
        Ok(project)
    }

    /// Delete a project and every task referencing it.
    ///
    /// Tasks go first, then the project. The two steps are independent
    /// writes: if the second fails, the project survives with no tasks.
    pub async fn delete_project(&self, id: DbId) -> BoardResult<()> {
        if self.store.get_project(id).await?.is_none() {
            return Err(CoreError::project_not_found(id).into());
        }

        let removed_tasks = self.store.delete_tasks_by_project(id).await?;
        if !self.store.delete_project(id).await? {
            return Err(CoreError::project_not_found(id).into());
        }

        tracing::info!(project_id = id, removed_tasks, "Project deleted with its tasks");
        Ok(())
    }

    pub async fn project_stats(&self, id: DbId) -> BoardResult<ProjectStats> {
        query::project_stats(&self.store, id).await
    }

    pub async fn grouped_by_status(&self, project_id: DbId) -> BoardResult<GroupedTasks> {
        query::grouped_by_status(&self.store, project_id).await
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    /// Create a task at the end of its column unless `order` is given.
    pub async fn create_task(&self, input: &CreateTask) -> BoardResult<Task> {
        let status = input
            .status
            .as_deref()
            .map(TaskStatus::parse)
            .transpose()?
            .unwrap_or_default();
        let priority = input
            .priority
            .as_deref()
            .map(TaskPriority::parse)
            .transpose()?
            .unwrap_or_default();

        if self.store.get_project(input.project_id).await?.is_none() {
            return Err(CoreError::project_not_found(input.project_id).into());
        }

        let order = match input.order {
            Some(order) => order,
            None => board::next_order(self.store.max_order(input.project_id, status).await?),
        };

        let new_task = NewTask {
            title: input.title.clone(),
            description: input.description.clone(),
            project_id: input.project_id,
            status,
            priority,
            order,
            due_date: input.due_date,
            tags: input.tags.clone(),
        };
        let task = self.store.create_task(&new_task).await?;

        tracing::info!(
            task_id = task.id,
            project_id = task.project_id,
            status = %task.status,
            order = task.order,
            "Task created"
        );

        self.recompute_task_count(task.project_id).await?;
        Ok(task)
    }

    pub async fn get_task(&self, id: DbId) -> BoardResult<Task> {
        self.store
            .get_task(id)
            .await?
            .ok_or_else(|| CoreError::task_not_found(id).into())
    }

    pub async fn list_tasks(&self, filter: &TaskFilter) -> BoardResult<Vec<Task>> {
        Ok(self.store.list_tasks(filter).await?)
    }

    /// Update descriptive fields. Status, order and project are untouched.
    pub async fn update_task_fields(&self, id: DbId, input: &UpdateTask) -> BoardResult<Task> {
        let patch = TaskFieldsPatch {
            title: input.title.clone(),
            description: input.description.clone(),
            priority: input
                .priority
                .as_deref()
                .map(TaskPriority::parse)
                .transpose()?,
            due_date: input.due_date,
            tags: input.tags.clone(),
        };

        let task = self
            .store
            .update_task_fields(id, &patch)
            .await?
            .ok_or_else(|| CoreError::task_not_found(id))?;
        tracing::info!(task_id = id, "Task fields updated");
        Ok(task)
    }

    /// Move a task to another column, optionally at a given position.
    ///
    /// Siblings are not renumbered; keeping a column tidy is the job of a
    /// following bulk reorder. An invalid status fails before any write.
    pub async fn transition_status(
        &self,
        id: DbId,
        status: &str,
        order: Option<i32>,
    ) -> BoardResult<Task> {
        let status = TaskStatus::parse(status)?;
        if let Some(order) = order {
            board::validate_order(order).map_err(CoreError::Validation)?;
        }

        let task = self
            .store
            .set_task_position(id, status, order)
            .await?
            .ok_or_else(|| CoreError::task_not_found(id))?;

        tracing::info!(
            task_id = id,
            status = %task.status,
            order = task.order,
            "Task status changed"
        );
        Ok(task)
    }

    /// Apply each entry in sequence, stopping at the first failure.
    ///
    /// Entries are not checked against each other; the caller is trusted to
    /// send a consistent snapshot of the affected columns. Already-applied
    /// entries are never rolled back.
    pub async fn bulk_reorder(&self, entries: &[ReorderEntry]) -> ReorderOutcome {
        let mut updated = Vec::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            let result = self
                .store
                .set_task_position(entry.id, entry.status, Some(entry.order))
                .await;

            let failure = match result {
                Ok(Some(task)) => {
                    updated.push(task);
                    continue;
                }
                Ok(None) => ReorderFailure {
                    index,
                    id: entry.id,
                    code: "NOT_FOUND",
                    message: format!("Task with id {} not found", entry.id),
                },
                Err(err) => {
                    tracing::error!(error = %err, task_id = entry.id, index, "Reorder entry failed");
                    ReorderFailure {
                        index,
                        id: entry.id,
                        code: "INTERNAL_ERROR",
                        message: "An internal error occurred".to_string(),
                    }
                }
            };

            tracing::warn!(
                applied = updated.len(),
                submitted = entries.len(),
                failed_task_id = failure.id,
                "Bulk reorder stopped early"
            );
            return ReorderOutcome {
                updated,
                failed: Some(failure),
            };
        }

        tracing::info!(applied = updated.len(), "Bulk reorder applied");
        ReorderOutcome {
            updated,
            failed: None,
        }
    }

    /// Delete a task and refresh its former project's `task_count`.
    pub async fn delete_task(&self, id: DbId) -> BoardResult<()> {
        let task = self.get_task(id).await?;
        if !self.store.delete_task(id).await? {
            return Err(CoreError::task_not_found(id).into());
        }
        tracing::info!(task_id = id, project_id = task.project_id, "Task deleted");

        self.recompute_task_count(task.project_id).await?;
        Ok(())
    }

    /// Post-write hook run after every task create and delete: count the
    /// project's tasks and store the result in its `task_count`.
    ///
    /// Read-then-write; concurrent task writes may leave the cache briefly
    /// stale until the next recompute. A project that no longer exists is
    /// skipped.
    pub async fn recompute_task_count(&self, project_id: DbId) -> BoardResult<i64> {
        let count = self.store.count_tasks(project_id).await?;
        let updated = self.store.set_task_count(project_id, count).await?;
        if updated {
            tracing::debug!(project_id, task_count = count, "Task count recomputed");
        } else {
            tracing::debug!(project_id, "Task count recompute skipped: project missing");
        }
        Ok(count)
    }
}
