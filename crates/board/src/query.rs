//! Read-side views over a project's tasks: the three-column board and
//! completion statistics.

use serde::Serialize;
use taskboard_core::board::{self, TaskStatus};
use taskboard_core::error::CoreError;
use taskboard_core::types::DbId;
use taskboard_db::models::project::Project;
use taskboard_db::models::task::Task;
use taskboard_db::store::BoardStore;

use crate::error::BoardResult;

/// A project's tasks split into the three status columns.
///
/// Always serializes with exactly the keys `To Do`, `In Progress` and
/// `Done`, empty columns included.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupedTasks {
    #[serde(rename = "To Do")]
    pub to_do: Vec<Task>,
    #[serde(rename = "In Progress")]
    pub in_progress: Vec<Task>,
    #[serde(rename = "Done")]
    pub done: Vec<Task>,
}

impl GroupedTasks {
    /// Split tasks by status, keeping their relative order.
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut grouped = Self::default();
        for task in tasks {
            grouped.bucket_mut(task.status).push(task);
        }
        grouped
    }

    pub fn bucket(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::ToDo => &self.to_do,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    fn bucket_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        match status {
            TaskStatus::ToDo => &mut self.to_do,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Done => &mut self.done,
        }
    }

    pub fn len(&self) -> usize {
        self.to_do.len() + self.in_progress.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Number of tasks per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    #[serde(rename = "To Do")]
    pub to_do: i64,
    #[serde(rename = "In Progress")]
    pub in_progress: i64,
    #[serde(rename = "Done")]
    pub done: i64,
}

impl StatusCounts {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            match task.status {
                TaskStatus::ToDo => counts.to_do += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
                TaskStatus::Done => counts.done += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> i64 {
        self.to_do + self.in_progress + self.done
    }

    /// Rounded percentage of done tasks; 0 when there are none.
    pub fn completion_rate(&self) -> i64 {
        board::completion_rate(self.done, self.total())
    }
}

/// Completion statistics for one project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectStats {
    pub project_id: DbId,
    pub project_name: String,
    pub total_tasks: i64,
    pub tasks_by_status: StatusCounts,
    pub completion_rate: i64,
}

impl ProjectStats {
    pub fn new(project: &Project, tasks: &[Task]) -> Self {
        let counts = StatusCounts::from_tasks(tasks);
        Self {
            project_id: project.id,
            project_name: project.name.clone(),
            total_tasks: counts.total(),
            tasks_by_status: counts,
            completion_rate: counts.completion_rate(),
        }
    }
}

async fn require_project<S: BoardStore>(store: &S, project_id: DbId) -> BoardResult<Project> {
    store
        .get_project(project_id)
        .await?
        .ok_or_else(|| CoreError::project_not_found(project_id).into())
}

/// Tasks of a project grouped by status, each column ascending by `order`.
pub async fn grouped_by_status<S: BoardStore>(
    store: &S,
    project_id: DbId,
) -> BoardResult<GroupedTasks> {
    require_project(store, project_id).await?;
    let tasks = store.list_tasks_by_project(project_id).await?;
    Ok(GroupedTasks::from_tasks(tasks))
}

/// Totals per status and completion rate, counted from the live task set
/// rather than the cached `task_count`.
pub async fn project_stats<S: BoardStore>(store: &S, project_id: DbId) -> BoardResult<ProjectStats> {
    let project = require_project(store, project_id).await?;
    let tasks = store.list_tasks_by_project(project_id).await?;
    Ok(ProjectStats::new(&project, &tasks))
}
