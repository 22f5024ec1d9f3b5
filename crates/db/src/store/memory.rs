//! Process-local [`BoardStore`] used for development and tests.
//!
//! Mirrors the ordering and patch semantics of the SQL repositories. Each
//! call takes the lock once and releases it before returning, so a sequence
//! of calls interleaves with other callers exactly like separate SQL
//! statements would.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use taskboard_core::board::TaskStatus;
use taskboard_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::task::{NewTask, Task, TaskFieldsPatch, TaskFilter};
use crate::store::{BoardStore, StoreResult};

#[derive(Debug, Default)]
struct MemoryState {
    projects: BTreeMap<DbId, Project>,
    tasks: BTreeMap<DbId, Task>,
    last_project_id: DbId,
    last_task_id: DbId,
}

/// In-memory store. Clones share the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BoardStore for MemoryStore {
    async fn create_project(&self, input: &CreateProject) -> StoreResult<Project> {
        let mut state = self.state.write().await;
        state.last_project_id += 1;
        let now = Utc::now();
        let project = Project {
            id: state.last_project_id,
            name: input.name.clone(),
            description: input.description.clone(),
            task_count: 0,
            created_at: now,
            updated_at: now,
        };
        state.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn get_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        Ok(self.state.read().await.projects.get(&id).cloned())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let state = self.state.read().await;
        let mut projects: Vec<Project> = state.projects.values().cloned().collect();
        projects.sort_by_key(|p| Reverse((p.created_at, p.id)));
        Ok(projects)
    }

    async fn update_project(&self, id: DbId, input: &UpdateProject) -> StoreResult<Option<Project>> {
        let mut state = self.state.write().await;
        let Some(project) = state.projects.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &input.name {
            project.name = name.clone();
        }
        if let Some(description) = &input.description {
            project.description = description.clone();
        }
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.state.write().await.projects.remove(&id).is_some())
    }

    async fn set_task_count(&self, project_id: DbId, count: i64) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        match state.projects.get_mut(&project_id) {
            Some(project) => {
                project.task_count = count;
                project.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_task(&self, input: &NewTask) -> StoreResult<Task> {
        let mut state = self.state.write().await;
        state.last_task_id += 1;
        let now = Utc::now();
        let task = Task {
            id: state.last_task_id,
            title: input.title.clone(),
            description: input.description.clone(),
            status: input.status,
            priority: input.priority,
            project_id: input.project_id,
            order: input.order,
            due_date: input.due_date,
            tags: input.tags.clone(),
            created_at: now,
            updated_at: now,
        };
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: DbId) -> StoreResult<Option<Task>> {
        Ok(self.state.read().await.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let now = Utc::now();
        let state = self.state.read().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| filter.matches(t, now))
            .cloned()
            .collect();
        tasks.sort_by_key(|t| (t.order, Reverse((t.created_at, t.id))));
        Ok(tasks)
    }

    async fn list_tasks_by_project(&self, project_id: DbId) -> StoreResult<Vec<Task>> {
        let state = self.state.read().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| (t.order, t.created_at, t.id));
        Ok(tasks)
    }

    async fn update_task_fields(
        &self,
        id: DbId,
        patch: &TaskFieldsPatch,
    ) -> StoreResult<Option<Task>> {
        let mut state = self.state.write().await;
        let Some(task) = state.tasks.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = &patch.title {
            task.title = title.clone();
        }
        if let Some(description) = &patch.description {
            task.description = description.clone();
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        if let Some(tags) = &patch.tags {
            task.tags = tags.clone();
        }
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn set_task_position(
        &self,
        id: DbId,
        status: TaskStatus,
        order: Option<i32>,
    ) -> StoreResult<Option<Task>> {
        let mut state = self.state.write().await;
        let Some(task) = state.tasks.get_mut(&id) else {
            return Ok(None);
        };
        task.status = status;
        if let Some(order) = order {
            task.order = order;
        }
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.state.write().await.tasks.remove(&id).is_some())
    }

    async fn delete_tasks_by_project(&self, project_id: DbId) -> StoreResult<u64> {
        let mut state = self.state.write().await;
        let before = state.tasks.len();
        state.tasks.retain(|_, t| t.project_id != project_id);
        Ok((before - state.tasks.len()) as u64)
    }

    async fn max_order(&self, project_id: DbId, status: TaskStatus) -> StoreResult<Option<i32>> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .values()
            .filter(|t| t.project_id == project_id && t.status == status)
            .map(|t| t.order)
            .max())
    }

    async fn count_tasks(&self, project_id: DbId) -> StoreResult<i64> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .count() as i64)
    }
}
