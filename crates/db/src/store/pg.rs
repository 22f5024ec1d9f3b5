//! PostgreSQL-backed [`BoardStore`].

use taskboard_core::board::TaskStatus;
use taskboard_core::types::DbId;

use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::task::{NewTask, Task, TaskFieldsPatch, TaskFilter};
use crate::repositories::{ProjectRepo, TaskRepo};
use crate::store::{BoardStore, StoreResult};
use crate::DbPool;

/// Thin adapter from [`BoardStore`] onto the table repositories.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl BoardStore for PgStore {
    async fn create_project(&self, input: &CreateProject) -> StoreResult<Project> {
        ProjectRepo::create(&self.pool, input).await
    }

    async fn get_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        ProjectRepo::find_by_id(&self.pool, id).await
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        ProjectRepo::list(&self.pool).await
    }

    async fn update_project(&self, id: DbId, input: &UpdateProject) -> StoreResult<Option<Project>> {
        ProjectRepo::update(&self.pool, id, input).await
    }

    async fn delete_project(&self, id: DbId) -> StoreResult<bool> {
        ProjectRepo::delete(&self.pool, id).await
    }

    async fn set_task_count(&self, project_id: DbId, count: i64) -> StoreResult<bool> {
        ProjectRepo::set_task_count(&self.pool, project_id, count).await
    }

    async fn create_task(&self, input: &NewTask) -> StoreResult<Task> {
        TaskRepo::create(&self.pool, input).await
    }

    async fn get_task(&self, id: DbId) -> StoreResult<Option<Task>> {
        TaskRepo::find_by_id(&self.pool, id).await
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        TaskRepo::list(&self.pool, filter).await
    }

    async fn list_tasks_by_project(&self, project_id: DbId) -> StoreResult<Vec<Task>> {
        TaskRepo::list_by_project(&self.pool, project_id).await
    }

    async fn update_task_fields(
        &self,
        id: DbId,
        patch: &TaskFieldsPatch,
    ) -> StoreResult<Option<Task>> {
        TaskRepo::update_fields(&self.pool, id, patch).await
    }

    async fn set_task_position(
        &self,
        id: DbId,
        status: TaskStatus,
        order: Option<i32>,
    ) -> StoreResult<Option<Task>> {
        TaskRepo::set_position(&self.pool, id, status, order).await
    }

    async fn delete_task(&self, id: DbId) -> StoreResult<bool> {
        TaskRepo::delete(&self.pool, id).await
    }

    async fn delete_tasks_by_project(&self, project_id: DbId) -> StoreResult<u64> {
        TaskRepo::delete_by_project(&self.pool, project_id).await
    }

    async fn max_order(&self, project_id: DbId, status: TaskStatus) -> StoreResult<Option<i32>> {
        TaskRepo::max_order(&self.pool, project_id, status).await
    }

    async fn count_tasks(&self, project_id: DbId) -> StoreResult<i64> {
        TaskRepo::count_by_project(&self.pool, project_id).await
    }
}
