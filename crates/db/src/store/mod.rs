//! Storage abstraction the board service is written against.
//!
//! [`BoardStore`] is raw CRUD keyed by id: lookups that miss return `None`
//! (or `false` for deletes) and no cross-entity rule is enforced here.
//! [`Store`] picks an implementation at startup.

use std::future::Future;

use taskboard_core::board::TaskStatus;
use taskboard_core::types::DbId;

use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::task::{NewTask, Task, TaskFieldsPatch, TaskFilter};

pub mod memory;
pub mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Result type for store operations. The in-memory store never fails.
pub type StoreResult<T> = Result<T, sqlx::Error>;

/// Durable storage and point lookups for projects and tasks.
pub trait BoardStore: Send + Sync {
    fn create_project(
        &self,
        input: &CreateProject,
    ) -> impl Future<Output = StoreResult<Project>> + Send;

    fn get_project(&self, id: DbId) -> impl Future<Output = StoreResult<Option<Project>>> + Send;

    /// Newest first.
    fn list_projects(&self) -> impl Future<Output = StoreResult<Vec<Project>>> + Send;

    fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> impl Future<Output = StoreResult<Option<Project>>> + Send;

    /// Removes the project row only.
    fn delete_project(&self, id: DbId) -> impl Future<Output = StoreResult<bool>> + Send;

    fn set_task_count(
        &self,
        project_id: DbId,
        count: i64,
    ) -> impl Future<Output = StoreResult<bool>> + Send;

    fn create_task(&self, input: &NewTask) -> impl Future<Output = StoreResult<Task>> + Send;

    fn get_task(&self, id: DbId) -> impl Future<Output = StoreResult<Option<Task>>> + Send;

    /// Ordered by `order` ascending, then newest first.
    fn list_tasks(
        &self,
        filter: &TaskFilter,
    ) -> impl Future<Output = StoreResult<Vec<Task>>> + Send;

    /// Ordered by `order`, then creation time, then id.
    fn list_tasks_by_project(
        &self,
        project_id: DbId,
    ) -> impl Future<Output = StoreResult<Vec<Task>>> + Send;

    fn update_task_fields(
        &self,
        id: DbId,
        patch: &TaskFieldsPatch,
    ) -> impl Future<Output = StoreResult<Option<Task>>> + Send;

    fn set_task_position(
        &self,
        id: DbId,
        status: TaskStatus,
        order: Option<i32>,
    ) -> impl Future<Output = StoreResult<Option<Task>>> + Send;

    fn delete_task(&self, id: DbId) -> impl Future<Output = StoreResult<bool>> + Send;

    fn delete_tasks_by_project(
        &self,
        project_id: DbId,
    ) -> impl Future<Output = StoreResult<u64>> + Send;

    fn max_order(
        &self,
        project_id: DbId,
        status: TaskStatus,
    ) -> impl Future<Output = StoreResult<Option<i32>>> + Send;

    fn count_tasks(&self, project_id: DbId) -> impl Future<Output = StoreResult<i64>> + Send;
}

/// Backend selected by configuration.
#[derive(Debug, Clone)]
pub enum Store {
    Postgres(PgStore),
    Memory(MemoryStore),
}

impl Store {
    /// Short backend name for logging.
    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Postgres(_) => "postgres",
            Store::Memory(_) => "memory",
        }
    }
}

impl From<PgStore> for Store {
    fn from(store: PgStore) -> Self {
        Store::Postgres(store)
    }
}

impl From<MemoryStore> for Store {
    fn from(store: MemoryStore) -> Self {
        Store::Memory(store)
    }
}

/// Forward a trait method to whichever backend is active.
macro_rules! dispatch {
    ($self:ident . $method:ident ( $($arg:expr),* )) => {
        match $self {
            Store::Postgres(store) => store.$method($($arg),*).await,
            Store::Memory(store) => store.$method($($arg),*).await,
        }
    };
}

impl BoardStore for Store {
    async fn create_project(&self, input: &CreateProject) -> StoreResult<Project> {
        dispatch!(self.create_project(input))
    }

    async fn get_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        dispatch!(self.get_project(id))
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        dispatch!(self.list_projects())
    }

    async fn update_project(&self, id: DbId, input: &UpdateProject) -> StoreResult<Option<Project>> {
        dispatch!(self.update_project(id, input))
    }

    async fn delete_project(&self, id: DbId) -> StoreResult<bool> {
        dispatch!(self.delete_project(id))
    }

    async fn set_task_count(&self, project_id: DbId, count: i64) -> StoreResult<bool> {
        dispatch!(self.set_task_count(project_id, count))
    }

    async fn create_task(&self, input: &NewTask) -> StoreResult<Task> {
        dispatch!(self.create_task(input))
    }

    async fn get_task(&self, id: DbId) -> StoreResult<Option<Task>> {
        dispatch!(self.get_task(id))
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        dispatch!(self.list_tasks(filter))
    }

    async fn list_tasks_by_project(&self, project_id: DbId) -> StoreResult<Vec<Task>> {
        dispatch!(self.list_tasks_by_project(project_id))
    }

    async fn update_task_fields(
        &self,
        id: DbId,
        patch: &TaskFieldsPatch,
    ) -> StoreResult<Option<Task>> {
        dispatch!(self.update_task_fields(id, patch))
    }

    async fn set_task_position(
        &self,
        id: DbId,
        status: TaskStatus,
        order: Option<i32>,
    ) -> StoreResult<Option<Task>> {
        dispatch!(self.set_task_position(id, status, order))
    }

    async fn delete_task(&self, id: DbId) -> StoreResult<bool> {
        dispatch!(self.delete_task(id))
    }

    async fn delete_tasks_by_project(&self, project_id: DbId) -> StoreResult<u64> {
        dispatch!(self.delete_tasks_by_project(project_id))
    }

    async fn max_order(&self, project_id: DbId, status: TaskStatus) -> StoreResult<Option<i32>> {
        dispatch!(self.max_order(project_id, status))
    }

    async fn count_tasks(&self, project_id: DbId) -> StoreResult<i64> {
        dispatch!(self.count_tasks(project_id))
    }
}
