pub mod assistant;
pub mod health;
pub mod project;
pub mod task;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                 list, create
/// /projects/{id}                            get, update, delete (cascades to tasks)
/// /projects/{id}/stats                      completion statistics
/// /projects/{id}/tasks                      tasks grouped by status
///
/// /tasks                                    filtered list, create
/// /tasks/reorder                            bulk reorder (PATCH)
/// /tasks/{id}                               get, update fields, delete
/// /tasks/{id}/status                        transition status (PATCH)
///
/// /assistant/summarize                      project summary (POST)
/// /assistant/question                       free-text question (POST)
/// /assistant/suggestions                    task suggestions (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/tasks", task::router())
        .nest("/assistant", assistant::router())
}
