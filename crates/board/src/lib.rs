//! Board service: the task workflow rules on top of a [`BoardStore`].
//!
//! - [`service`]: every mutation of tasks and projects, including cascade
//!   delete, bulk reorder and the `task_count` post-write recompute.
//! - [`query`]: read-only grouped views and completion statistics.
//! - [`assistant`]: answer providers for questions about a project.
//!
//! [`BoardStore`]: taskboard_db::store::BoardStore

pub mod assistant;
pub mod error;
pub mod query;
pub mod service;

pub use error::{BoardError, BoardResult};
pub use service::BoardService;
