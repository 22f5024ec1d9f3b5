pub mod assistant;
pub mod project;
pub mod task;
