//! Pure domain logic for the task board.
//!
//! Everything in this crate is free of I/O: identifier and timestamp aliases,
//! the shared error taxonomy, the task workflow enumerations and field limits,
//! and the question classifier used by the rule-based assistant.

pub mod assistant;
pub mod board;
pub mod error;
pub mod types;
