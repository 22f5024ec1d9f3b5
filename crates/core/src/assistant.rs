//! Question classification for the rule-based assistant.
//!
//! Maps a free-text question to one of a fixed set of topics by keyword
//! matching. Checks run in a fixed precedence order so that, for example,
//! "high priority" wins over the bare word "priority".

use crate::board::{TaskPriority, TaskStatus};

/// Minimum length of an assistant question in characters (after trimming).
pub const MIN_QUESTION_LENGTH: usize = 5;

/// Maximum length of an assistant question in characters.
pub const MAX_QUESTION_LENGTH: usize = 500;

/// Number of task titles listed before an answer is truncated with `...`.
pub const STATUS_LIST_LIMIT: usize = 5;

/// Number of tasks listed by the catch-all "show me" answer.
pub const SHOW_ALL_LIMIT: usize = 10;

/// What a question is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionTopic {
    /// Open tasks whose due date has passed.
    Overdue,
    /// Completion percentage.
    Progress,
    /// Open tasks of one priority.
    PendingByPriority(TaskPriority),
    /// Open task counts per priority.
    PriorityBreakdown,
    /// Tasks in one status column.
    ByStatus(TaskStatus),
    /// Task counts per status.
    Counts,
    /// Listing of every task with its status and priority.
    Listing,
    /// Nothing matched.
    Help,
}

/// Classify a question into a [`QuestionTopic`]. Matching is case-insensitive.
pub fn classify_question(question: &str) -> QuestionTopic {
    let q = question.to_lowercase();
    let has = |needle: &str| q.contains(needle);

    if has("overdue") || has("late") {
        QuestionTopic::Overdue
    } else if has("progress") || has("complete") {
        QuestionTopic::Progress
    } else if has("high priority") || has("urgent") || has("high") {
        QuestionTopic::PendingByPriority(TaskPriority::High)
    } else if has("medium priority") || has("medium") {
        QuestionTopic::PendingByPriority(TaskPriority::Medium)
    } else if has("low priority") || has("low") {
        QuestionTopic::PendingByPriority(TaskPriority::Low)
    } else if has("priority") {
        QuestionTopic::PriorityBreakdown
    } else if has("in progress") || has("working") {
        QuestionTopic::ByStatus(TaskStatus::InProgress)
    } else if has("todo") || has("to do") || has("pending") {
        QuestionTopic::ByStatus(TaskStatus::ToDo)
    } else if has("done") || has("finished") || has("completed") {
        QuestionTopic::ByStatus(TaskStatus::Done)
    } else if has("count") || has("how many") {
        QuestionTopic::Counts
    } else if has("which") || has("what tasks") || has("show me") {
        QuestionTopic::Listing
    } else {
        QuestionTopic::Help
    }
}

/// Validate question length after trimming.
pub fn validate_question(question: &str) -> Result<(), String> {
    let len = question.trim().chars().count();
    if len < MIN_QUESTION_LENGTH {
        return Err(format!(
            "Question must be at least {MIN_QUESTION_LENGTH} characters"
        ));
    }
    if len > MAX_QUESTION_LENGTH {
        return Err(format!(
            "Question exceeds maximum length of {MAX_QUESTION_LENGTH} characters"
        ));
    }
    Ok(())
}
