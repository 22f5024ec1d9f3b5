//! Keyword-driven answer provider. Needs no network access and answers
//! deterministically from the current task set.

use taskboard_core::assistant::{classify_question, QuestionTopic, SHOW_ALL_LIMIT, STATUS_LIST_LIMIT};
use taskboard_core::board::{TaskPriority, TaskStatus};
use taskboard_db::models::task::Task;

use super::{AnswerProvider, AssistantError, ProjectContext};

/// Fixed checklist returned for every task.
const SUGGESTIONS: [&str; 3] = [
    "Review the task description for clarity and completeness",
    "Consider breaking complex work down into smaller subtasks",
    "Set the priority according to the project goals",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedProvider;

impl AnswerProvider for RuleBasedProvider {
    fn name(&self) -> &'static str {
        "rules"
    }

    async fn summarize(&self, ctx: &ProjectContext) -> Result<String, AssistantError> {
        Ok(summary_text(ctx))
    }

    async fn answer(&self, ctx: &ProjectContext, question: &str) -> Result<String, AssistantError> {
        Ok(answer_text(ctx, classify_question(question)))
    }

    async fn suggest(&self, _task: &Task) -> Result<String, AssistantError> {
        Ok(SUGGESTIONS
            .iter()
            .map(|s| format!("- {s}"))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

fn summary_text(ctx: &ProjectContext) -> String {
    let counts = ctx.counts();
    format!(
        "{name}: project analysis\n\
         \n\
         Total tasks: {total}\n\
         To Do: {todo}\n\
         In Progress: {doing}\n\
         Completed: {done}\n\
         Overall progress: {progress}%",
        name = ctx.project.name,
        total = counts.total(),
        todo = counts.to_do,
        doing = counts.in_progress,
        done = counts.done,
        progress = counts.completion_rate(),
    )
}

fn titles<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> String {
    tasks
        .into_iter()
        .map(|t| t.title.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// First `limit` titles, with a trailing `...` when more were left out.
fn truncated_titles(tasks: &[&Task], limit: usize) -> String {
    let mut listed = titles(tasks.iter().take(limit).copied());
    if tasks.len() > limit {
        listed.push_str("...");
    }
    listed
}

fn pending_with_priority(ctx: &ProjectContext, priority: TaskPriority) -> Vec<&Task> {
    ctx.tasks
        .iter()
        .filter(|t| t.priority == priority && t.status != TaskStatus::Done)
        .collect()
}

fn with_status(ctx: &ProjectContext, status: TaskStatus) -> Vec<&Task> {
    ctx.tasks.iter().filter(|t| t.status == status).collect()
}

fn answer_text(ctx: &ProjectContext, topic: QuestionTopic) -> String {
    let name = &ctx.project.name;

    match topic {
        QuestionTopic::Overdue => {
            let overdue: Vec<&Task> = ctx.overdue().collect();
            if overdue.is_empty() {
                "No tasks are currently overdue.".to_string()
            } else {
                format!(
                    "You have {} overdue task(s): {}",
                    overdue.len(),
                    titles(overdue.iter().copied())
                )
            }
        }
        QuestionTopic::Progress => {
            let counts = ctx.counts();
            format!(
                "Project \"{name}\" is {}% complete ({}/{} tasks finished).",
                counts.completion_rate(),
                counts.done,
                counts.total()
            )
        }
        QuestionTopic::PendingByPriority(priority) => {
            let pending = pending_with_priority(ctx, priority);
            let level = priority.as_str().to_lowercase();
            if pending.is_empty() {
                format!("No {level} priority tasks are pending.")
            } else {
                format!(
                    "You have {} {level} priority task(s): {}",
                    pending.len(),
                    titles(pending.iter().copied())
                )
            }
        }
        QuestionTopic::PriorityBreakdown => format!(
            "Priority breakdown: {} high priority, {} medium priority, {} low priority tasks pending.",
            pending_with_priority(ctx, TaskPriority::High).len(),
            pending_with_priority(ctx, TaskPriority::Medium).len(),
            pending_with_priority(ctx, TaskPriority::Low).len(),
        ),
        QuestionTopic::ByStatus(status) => {
            let tasks = with_status(ctx, status);
            match (status, tasks.is_empty()) {
                (TaskStatus::InProgress, true) => {
                    "No tasks are currently in progress. Consider moving some tasks from \"To Do\"."
                        .to_string()
                }
                (TaskStatus::InProgress, false) => format!(
                    "Currently {} task(s) in progress: {}",
                    tasks.len(),
                    titles(tasks.iter().copied())
                ),
                (TaskStatus::ToDo, true) => {
                    "No pending tasks. All tasks are either in progress or completed.".to_string()
                }
                (TaskStatus::ToDo, false) => format!(
                    "You have {} task(s) to start: {}",
                    tasks.len(),
                    truncated_titles(&tasks, STATUS_LIST_LIMIT)
                ),
                (TaskStatus::Done, true) => "No tasks completed yet.".to_string(),
                (TaskStatus::Done, false) => format!(
                    "You have completed {} task(s): {}",
                    tasks.len(),
                    truncated_titles(&tasks, STATUS_LIST_LIMIT)
                ),
            }
        }
        QuestionTopic::Counts => {
            let counts = ctx.counts();
            format!(
                "Project \"{name}\" has {} total tasks: {} to do, {} in progress, {} completed.",
                counts.total(),
                counts.to_do,
                counts.in_progress,
                counts.done
            )
        }
        QuestionTopic::Listing => {
            let mut listed = ctx
                .tasks
                .iter()
                .take(SHOW_ALL_LIMIT)
                .map(|t| format!("\"{}\" ({}, {} priority)", t.title, t.status, t.priority))
                .collect::<Vec<_>>()
                .join(", ");
            if ctx.tasks.len() > SHOW_ALL_LIMIT {
                listed.push_str("...");
            }
            format!("Here are all tasks: {listed}")
        }
        QuestionTopic::Help => match &ctx.focus {
            Some(task) => focus_text(task, ctx),
            None => format!(
                "I can help analyze your project \"{name}\" with {} tasks. Try asking about: \
                 project progress, overdue tasks, high priority items, task counts, or specific \
                 task statuses.",
                ctx.tasks.len()
            ),
        },
    }
}

fn focus_text(task: &Task, ctx: &ProjectContext) -> String {
    let mut text = format!(
        "\"{}\" is in {} with {} priority",
        task.title, task.status, task.priority
    );
    if let Some(due) = task.due_date {
        text.push_str(&format!(", due {}", due.format("%Y-%m-%d")));
        if task.is_overdue(ctx.now) {
            text.push_str(" (overdue)");
        }
    }
    text.push('.');
    text
}
