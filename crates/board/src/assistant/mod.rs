//! Project assistant: summaries, free-text questions and task suggestions.
//!
//! The answering itself is delegated to an [`AnswerProvider`]. Two
//! implementations exist, a keyword-driven [`RuleBasedProvider`] and the
//! LLM-backed [`GeminiProvider`]; [`Assistant`] holds whichever one the
//! server was configured with. The operations in this module load their
//! context through the [`BoardService`], so unknown ids fail the same way
//! they do for the rest of the board.

use std::future::Future;

use chrono::Utc;
use serde::Serialize;
use taskboard_core::assistant::validate_question;
use taskboard_core::error::CoreError;
use taskboard_core::types::{DbId, Timestamp};
use taskboard_db::models::project::Project;
use taskboard_db::models::task::Task;
use taskboard_db::store::BoardStore;

use crate::error::BoardResult;
use crate::query::StatusCounts;
use crate::service::BoardService;

pub mod gemini;
pub mod rules;

pub use gemini::{GeminiConfig, GeminiProvider};
pub use rules::RuleBasedProvider;

/// Summary returned for a project without tasks. The provider is not consulted.
pub const EMPTY_PROJECT_SUMMARY: &str = "This project currently has no tasks to summarize.";

/// Errors from an answer provider.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The provider answered without any usable text.
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

/// Everything a provider may look at when answering about a project.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub project: Project,
    /// The project's tasks in column order.
    pub tasks: Vec<Task>,
    /// The task a question is specifically about, if any.
    pub focus: Option<Task>,
    pub now: Timestamp,
}

impl ProjectContext {
    pub fn counts(&self) -> StatusCounts {
        StatusCounts::from_tasks(&self.tasks)
    }

    pub fn overdue(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_overdue(self.now))
    }
}

/// Capability shared by every assistant backend.
pub trait AnswerProvider: Send + Sync {
    /// Short name reported in responses as `provider`.
    fn name(&self) -> &'static str;

    /// Summarize a project that has at least one task.
    fn summarize(
        &self,
        ctx: &ProjectContext,
    ) -> impl Future<Output = Result<String, AssistantError>> + Send;

    /// Answer a trimmed, length-checked question.
    fn answer(
        &self,
        ctx: &ProjectContext,
        question: &str,
    ) -> impl Future<Output = Result<String, AssistantError>> + Send;

    /// Suggest improvements for one task.
    fn suggest(&self, task: &Task) -> impl Future<Output = Result<String, AssistantError>> + Send;
}

/// Provider selected by configuration.
#[derive(Debug, Clone)]
pub enum Assistant {
    Rules(RuleBasedProvider),
    Gemini(GeminiProvider),
}

impl AnswerProvider for Assistant {
    fn name(&self) -> &'static str {
        match self {
            Assistant::Rules(p) => p.name(),
            Assistant::Gemini(p) => p.name(),
        }
    }

    async fn summarize(&self, ctx: &ProjectContext) -> Result<String, AssistantError> {
        match self {
            Assistant::Rules(p) => p.summarize(ctx).await,
            Assistant::Gemini(p) => p.summarize(ctx).await,
        }
    }

    async fn answer(&self, ctx: &ProjectContext, question: &str) -> Result<String, AssistantError> {
        match self {
            Assistant::Rules(p) => p.answer(ctx, question).await,
            Assistant::Gemini(p) => p.answer(ctx, question).await,
        }
    }

    async fn suggest(&self, task: &Task) -> Result<String, AssistantError> {
        match self {
            Assistant::Rules(p) => p.suggest(task).await,
            Assistant::Gemini(p) => p.suggest(task).await,
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub summary: String,
    pub project_name: String,
    pub task_count: i64,
    pub statistics: StatusCounts,
    /// Completion percentage.
    pub progress: i64,
    pub provider: &'static str,
}

/// Whether a question was asked about the whole project or one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnswerContext {
    AllTasks,
    SpecificTask,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
    pub project_name: String,
    pub context: AnswerContext,
    pub provider: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskSuggestions {
    pub task_id: DbId,
    pub task_title: String,
    pub suggestions: String,
    pub provider: &'static str,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

async fn load_context<S: BoardStore>(
    board: &BoardService<S>,
    project_id: DbId,
    focus: Option<Task>,
) -> BoardResult<ProjectContext> {
    let project = board.get_project(project_id).await?;
    let tasks = board.store().list_tasks_by_project(project_id).await?;
    Ok(ProjectContext {
        project,
        tasks,
        focus,
        now: Utc::now(),
    })
}

/// Summarize a project's tasks.
pub async fn summarize<S, P>(
    board: &BoardService<S>,
    provider: &P,
    project_id: DbId,
) -> BoardResult<ProjectSummary>
where
    S: BoardStore,
    P: AnswerProvider,
{
    let ctx = load_context(board, project_id, None).await?;
    let counts = ctx.counts();

    let summary = if ctx.tasks.is_empty() {
        EMPTY_PROJECT_SUMMARY.to_string()
    } else {
        provider.summarize(&ctx).await.inspect_err(|err| {
            tracing::error!(error = %err, project_id, provider = provider.name(), "Summary failed");
        })?
    };

    tracing::info!(project_id, provider = provider.name(), "Project summarized");
    Ok(ProjectSummary {
        summary,
        project_name: ctx.project.name,
        task_count: counts.total(),
        statistics: counts,
        progress: counts.completion_rate(),
        provider: provider.name(),
    })
}

/// Answer a question about a project, optionally focused on one task.
pub async fn ask<S, P>(
    board: &BoardService<S>,
    provider: &P,
    project_id: DbId,
    question: &str,
    task_id: Option<DbId>,
) -> BoardResult<QuestionAnswer>
where
    S: BoardStore,
    P: AnswerProvider,
{
    let question = question.trim();
    validate_question(question).map_err(CoreError::Validation)?;

    let focus = match task_id {
        Some(id) => Some(board.get_task(id).await?),
        None => None,
    };
    let context = if focus.is_some() {
        AnswerContext::SpecificTask
    } else {
        AnswerContext::AllTasks
    };

    let ctx = load_context(board, project_id, focus).await?;
    let answer = provider.answer(&ctx, question).await.inspect_err(|err| {
        tracing::error!(error = %err, project_id, provider = provider.name(), "Question failed");
    })?;

    tracing::info!(project_id, ?task_id, provider = provider.name(), "Question answered");
    Ok(QuestionAnswer {
        question: question.to_string(),
        answer,
        project_name: ctx.project.name,
        context,
        provider: provider.name(),
    })
}

/// Suggest improvements for a task.
pub async fn suggest<S, P>(
    board: &BoardService<S>,
    provider: &P,
    task_id: DbId,
) -> BoardResult<TaskSuggestions>
where
    S: BoardStore,
    P: AnswerProvider,
{
    let task = board.get_task(task_id).await?;
    let suggestions = provider.suggest(&task).await.inspect_err(|err| {
        tracing::error!(error = %err, task_id, provider = provider.name(), "Suggestions failed");
    })?;

    tracing::info!(task_id, provider = provider.name(), "Task suggestions generated");
    Ok(TaskSuggestions {
        task_id: task.id,
        task_title: task.title,
        suggestions,
        provider: provider.name(),
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use taskboard_db::models::project::CreateProject;
    use taskboard_db::models::task::CreateTask;
    use taskboard_db::store::MemoryStore;

    use super::*;
    use crate::error::BoardError;

    /// Provider that always fails, to check error propagation.
    struct Unreachable;

    impl AnswerProvider for Unreachable {
        fn name(&self) -> &'static str {
            "unreachable"
        }

        async fn summarize(&self, _ctx: &ProjectContext) -> Result<String, AssistantError> {
            Err(AssistantError::EmptyResponse)
        }

        async fn answer(&self, _ctx: &ProjectContext, _q: &str) -> Result<String, AssistantError> {
            Err(AssistantError::Api {
                status: 503,
                body: "overloaded".to_string(),
            })
        }

        async fn suggest(&self, _task: &Task) -> Result<String, AssistantError> {
            Err(AssistantError::EmptyResponse)
        }
    }

    async fn board_with_task() -> (BoardService<MemoryStore>, Project, Task) {
        let board = BoardService::new(MemoryStore::new());
        let project = board
            .create_project(&CreateProject {
                name: "Launch".to_string(),
                description: "v1 release".to_string(),
            })
            .await
            .unwrap();
        let task = board
            .create_task(&CreateTask {
                title: "Design".to_string(),
                description: "mock UI".to_string(),
                project_id: project.id,
                status: None,
                priority: None,
                order: None,
                due_date: None,
                tags: vec![],
            })
            .await
            .unwrap();
        (board, project, task)
    }

    #[tokio::test]
    async fn empty_project_summary_skips_provider() {
        let board = BoardService::new(MemoryStore::new());
        let project = board
            .create_project(&CreateProject {
                name: "Empty".to_string(),
                description: "nothing yet".to_string(),
            })
            .await
            .unwrap();

        let summary = summarize(&board, &Unreachable, project.id).await.unwrap();
        assert_eq!(summary.summary, EMPTY_PROJECT_SUMMARY);
        assert_eq!(summary.task_count, 0);
        assert_eq!(summary.progress, 0);
    }

    #[tokio::test]
    async fn provider_failure_surfaces_as_assistant_error() {
        let (board, project, task) = board_with_task().await;

        assert_matches!(
            summarize(&board, &Unreachable, project.id).await,
            Err(BoardError::Assistant(AssistantError::EmptyResponse))
        );
        assert_matches!(
            ask(&board, &Unreachable, project.id, "how is it going", None).await,
            Err(BoardError::Assistant(AssistantError::Api { status: 503, .. }))
        );
        assert_matches!(
            suggest(&board, &Unreachable, task.id).await,
            Err(BoardError::Assistant(_))
        );
    }

    #[tokio::test]
    async fn ask_trims_and_checks_question_length() {
        let (board, project, _) = board_with_task().await;
        let rules = RuleBasedProvider;

        assert_matches!(
            ask(&board, &rules, project.id, "   hey   ", None).await,
            Err(BoardError::Core(CoreError::Validation(_)))
        );

        let answer = ask(&board, &rules, project.id, "  how many tasks?  ", None)
            .await
            .unwrap();
        assert_eq!(answer.question, "how many tasks?");
        assert_eq!(answer.context, AnswerContext::AllTasks);
        assert_eq!(answer.project_name, "Launch");
        assert_eq!(answer.provider, "rules");
    }

    #[tokio::test]
    async fn ask_about_a_task_requires_it_to_exist() {
        let (board, project, task) = board_with_task().await;
        let rules = RuleBasedProvider;

        let answer = ask(&board, &rules, project.id, "tell me about it", Some(task.id))
            .await
            .unwrap();
        assert_eq!(answer.context, AnswerContext::SpecificTask);
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["context"], "specific-task");

        assert_matches!(
            ask(&board, &rules, project.id, "tell me about it", Some(999)).await,
            Err(BoardError::Core(ref core)) if core.is_task_not_found()
        );
        assert_matches!(
            ask(&board, &rules, 999, "tell me about it", None).await,
            Err(BoardError::Core(ref core)) if core.is_project_not_found()
        );
    }

    #[tokio::test]
    async fn suggest_reports_task_identity() {
        let (board, _, task) = board_with_task().await;
        let out = suggest(&board, &RuleBasedProvider, task.id).await.unwrap();
        assert_eq!(out.task_id, task.id);
        assert_eq!(out.task_title, "Design");
        assert!(!out.suggestions.is_empty());
    }
}
