//! Answer provider backed by the Gemini `generateContent` REST API.
//!
//! Prompt construction and response parsing are plain functions; only
//! [`GeminiProvider::generate`] touches the network.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use taskboard_db::models::task::Task;

use super::{AnswerProvider, AssistantError, ProjectContext};

/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Connection settings for [`GeminiProvider`].
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Gemini-backed provider. One request per answer, no retries.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send one prompt and return the first candidate's text.
    async fn generate(&self, prompt: String) -> Result<String, AssistantError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AssistantError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        tracing::debug!(model = %self.config.model, "Gemini response received");
        extract_text(parsed)
    }
}

impl AnswerProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn summarize(&self, ctx: &ProjectContext) -> Result<String, AssistantError> {
        self.generate(summary_prompt(ctx)).await
    }

    async fn answer(&self, ctx: &ProjectContext, question: &str) -> Result<String, AssistantError> {
        self.generate(question_prompt(ctx, question)).await
    }

    async fn suggest(&self, task: &Task) -> Result<String, AssistantError> {
        self.generate(suggestion_prompt(task)).await
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

/// Concatenated text parts of the first candidate, trimmed.
pub fn extract_text(response: GenerateResponse) -> Result<String, AssistantError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        return Err(AssistantError::EmptyResponse);
    }
    Ok(text.to_string())
}

// ---------------------------------------------------------------------------
// Prompts
// ---------------------------------------------------------------------------

fn task_line(task: &Task, ctx: &ProjectContext) -> String {
    let mut line = format!(
        "- {} [{}, {} priority",
        task.title, task.status, task.priority
    );
    if let Some(due) = task.due_date {
        line.push_str(&format!(", due {}", due.format("%Y-%m-%d")));
    }
    if task.is_overdue(ctx.now) {
        line.push_str(", overdue");
    }
    line.push(']');
    if !task.tags.is_empty() {
        line.push_str(&format!(" tags: {}", task.tags.join(", ")));
    }
    line
}

fn project_block(ctx: &ProjectContext) -> String {
    let counts = ctx.counts();
    let mut block = format!(
        "Project: {}\nDescription: {}\nTasks: {} total, {} to do, {} in progress, {} done ({}% complete)\n",
        ctx.project.name,
        ctx.project.description,
        counts.total(),
        counts.to_do,
        counts.in_progress,
        counts.done,
        counts.completion_rate(),
    );
    for task in &ctx.tasks {
        block.push_str(&task_line(task, ctx));
        block.push('\n');
    }
    block
}

pub fn summary_prompt(ctx: &ProjectContext) -> String {
    format!(
        "You are a project management assistant. Write a short status summary of the \
         project below: overall progress, what is in flight, and any risks such as overdue \
         or high priority work. Use plain text.\n\n{}",
        project_block(ctx)
    )
}

pub fn question_prompt(ctx: &ProjectContext, question: &str) -> String {
    let mut prompt = format!(
        "You are a project management assistant. Answer the question using only the \
         project data below. Be concise.\n\n{}",
        project_block(ctx)
    );
    if let Some(task) = &ctx.focus {
        prompt.push_str(&format!(
            "\nThe question is about this task:\n{}\nDescription: {}\n",
            task_line(task, ctx),
            task.description
        ));
    }
    prompt.push_str(&format!("\nQuestion: {question}"));
    prompt
}

pub fn suggestion_prompt(task: &Task) -> String {
    format!(
        "You are a project management assistant. Suggest up to three concrete improvements \
         for the task below, one per line starting with \"- \".\n\n\
         Title: {}\nDescription: {}\nStatus: {}\nPriority: {}",
        task.title, task.description, task.status, task.priority
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration as ChronoDuration, Utc};
    use taskboard_core::board::{TaskPriority, TaskStatus};
    use taskboard_db::models::project::Project;

    use super::*;

    fn context() -> ProjectContext {
        let now = Utc::now();
        let task = Task {
            id: 1,
            title: "Design".to_string(),
            description: "mock UI".to_string(),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            project_id: 1,
            order: 0,
            due_date: Some(now - ChronoDuration::days(2)),
            tags: vec!["ui".to_string()],
            created_at: now,
            updated_at: now,
        };
        ProjectContext {
            project: Project {
                id: 1,
                name: "Launch".to_string(),
                description: "v1 release".to_string(),
                task_count: 1,
                created_at: now,
                updated_at: now,
            },
            tasks: vec![task],
            focus: None,
            now,
        }
    }

    #[test]
    fn prompts_carry_project_data() {
        let ctx = context();
        let prompt = summary_prompt(&ctx);
        assert!(prompt.contains("Project: Launch"));
        assert!(prompt.contains("- Design [In Progress, High priority, due "));
        assert!(prompt.contains(", overdue] tags: ui"));
        assert!(prompt.contains("1 total, 0 to do, 1 in progress, 0 done (0% complete)"));
    }

    #[test]
    fn question_prompt_includes_focus_task() {
        let mut ctx = context();
        assert!(!question_prompt(&ctx, "what next?").contains("The question is about"));

        ctx.focus = ctx.tasks.first().cloned();
        let prompt = question_prompt(&ctx, "what next?");
        assert!(prompt.contains("The question is about this task"));
        assert!(prompt.ends_with("Question: what next?"));
    }

    #[test]
    fn extracts_first_candidate_text() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "  All good. " }, { "text": "Ship it." }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "All good. Ship it.");
    }

    #[test]
    fn missing_text_is_empty_response() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_matches!(extract_text(response), Err(AssistantError::EmptyResponse));

        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();
        assert_matches!(extract_text(response), Err(AssistantError::EmptyResponse));
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let provider = GeminiProvider::new(GeminiConfig {
            api_key: "secret".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: "http://localhost:9999/".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        assert_eq!(
            provider.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert!(!format!("{provider:?}").contains("secret"));
    }
}
