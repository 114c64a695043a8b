//! Draft generation through a hosted chat-completion model.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;

use super::{DraftGenerator, GenerationError, GeneratorKind, TaskDraft, TaskRequest};
use crate::llm::{ChatMessage, LlmClient, LlmError, LlmErrorKind};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1:free";

// Leftmost alternation: an opening "```json" is removed whole before the bare fence.
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```json|```").expect("static fence pattern")
});

/// Build the instruction sent to the model.
pub fn build_prompt(request: &TaskRequest) -> String {
    format!(
        "Create a detailed task based on the following request:\n\
         Title: {}\n\
         Description: {}\n\
         \n\
         Return the response in JSON format with the following structure:\n\
         {{\n  \"title\": \"Enhanced task title\",\n  \"description\": \"Detailed task description with action items and expected outcomes\"\n}}",
        request.title, request.description
    )
}

/// Remove markdown code fences and surrounding whitespace from a model answer.
pub fn strip_code_fences(content: &str) -> String {
    CODE_FENCE.replace_all(content, "").trim().to_string()
}

/// Parse a (possibly fenced) model answer into a draft.
pub fn parse_draft(content: &str) -> Result<TaskDraft, GenerationError> {
    let cleaned = strip_code_fences(content);
    serde_json::from_str(&cleaned).map_err(|e| GenerationError::Unparseable(e.to_string()))
}

/// Generator backed by an [`LlmClient`].
pub struct RemoteDraftGenerator {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl RemoteDraftGenerator {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    fn map_llm_error(error: LlmError) -> GenerationError {
        if error.is_status_error() {
            tracing::error!("AI response error: {}", error);
            return GenerationError::Upstream {
                status: error.status_code.unwrap_or_default(),
                body: error.message,
            };
        }
        match error.kind {
            LlmErrorKind::ParseError => GenerationError::Unparseable(error.message),
            _ => GenerationError::Transport(error.message),
        }
    }
}

#[async_trait]
impl DraftGenerator for RemoteDraftGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::OpenRouter
    }

    async fn draft(&self, request: &TaskRequest) -> Result<TaskDraft, GenerationError> {
        let messages = [ChatMessage::user(build_prompt(request))];

        let response = self
            .client
            .chat_completion(&self.model, &messages)
            .await
            .map_err(Self::map_llm_error)?;

        tracing::debug!(
            "Completion from {}: finish_reason={:?}, tokens={:?}",
            response.model.as_deref().unwrap_or(&self.model),
            response.finish_reason,
            response.usage.as_ref().map(|u| u.total_tokens)
        );

        let content = response
            .content
            .filter(|c| !c.is_empty())
            .ok_or(GenerationError::InvalidResponse)?;

        parse_draft(&content)
    }
}
