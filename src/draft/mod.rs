//! Draft generation: turning a short task request into a detailed task draft.
//!
//! Three interchangeable strategies implement [`DraftGenerator`]:
//! - `stub`: deterministic template, no network (offline/demo mode)
//! - `openrouter`: hosted chat-completion model
//! - `endpoint`: another instance's `POST /api/generate-task`
//!
//! The strategy is picked once from [`Config`] by [`create_generator`].

mod endpoint;
mod remote;
mod stub;

pub use endpoint::EndpointDraftGenerator;
pub use remote::{build_prompt, parse_draft, strip_code_fences, RemoteDraftGenerator, DEFAULT_MODEL};
pub use stub::{StubDraftGenerator, TITLE_SUFFIX};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::llm::OpenRouterClient;

/// Message shared by every surface that rejects an incomplete request.
pub const MISSING_FIELDS_MESSAGE: &str = "Title and description are required";

/// A raw task request as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub title: String,
    pub description: String,
}

impl TaskRequest {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Both fields are non-empty. Whitespace counts as content.
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.description.is_empty()
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(DraftError::Validation)
        }
    }
}

/// An elaborated task pending user review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
}

/// Failure of a generation attempt.
#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("{}", MISSING_FIELDS_MESSAGE)]
    Validation,

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Why a well-formed request still produced no draft.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The upstream answered with a non-success status.
    #[error("AI generation failed")]
    Upstream { status: u16, body: String },

    /// The first completion carried no message content.
    #[error("Invalid AI response format")]
    InvalidResponse,

    /// The answer was not a JSON object with string `title` and `description`.
    #[error("Failed to parse generated draft: {0}")]
    Unparseable(String),

    /// The request never produced a readable response.
    #[error("Failed to reach draft generator: {0}")]
    Transport(String),
}

/// Draft generator strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    Stub,
    OpenRouter,
    Endpoint,
}

impl GeneratorKind {
    /// Parse from environment variable value.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "stub" | "local" | "demo" => Some(Self::Stub),
            "openrouter" | "remote" => Some(Self::OpenRouter),
            "endpoint" | "http" => Some(Self::Endpoint),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stub => "stub",
            Self::OpenRouter => "openrouter",
            Self::Endpoint => "endpoint",
        }
    }
}

impl std::fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something that can expand a [`TaskRequest`] into a [`TaskDraft`].
#[async_trait]
pub trait DraftGenerator: Send + Sync {
    fn kind(&self) -> GeneratorKind;

    /// Produce a draft for an already validated request.
    async fn draft(&self, request: &TaskRequest) -> Result<TaskDraft, GenerationError>;

    /// Validate `request`, then produce a draft.
    ///
    /// Validation runs before any external call, whatever the strategy.
    async fn generate(&self, request: &TaskRequest) -> Result<TaskDraft, DraftError> {
        request.validate()?;
        Ok(self.draft(request).await?)
    }
}

pub type GeneratorRef = Arc<dyn DraftGenerator>;

/// Create the generator selected by `config`.
pub fn create_generator(config: &Config) -> Result<GeneratorRef, ConfigError> {
    match config.generator {
        GeneratorKind::Stub => Ok(Arc::new(StubDraftGenerator::with_delay(config.stub_delay))),
        GeneratorKind::OpenRouter => {
            let api_key = config
                .api_key
                .clone()
                .ok_or_else(|| ConfigError::MissingEnvVar("OPEN_ROUTER_API_KEY".to_string()))?;
            let client = OpenRouterClient::with_base_url(api_key, config.openrouter_base_url.clone());
            Ok(Arc::new(RemoteDraftGenerator::new(
                Arc::new(client),
                config.model.clone(),
            )))
        }
        GeneratorKind::Endpoint => {
            let base_url = config
                .endpoint_url
                .clone()
                .ok_or_else(|| ConfigError::MissingEnvVar("DRAFT_ENDPOINT_URL".to_string()))?;
            Ok(Arc::new(EndpointDraftGenerator::new(base_url)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_fail_validation() {
        assert!(matches!(
            TaskRequest::new("", "desc").validate(),
            Err(DraftError::Validation)
        ));
        assert!(matches!(
            TaskRequest::new("title", "").validate(),
            Err(DraftError::Validation)
        ));
        assert!(TaskRequest::new("title", "desc").validate().is_ok());
        // Only the empty string is rejected.
        assert!(TaskRequest::new(" ", " ").is_complete());
    }

    #[test]
    fn generation_errors_display_fixed_messages() {
        let upstream = GenerationError::Upstream {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert_eq!(upstream.to_string(), "AI generation failed");
        assert_eq!(
            GenerationError::InvalidResponse.to_string(),
            "Invalid AI response format"
        );
        assert_eq!(DraftError::Validation.to_string(), MISSING_FIELDS_MESSAGE);
        assert_eq!(
            DraftError::from(GenerationError::InvalidResponse).to_string(),
            "Invalid AI response format"
        );
    }

    #[test]
    fn generator_kind_parsing() {
        assert_eq!(GeneratorKind::parse("stub"), Some(GeneratorKind::Stub));
        assert_eq!(GeneratorKind::parse(" OpenRouter "), Some(GeneratorKind::OpenRouter));
        assert_eq!(GeneratorKind::parse("endpoint"), Some(GeneratorKind::Endpoint));
        assert_eq!(GeneratorKind::parse("gpt"), None);
        assert_eq!(GeneratorKind::OpenRouter.to_string(), "openrouter");
    }

    #[test]
    fn factory_honours_configured_kind() {
        let mut config = Config::new(GeneratorKind::Stub);
        assert_eq!(create_generator(&config).unwrap().kind(), GeneratorKind::Stub);

        config.generator = GeneratorKind::OpenRouter;
        assert!(matches!(
            create_generator(&config),
            Err(ConfigError::MissingEnvVar(_))
        ));
        config.api_key = Some("sk-test".to_string());
        assert_eq!(
            create_generator(&config).unwrap().kind(),
            GeneratorKind::OpenRouter
        );

        config.generator = GeneratorKind::Endpoint;
        assert!(create_generator(&config).is_err());
        config.endpoint_url = Some("http://127.0.0.1:3000".to_string());
        assert_eq!(
            create_generator(&config).unwrap().kind(),
            GeneratorKind::Endpoint
        );
    }
}
