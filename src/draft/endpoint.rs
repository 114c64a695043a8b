//! Client of the `POST /api/generate-task` endpoint.

use async_trait::async_trait;
use reqwest::Client;

use super::{DraftGenerator, GenerationError, GeneratorKind, TaskDraft, TaskRequest};

pub struct EndpointDraftGenerator {
    client: Client,
    base_url: String,
}

impl EndpointDraftGenerator {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate-task", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl DraftGenerator for EndpointDraftGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Endpoint
    }

    async fn draft(&self, request: &TaskRequest) -> Result<TaskDraft, GenerationError> {
        let response = self
            .client
            .post(self.generate_url())
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::error!("Draft endpoint returned HTTP {}: {}", status.as_u16(), body);
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| GenerationError::Unparseable(e.to_string()))
    }
}
