//! Deterministic template generator used when no model is configured.

use std::time::Duration;

use async_trait::async_trait;

use super::{DraftGenerator, GenerationError, GeneratorKind, TaskDraft, TaskRequest};

/// Appended to the request title to form the draft title.
pub const TITLE_SUFFIX: &str = " - Comprehensive Action Plan";

const ACTION_ITEMS: [&str; 5] = [
    "Research and gather all necessary information and resources",
    "Define clear objectives and success criteria",
    "Create a detailed timeline with specific milestones",
    "Assign responsibilities and coordinate with stakeholders",
    "Execute the plan, monitor progress and adjust as needed",
];

const EXPECTED_OUTCOMES: [&str; 4] = [
    "Clear understanding of the task scope and requirements",
    "Efficient use of time and resources",
    "Measurable progress against defined milestones",
    "Successful completion within the expected timeframe",
];

/// Synthesizes a draft from a fixed template.
#[derive(Debug, Clone, Default)]
pub struct StubDraftGenerator {
    delay: Duration,
}

impl StubDraftGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep for `delay` before answering, to mimic upstream latency.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    /// Build the draft without any latency. Pure function of `request`.
    pub fn render(request: &TaskRequest) -> TaskDraft {
        let mut description = String::new();
        description.push_str("## Overview\n");
        description.push_str(&request.description);
        description.push_str("\n\n## Action Items\n");
        for (i, item) in ACTION_ITEMS.iter().enumerate() {
            description.push_str(&format!("{}. {}\n", i + 1, item));
        }
        description.push_str("\n## Expected Outcomes\n");
        let outcomes: Vec<String> = EXPECTED_OUTCOMES
            .iter()
            .map(|outcome| format!("- {}", outcome))
            .collect();
        description.push_str(&outcomes.join("\n"));

        TaskDraft {
            title: format!("{}{}", request.title, TITLE_SUFFIX),
            description,
        }
    }
}

#[async_trait]
impl DraftGenerator for StubDraftGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Stub
    }

    async fn draft(&self, request: &TaskRequest) -> Result<TaskDraft, GenerationError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Self::render(request))
    }
}
