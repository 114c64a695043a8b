//! Review flow: request entry, draft generation, confirmation.
//!
//! # State Machine
//! ```text
//!   Idle ──begin──▶ Generating ──ok──▶ DraftReady ──confirm──▶ Idle (+task)
//!    ▲                  │                  │
//!    │                  └─err─▶ GenerationFailed
//!    └──────────── discard / begin again ──┘
//! ```
//!
//! [`ReviewFlow`] owns the in-progress request, the single pending draft and
//! the confirmed task list. Its methods are the only way to change them.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::config::{Config, StoreConfig};
use crate::draft::{
    create_generator, DraftError, GeneratorRef, TaskDraft, TaskRequest, MISSING_FIELDS_MESSAGE,
};
use crate::listing;
use crate::task_store::{create_task_store, StorageError, Task, TaskStore};

/// Where the flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Generating,
    DraftReady,
    GenerationFailed,
}

/// Which screen the presentation layer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Create,
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Destructive,
}

/// A user-visible message produced by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
    pub level: NoticeLevel,
}

impl Notice {
    pub const MISSING_INFORMATION: Notice = Notice {
        title: "Missing information",
        description: "Please provide both a title and description for your task request.",
        level: NoticeLevel::Destructive,
    };

    pub const DRAFT_GENERATED: Notice = Notice {
        title: "Draft generated",
        description: "AI has created a task draft based on your request.",
        level: NoticeLevel::Info,
    };

    pub const GENERATION_FAILED: Notice = Notice {
        title: "Generation failed",
        description: "There was an error generating your task draft. Please try again.",
        level: NoticeLevel::Destructive,
    };

    pub const TASK_SUBMITTED: Notice = Notice {
        title: "Task submitted",
        description: "Your task has been saved successfully.",
        level: NoticeLevel::Info,
    };
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("A draft is already being generated")]
    Busy,

    #[error("{}", MISSING_FIELDS_MESSAGE)]
    Validation,

    #[error("No generation is in progress")]
    NotGenerating,

    #[error("There is no draft to confirm")]
    NoDraft,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] crate::config::ConfigError),
}

pub struct ReviewFlow {
    generator: GeneratorRef,
    store: Box<dyn TaskStore>,
    state: FlowState,
    request: TaskRequest,
    draft: Option<TaskDraft>,
    tasks: Vec<Task>,
    view: View,
    notices: Vec<Notice>,
}

impl ReviewFlow {
    /// Load the persisted task list once and start idle.
    pub async fn new(generator: GeneratorRef, store: Box<dyn TaskStore>) -> Result<Self, FlowError> {
        let tasks = store.load().await?;
        tracing::info!(
            "Review flow ready: generator={}, {} stored tasks, persistent={}",
            generator.kind(),
            tasks.len(),
            store.is_persistent()
        );
        Ok(Self {
            generator,
            store,
            state: FlowState::Idle,
            request: TaskRequest::default(),
            draft: None,
            tasks,
            view: View::default(),
            notices: Vec::new(),
        })
    }

    /// Build the generator named by `config` and the store named by `store`,
    /// then load.
    pub async fn from_config(config: &Config, store: &StoreConfig) -> Result<Self, FlowError> {
        let generator = create_generator(config)?;
        let store =
            create_task_store(store.store_type, store.data_dir.clone(), &store.entry).await?;
        Self::new(generator, store).await
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn request(&self) -> &TaskRequest {
        &self.request
    }

    pub fn draft(&self) -> Option<&TaskDraft> {
        self.draft.as_ref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    /// Drain queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), FlowError> {
        self.ensure_not_generating()?;
        self.request.title = title.into();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), FlowError> {
        self.ensure_not_generating()?;
        self.request.description = description.into();
        Ok(())
    }

    /// Whether the generate trigger should be enabled.
    pub fn can_generate(&self) -> bool {
        self.state != FlowState::Generating && self.request.is_complete()
    }

    /// Enter `Generating` and hand out the request to draft.
    ///
    /// Any pending draft is discarded.
    pub fn begin_generation(&mut self) -> Result<TaskRequest, FlowError> {
        self.ensure_not_generating()?;
        if !self.request.is_complete() {
            self.notices.push(Notice::MISSING_INFORMATION);
            return Err(FlowError::Validation);
        }
        self.draft = None;
        self.state = FlowState::Generating;
        Ok(self.request.clone())
    }

    /// Record the outcome of the generation started by [`begin_generation`].
    ///
    /// [`begin_generation`]: Self::begin_generation
    pub fn complete_generation(
        &mut self,
        outcome: Result<TaskDraft, DraftError>,
    ) -> Result<FlowState, FlowError> {
        if self.state != FlowState::Generating {
            return Err(FlowError::NotGenerating);
        }
        match outcome {
            Ok(draft) => {
                self.draft = Some(draft);
                self.state = FlowState::DraftReady;
                self.notices.push(Notice::DRAFT_GENERATED);
            }
            Err(e) => {
                tracing::error!("Error generating draft: {}", e);
                self.state = FlowState::GenerationFailed;
                self.notices.push(Notice::GENERATION_FAILED);
            }
        }
        Ok(self.state)
    }

    /// Run one full generation and return the resulting state.
    pub async fn generate(&mut self) -> Result<FlowState, FlowError> {
        let request = self.begin_generation()?;
        let generator = Arc::clone(&self.generator);
        let outcome = generator.generate(&request).await;
        self.complete_generation(outcome)
    }

    /// Turn the pending draft into a persisted task.
    ///
    /// On a storage failure nothing changes, so the user can confirm again.
    pub async fn confirm(&mut self) -> Result<Task, FlowError> {
        let draft = match (&self.draft, self.state) {
            (Some(draft), FlowState::DraftReady) => draft,
            _ => return Err(FlowError::NoDraft),
        };

        let submitted_at = self.unique_submission_time(Utc::now());
        let task = Task::from_draft(&self.request, draft, submitted_at);

        let mut updated = self.tasks.clone();
        updated.push(task.clone());
        self.store.save(&updated).await?;

        tracing::info!("Task {} submitted: {}", task.id, task.task_title);
        self.tasks = updated;
        self.request = TaskRequest::default();
        self.draft = None;
        self.state = FlowState::Idle;
        self.view = View::Dashboard;
        self.notices.push(Notice::TASK_SUBMITTED);
        Ok(task)
    }

    /// Drop the pending draft, keeping the typed request.
    pub fn discard(&mut self) -> Result<(), FlowError> {
        self.ensure_not_generating()?;
        self.draft = None;
        self.state = FlowState::Idle;
        Ok(())
    }

    pub fn search(&self, term: &str) -> Vec<&Task> {
        listing::filter_tasks(&self.tasks, term)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        listing::find_task(&self.tasks, id)
    }

    fn ensure_not_generating(&self) -> Result<(), FlowError> {
        if self.state == FlowState::Generating {
            Err(FlowError::Busy)
        } else {
            Ok(())
        }
    }

    // Ids are millisecond timestamps; two confirmations in the same
    // millisecond must still get distinct ids.
    fn unique_submission_time(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let mut at = now;
        while self
            .tasks
            .iter()
            .any(|t| t.id == at.timestamp_millis().to_string())
        {
            at += Duration::milliseconds(1);
        }
        at
    }
}
