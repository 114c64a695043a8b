//! # Task Drafter
//!
//! Turns a short task request (title + description) into a detailed task
//! draft with a hosted language model, lets the user review it, and keeps the
//! confirmed tasks in a searchable list.
//!
//! ## Flow
//!
//! ```text
//!   user input ──▶ DraftGenerator ──▶ draft under review ──confirm──▶ TaskStore
//!                  (stub | openrouter | endpoint)
//! ```
//!
//! ## Modules
//! - `api`: stateless `POST /api/generate-task` endpoint (axum)
//! - `draft`: the generator contract and its strategies
//! - `llm`: OpenRouter chat-completion client
//! - `review`: the review-flow controller
//! - `task_store`: pluggable persistence of confirmed tasks
//! - `listing`: search over confirmed tasks

pub mod api;
pub mod config;
pub mod draft;
pub mod listing;
pub mod llm;
pub mod review;
pub mod task_store;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use draft::{DraftError, DraftGenerator, GenerationError, TaskDraft, TaskRequest};
pub use review::{FlowState, ReviewFlow};
pub use task_store::{Task, TaskStore};
