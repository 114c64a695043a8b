//! HTTP API for Task Drafter.
//!
//! ## Endpoints
//!
//! - `POST /api/generate-task` - Expand a task request into a draft
//! - `GET /api/health` - Health check

mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
pub use types::*;
