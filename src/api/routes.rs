//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::draft::{
    create_generator, DraftError, GenerationError, GeneratorRef, TaskDraft,
    MISSING_FIELDS_MESSAGE,
};

use super::types::*;

const UPSTREAM_FAILED_MESSAGE: &str = "AI generation failed";
const GENERATION_FAILED_MESSAGE: &str = "Failed to generate task";

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// The generator behind `/api/generate-task`
    pub generator: GeneratorRef,
}

impl AppState {
    pub fn new(config: Config, generator: GeneratorRef) -> Self {
        Self { config, generator }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/generate-task", post(generate_task))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let generator = create_generator(&config)?;
    tracing::info!("Draft generator: {}", generator.kind());

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config, generator));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        generator: state.generator.kind().to_string(),
    })
}

fn error_response(status: StatusCode, message: &str) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

/// Expand a task request into a draft.
///
/// Every failure is answered with one of the fixed error envelopes.
async fn generate_task(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<TaskDraft>, ApiError> {
    let req: GenerateTaskRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!("Error generating task: invalid request body: {}", e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED_MESSAGE)
    })?;

    let request = req.into_task_request().map_err(|e| {
        tracing::error!("Error generating task: {}", e);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED_MESSAGE)
    })?;

    match state.generator.generate(&request).await {
        Ok(draft) => Ok(Json(draft)),
        Err(DraftError::Validation) => Err(error_response(
            StatusCode::BAD_REQUEST,
            MISSING_FIELDS_MESSAGE,
        )),
        Err(DraftError::Generation(GenerationError::Upstream { .. })) => Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            UPSTREAM_FAILED_MESSAGE,
        )),
        Err(e) => {
            tracing::error!("Error generating task: {}", e);
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERATION_FAILED_MESSAGE,
            ))
        }
    }
}
