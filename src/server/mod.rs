pub mod error;
pub mod handlers;
pub mod responses;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::prompt::PROMPT_VERSION;

pub fn router(ctx: AppContext) -> Router {
    let api = Router::new()
        .route("/ask-query", post(handlers::ask_query))
        .route("/analyze-github-pr", post(handlers::analyze_github_pr))
        .route(
            "/analyze-jira-requirements",
            post(handlers::analyze_jira_requirements),
        )
        .route("/analyze-combined", post(handlers::analyze_combined));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Serves the API on `address` until Ctrl-C.
pub async fn serve(ctx: AppContext, address: &str) -> AppResult<()> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|err| AppError::Server(format!("failed to bind {address}: {err}")))?;

    info!(
        model = ctx.language_model.model_name(),
        prompt_version = PROMPT_VERSION,
        "server running at http://{address}"
    );

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Server(err.to_string()))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            warn!("failed to listen for Ctrl-C: {err}");
            std::future::pending::<()>().await;
        }
    }
}
