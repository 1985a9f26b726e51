//! Application setup for webhook mode.

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use std::time::Duration;

use outfit_finder::SecretString;
use tokio_util::task::TaskTracker;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::kernel::BotDeps;
use crate::server::routes::{health_handler, webhook_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: BotDeps,
    /// Path segment Telegram must present, the bot token itself
    pub webhook_token: SecretString,
    /// Update handlers still running, drained on shutdown
    pub tasks: TaskTracker,
}

/// Build the axum router: `/health` and `POST /webhook/:token`.
///
/// Updates are handled on `tasks`; the caller keeps a clone to drain them.
pub fn build_app(deps: BotDeps, webhook_token: SecretString, tasks: TaskTracker) -> Router {
    let state = AppState {
        deps,
        webhook_token,
        tasks,
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/webhook/:token", post(webhook_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}

/// Close `tasks` and wait up to `grace` for handlers still in flight.
///
/// Returns false when the grace period ran out first.
pub async fn drain_tasks(tasks: &TaskTracker, grace: Duration) -> bool {
    tasks.close();
    info!(in_flight = tasks.len(), "Server stopped, draining updates");

    if tokio::time::timeout(grace, tasks.wait()).await.is_err() {
        warn!(unfinished = tasks.len(), "Shutting down with updates still running");
        return false;
    }
    true
}
