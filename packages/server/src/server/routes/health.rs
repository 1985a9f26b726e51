use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    catalog_styles: usize,
    target: usize,
}

/// Health check endpoint
///
/// The bot keeps no connections of its own, so being able to answer means
/// being healthy.
pub async fn health_handler(
    Extension(state): Extension<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            catalog_styles: state.deps.catalog.len(),
            target: state.deps.finder.config().target,
        }),
    )
}
