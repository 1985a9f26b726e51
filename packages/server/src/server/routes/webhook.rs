use axum::{
    body::Bytes,
    extract::{Extension, Path},
    http::StatusCode,
};
use telegram::models::Update;
use tracing::{debug, warn};

use crate::domains::outfits::process_update;
use crate::server::app::AppState;

/// Telegram webhook endpoint, `POST /webhook/:token`
///
/// The path token must equal the bot token, otherwise the route pretends not
/// to exist. Accepted updates are handled on a tracked task so Telegram gets
/// its 200 immediately; a body that doesn't parse is acknowledged too, since
/// Telegram would otherwise redeliver it forever.
pub async fn webhook_handler(
    Extension(state): Extension<AppState>,
    Path(token): Path<String>,
    body: Bytes,
) -> StatusCode {
    if token != state.webhook_token.expose() {
        warn!("Webhook called with wrong token");
        return StatusCode::NOT_FOUND;
    }

    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "Ignoring malformed update");
            return StatusCode::OK;
        }
    };

    debug!(update_id = update.update_id, "Webhook update received");
    state.tasks.spawn(process_update(update, state.deps.clone()));

    StatusCode::OK
}
