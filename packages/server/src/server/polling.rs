//! Long-polling transport.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use telegram::models::Update;
use telegram::TelegramService;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::domains::outfits::process_update;
use crate::kernel::BotDeps;

/// Seconds Telegram holds a `getUpdates` request open.
pub const POLL_TIMEOUT_SECS: u64 = 30;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// How long in-flight updates may finish after shutdown is requested.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Offset that acknowledges every update in `updates`.
pub fn next_offset(current: Option<i64>, updates: &[Update]) -> Option<i64> {
    updates
        .iter()
        .map(|u| u.update_id + 1)
        .max()
        .max(current)
}

/// Exponential backoff, capped.
pub fn next_backoff(current: Duration) -> Duration {
    (current * 2).min(MAX_BACKOFF)
}

/// Poll for updates until `cancel` fires.
///
/// Each update is handled on its own task. Poll errors back off from 1s to
/// 30s; a successful poll resets the delay.
pub async fn run_polling(
    telegram: Arc<TelegramService>,
    deps: BotDeps,
    cancel: CancellationToken,
) -> Result<()> {
    // getUpdates is refused while a webhook is registered
    if let Err(e) = telegram.delete_webhook().await {
        warn!(error = %e, "Failed to delete webhook before polling");
    }

    info!("Polling for updates");

    let mut offset: Option<i64> = None;
    let mut backoff = INITIAL_BACKOFF;
    let mut tasks = JoinSet::new();

    loop {
        let polled = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            polled = telegram.get_updates(offset, POLL_TIMEOUT_SECS) => polled,
        };

        match polled {
            Ok(updates) => {
                backoff = INITIAL_BACKOFF;
                offset = next_offset(offset, &updates);

                for update in updates {
                    tasks.spawn(process_update(update, deps.clone()));
                }
            }
            Err(e) => {
                warn!(error = %e, retry_in = ?backoff, "Polling failed");
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(backoff) => {}
                }
                backoff = next_backoff(backoff);
            }
        }

        while let Some(joined) = tasks.try_join_next() {
            if let Err(e) = joined {
                error!(error = %e, "Update task panicked");
            }
        }
    }

    info!(in_flight = tasks.len(), "Polling stopped, draining updates");
    let drained = tokio::time::timeout(SHUTDOWN_GRACE, async {
        while tasks.join_next().await.is_some() {}
    })
    .await;

    if drained.is_err() {
        warn!(aborted = tasks.len(), "Aborting unfinished updates");
        tasks.abort_all();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(id: i64) -> Update {
        serde_json::from_value(serde_json::json!({ "update_id": id })).unwrap()
    }

    #[test]
    fn test_next_offset() {
        assert_eq!(next_offset(None, &[]), None);
        assert_eq!(next_offset(Some(7), &[]), Some(7));
        assert_eq!(next_offset(None, &[update(10), update(12), update(11)]), Some(13));
        assert_eq!(next_offset(Some(20), &[update(3)]), Some(20));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        assert_eq!(next_backoff(INITIAL_BACKOFF), Duration::from_secs(2));
        assert_eq!(next_backoff(Duration::from_secs(16)), MAX_BACKOFF);
        assert_eq!(next_backoff(MAX_BACKOFF), MAX_BACKOFF);
    }
}
