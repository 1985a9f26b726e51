//! Update dispatch

use anyhow::Result;
use telegram::models::{CallbackQuery, Message, Update};
use tracing::{debug, error, info, warn};

use super::find_outfit;
use crate::domains::outfits::commands::{style_from_callback, Command};
use crate::domains::outfits::formatter;
use crate::kernel::BotDeps;

/// Handle one update, reporting failures to the log and the chat.
///
/// Never returns an error, so callers can spawn it and forget it.
pub async fn process_update(update: Update, deps: BotDeps) {
    let update_id = update.update_id;
    if let Err(e) = handle_update(&update, &deps).await {
        error!(update_id, error = %e, "Failed to handle update");

        if let Some(chat_id) = update.chat_id() {
            if let Err(e) = deps
                .messenger
                .send_html(chat_id, &formatter::error_text(), None)
                .await
            {
                warn!(update_id, chat_id, error = %e, "Failed to send error reply");
            }
        }
    }
}

/// Route an update to the matching action.
pub async fn handle_update(update: &Update, deps: &BotDeps) -> Result<()> {
    if let Some(callback) = &update.callback_query {
        return handle_callback(callback, deps).await;
    }

    match update.message.as_ref().or(update.edited_message.as_ref()) {
        Some(message) => handle_message(message, deps).await,
        None => {
            debug!(update_id = update.update_id, "Ignoring update without message");
            Ok(())
        }
    }
}

async fn handle_message(message: &Message, deps: &BotDeps) -> Result<()> {
    let chat_id = message.chat.id;
    let Some(command) = message.text.as_deref().and_then(Command::parse) else {
        debug!(chat_id, "Ignoring message without text");
        return Ok(());
    };

    info!(chat_id, command = ?command, "Incoming message");

    match command {
        Command::Start => {
            deps.messenger
                .send_html(
                    chat_id,
                    &formatter::welcome_text(),
                    formatter::styles_keyboard(&deps.catalog),
                )
                .await
        }
        Command::Help => {
            deps.messenger
                .send_html(chat_id, &formatter::help_text(), None)
                .await
        }
        Command::Styles => {
            deps.messenger
                .send_html(
                    chat_id,
                    &formatter::styles_text(&deps.catalog),
                    formatter::styles_keyboard(&deps.catalog),
                )
                .await
        }
        Command::Unknown(name) => {
            deps.messenger
                .send_html(chat_id, &formatter::unknown_command_text(&name), None)
                .await
        }
        Command::Query(text) => find_outfit(chat_id, &text, deps).await,
    }
}

async fn handle_callback(callback: &CallbackQuery, deps: &BotDeps) -> Result<()> {
    if let Err(e) = deps.messenger.answer_callback(&callback.id).await {
        warn!(callback_id = %callback.id, error = %e, "Failed to answer callback");
    }

    let Some(chat_id) = callback.message.as_ref().map(|m| m.chat.id) else {
        debug!(callback_id = %callback.id, "Callback without message");
        return Ok(());
    };

    match callback.data.as_deref().and_then(style_from_callback) {
        Some(style) => {
            info!(chat_id, style, "Style button pressed");
            find_outfit(chat_id, style, deps).await
        }
        None => {
            debug!(chat_id, data = ?callback.data, "Ignoring unknown callback data");
            Ok(())
        }
    }
}
