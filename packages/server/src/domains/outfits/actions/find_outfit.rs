//! Find outfit action - answers one style request

use anyhow::Result;
use outfit_finder::StyleQuery;
use tracing::{info, warn};

use crate::config::CatalogMode;
use crate::domains::outfits::formatter;
use crate::kernel::BotDeps;

/// Answer a style request in `chat_id`.
///
/// In local mode the reply comes straight from the catalog. Otherwise the
/// finder runs the model/validation loop and the outcome is formatted,
/// including any degradation notice.
pub async fn find_outfit(chat_id: i64, text: &str, deps: &BotDeps) -> Result<()> {
    if let Err(e) = deps.messenger.send_typing(chat_id).await {
        warn!(chat_id, error = %e, "Failed to send typing action");
    }

    let query = match StyleQuery::parse(text) {
        Ok(query) => query,
        Err(_) => {
            return deps
                .messenger
                .send_html(chat_id, &formatter::help_text(), None)
                .await;
        }
    };

    if deps.catalog_mode == CatalogMode::Local {
        return reply_from_catalog(chat_id, &query, deps).await;
    }

    let outcome = deps.finder.find(&query).await;
    info!(
        chat_id,
        validated = outcome.validated_count(),
        fallback = outcome.fallback_count(),
        "Outfit search finished"
    );

    let reply = formatter::format_outcome(query.text(), &outcome);
    deps.messenger.send_html(chat_id, &reply, None).await
}

async fn reply_from_catalog(chat_id: i64, query: &StyleQuery, deps: &BotDeps) -> Result<()> {
    let items = deps
        .catalog
        .style_in(query.text())
        .and_then(|style| deps.catalog.get(style).map(|items| (style, items)));

    match items {
        Some((style, items)) => {
            info!(chat_id, style, items = items.len(), "Answering from catalog");
            let reply = formatter::format_catalog_outfit(style, items);
            deps.messenger.send_html(chat_id, &reply, None).await
        }
        None => {
            info!(chat_id, query = %query, "Style not in catalog");
            let reply = formatter::style_not_found_text(query.text(), &deps.catalog);
            deps.messenger
                .send_html(chat_id, &reply, formatter::styles_keyboard(&deps.catalog))
                .await
        }
    }
}
