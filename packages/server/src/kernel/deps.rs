//! Bot dependencies for handlers (using traits for testability)
//!
//! Handlers receive a [`BotDeps`] and never construct clients themselves, so
//! tests can swap in [`MockMessenger`](super::MockMessenger) and the finder's
//! scripted model and validator.

use anyhow::{Context, Result};
use async_trait::async_trait;
use outfit_finder::ai::{ModelMode, XaiModel};
use outfit_finder::{Catalog, Finder, HttpValidator, ModelCredentials, ProductPatterns};
use std::sync::Arc;
use telegram::models::{InlineKeyboardMarkup, SendMessage};
use telegram::TelegramService;

use crate::config::{CatalogMode, Config};
use crate::kernel::BaseMessenger;

// =============================================================================
// TelegramService Adapter (implements BaseMessenger trait)
// =============================================================================

/// Wrapper around TelegramService that implements BaseMessenger trait
pub struct TelegramAdapter(pub Arc<TelegramService>);

impl TelegramAdapter {
    pub fn new(service: Arc<TelegramService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseMessenger for TelegramAdapter {
    async fn send_html(
        &self,
        chat_id: i64,
        html: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<()> {
        let mut message = SendMessage::new(chat_id, html).html().without_preview();
        if let Some(keyboard) = keyboard {
            message = message.keyboard(keyboard);
        }

        self.0
            .send_message(&message)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    async fn send_typing(&self, chat_id: i64) -> Result<()> {
        self.0
            .send_chat_action(chat_id, "typing")
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }

    async fn answer_callback(&self, callback_query_id: &str) -> Result<()> {
        self.0
            .answer_callback_query(callback_query_id)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// BotDeps
// =============================================================================

/// Dependencies shared by every update handler
#[derive(Clone)]
pub struct BotDeps {
    pub messenger: Arc<dyn BaseMessenger>,
    pub finder: Arc<Finder>,
    pub catalog: Arc<Catalog>,
    /// `Local` answers from the catalog without calling the model
    pub catalog_mode: CatalogMode,
}

impl BotDeps {
    pub fn new(
        messenger: Arc<dyn BaseMessenger>,
        finder: Arc<Finder>,
        catalog: Arc<Catalog>,
        catalog_mode: CatalogMode,
    ) -> Self {
        Self {
            messenger,
            finder,
            catalog,
            catalog_mode,
        }
    }
}

/// Wire the xAI model and HTTP validator into a [`Finder`].
pub fn build_finder(config: &Config, catalog: Arc<Catalog>) -> Result<Finder> {
    let credentials = ModelCredentials::new(config.xai_api_key.expose(), config.xai_model.clone())
        .with_base_url(config.xai_base_url.clone());

    let mode = match config.catalog_mode {
        CatalogMode::Generative => ModelMode::Generative,
        CatalogMode::Search | CatalogMode::Local => ModelMode::Live,
    };

    let patterns = ProductPatterns::builtin();
    let model = XaiModel::from_credentials(&credentials)
        .with_mode(mode)
        .with_allowed_websites(patterns.domains());

    let validator =
        HttpValidator::from_config(&config.finder).context("Failed to build page validator")?;

    Ok(Finder::new(
        Arc::new(model),
        Arc::new(validator),
        catalog,
        config.finder.clone(),
    )
    .with_patterns(patterns))
}
