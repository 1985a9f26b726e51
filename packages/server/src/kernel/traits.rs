// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only. Reply wording and search logic live
// in the outfits domain and call through these.
//
// Naming convention: Base* for trait names (e.g., BaseMessenger)

use anyhow::Result;
use async_trait::async_trait;
use telegram::models::InlineKeyboardMarkup;

// =============================================================================
// Messenger Trait (Infrastructure - outgoing chat messages)
// =============================================================================

#[async_trait]
pub trait BaseMessenger: Send + Sync {
    /// Send an HTML-formatted message, optionally with an inline keyboard
    async fn send_html(
        &self,
        chat_id: i64,
        html: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<()>;

    /// Show the "typing..." indicator
    async fn send_typing(&self, chat_id: i64) -> Result<()>;

    /// Acknowledge a button press so the client stops its spinner
    async fn answer_callback(&self, callback_query_id: &str) -> Result<()>;
}
