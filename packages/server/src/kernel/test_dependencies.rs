// TestDependencies - mock implementations for testing
//
// Records outgoing messages instead of calling Telegram.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use telegram::models::InlineKeyboardMarkup;

use super::BaseMessenger;

// =============================================================================
// Mock Messenger
// =============================================================================

/// A message captured by [`MockMessenger`]
#[derive(Debug, Clone)]
pub struct SentHtml {
    pub chat_id: i64,
    pub html: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

#[derive(Clone, Default)]
pub struct MockMessenger {
    sent: Arc<Mutex<Vec<SentHtml>>>,
    typing: Arc<Mutex<Vec<i64>>>,
    answered: Arc<Mutex<Vec<String>>>,
    fail_sends: bool,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `send_html` call fail
    pub fn failing() -> Self {
        Self {
            fail_sends: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentHtml> {
        self.sent.lock().unwrap().clone()
    }

    /// Text of the most recent message
    pub fn last_html(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|m| m.html.clone())
    }

    pub fn typing_chats(&self) -> Vec<i64> {
        self.typing.lock().unwrap().clone()
    }

    pub fn answered_callbacks(&self) -> Vec<String> {
        self.answered.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseMessenger for MockMessenger {
    async fn send_html(
        &self,
        chat_id: i64,
        html: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<()> {
        if self.fail_sends {
            anyhow::bail!("telegram unavailable");
        }
        self.sent.lock().unwrap().push(SentHtml {
            chat_id,
            html: html.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn send_typing(&self, chat_id: i64) -> Result<()> {
        self.typing.lock().unwrap().push(chat_id);
        Ok(())
    }

    async fn answer_callback(&self, callback_query_id: &str) -> Result<()> {
        self.answered
            .lock()
            .unwrap()
            .push(callback_query_id.to_string());
        Ok(())
    }
}
