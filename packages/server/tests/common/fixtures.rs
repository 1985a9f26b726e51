//! Test fixtures for building Telegram updates.
//!
//! Updates are built from JSON so they look exactly like what Telegram sends.

#![allow(dead_code)]

use serde_json::json;
use telegram::models::Update;

pub const CHAT_ID: i64 = 4242;

/// A private-chat text message.
pub fn text_update(update_id: i64, text: &str) -> Update {
    serde_json::from_value(json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id * 10,
            "date": 1_700_000_000,
            "chat": { "id": CHAT_ID, "type": "private" },
            "from": { "id": 7, "is_bot": false, "first_name": "Ann" },
            "text": text,
        }
    }))
    .expect("valid text update")
}

/// A text message the user edited after sending.
pub fn edited_text_update(update_id: i64, text: &str) -> Update {
    serde_json::from_value(json!({
        "update_id": update_id,
        "edited_message": {
            "message_id": update_id * 10,
            "date": 1_700_000_000,
            "edit_date": 1_700_000_060,
            "chat": { "id": CHAT_ID, "type": "private" },
            "from": { "id": 7, "is_bot": false, "first_name": "Ann" },
            "text": text,
        }
    }))
    .expect("valid edited update")
}

/// An inline-button press on a message the bot sent.
pub fn callback_update(update_id: i64, data: &str) -> Update {
    serde_json::from_value(json!({
        "update_id": update_id,
        "callback_query": {
            "id": format!("cb-{}", update_id),
            "from": { "id": 7, "is_bot": false, "first_name": "Ann" },
            "message": {
                "message_id": 99,
                "date": 1_700_000_000,
                "chat": { "id": CHAT_ID, "type": "private" },
                "text": "pick a style",
            },
            "data": data,
        }
    }))
    .expect("valid callback update")
}

/// A message with no text (e.g. a sticker).
pub fn sticker_update(update_id: i64) -> Update {
    serde_json::from_value(json!({
        "update_id": update_id,
        "message": {
            "message_id": 1,
            "date": 1_700_000_000,
            "chat": { "id": CHAT_ID, "type": "private" },
        }
    }))
    .expect("valid sticker update")
}

/// Five product URLs on an allow-listed retailer.
pub fn product_urls(count: usize) -> Vec<String> {
    (1..=count)
        .map(|i| format!("https://www.asos.com/x/prd/20000{}", i))
        .collect()
}
