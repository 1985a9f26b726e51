//! Outfits domain - turns chat updates into outfit link replies
//!
//! Flow: Update → parse command → (catalog | finder) → formatter → messenger

pub mod actions;
pub mod commands;
pub mod formatter;

pub use actions::{find_outfit, handle_update, process_update};
pub use commands::{style_callback_data, style_from_callback, Command};
