//! Outfits domain actions - business logic functions
//!
//! Transports (polling loop, webhook route) call `process_update` for every
//! update; the rest is reachable from there.

mod find_outfit;
mod handle_update;

pub use find_outfit::find_outfit;
pub use handle_update::{handle_update, process_update};
