pub mod health;
pub mod webhook;

pub use health::health_handler;
pub use webhook::webhook_handler;
