// Kernel - infrastructure traits, dependency container and test doubles

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{build_finder, BotDeps, TelegramAdapter};
pub use test_dependencies::MockMessenger;
pub use traits::BaseMessenger;
