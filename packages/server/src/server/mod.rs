pub mod app;
pub mod polling;
pub mod routes;

pub use app::{build_app, drain_tasks, AppState};
pub use polling::{run_polling, SHUTDOWN_GRACE};
