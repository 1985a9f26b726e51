//! Model implementations of [`ChatModel`](crate::traits::model::ChatModel).

#[cfg(feature = "xai")]
mod xai;

#[cfg(feature = "xai")]
pub use xai::{ModelMode, XaiModel};
