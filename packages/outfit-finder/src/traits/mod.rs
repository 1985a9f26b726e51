//! Seams between the search loop and the outside world.
//!
//! The loop only talks to a [`model::ChatModel`] and a
//! [`validator::PageValidator`], so tests can script both.

pub mod model;
pub mod validator;
