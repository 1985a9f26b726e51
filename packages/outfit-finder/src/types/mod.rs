//! Data types for the outfit finder.

pub mod candidate;
pub mod config;
pub mod outcome;
pub mod query;
pub mod slot;
