//! Outfit link finder.
//!
//! Finds a handful of working product-page links for a free-text style
//! request. A language model proposes items; this crate extracts the URLs,
//! filters them against a per-retailer product-page table, checks that they
//! are live HTML pages, retries with a stricter prompt when too few pass,
//! and pads with known links as a last resort.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use outfit_finder::{Catalog, Finder, FinderConfig, HttpValidator, StyleQuery};
//! use outfit_finder::ai::XaiModel;
//!
//! let config = FinderConfig::default();
//! let finder = Finder::new(
//!     Arc::new(XaiModel::new(XaiClient::from_env()?, "grok-4")),
//!     Arc::new(HttpValidator::from_config(&config)?),
//!     Arc::new(Catalog::builtin()),
//!     config,
//! );
//!
//! let outcome = finder.find(&StyleQuery::parse("summer linen, relaxed")?).await;
//! for suggestion in outcome.suggestions() {
//!     println!("{}: {}", suggestion.slot, suggestion.url);
//! }
//! ```
//!
//! # Modules
//!
//! - [`patterns`] - Retailer allow-list and product-page regexes
//! - [`pipeline`] - Extraction, retry loop and fallback
//! - [`traits`] - `ChatModel` and `PageValidator` seams
//! - [`validators`] - HTTP reachability checks
//! - [`catalog`] - Static outfit table
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod catalog;
pub mod error;
pub mod patterns;
pub mod pipeline;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;
pub mod validators;

pub use catalog::{Catalog, CatalogItem};
pub use error::{FinderError, Result};
pub use patterns::{MatchPolicy, ProductPatterns, RETAIL_PATTERNS};
pub use pipeline::{Finder, Placeholder};
pub use security::{ModelCredentials, SecretString};
pub use traits::{
    model::{ChatModel, Completion, Prompt},
    validator::PageValidator,
};
pub use types::{
    candidate::{Candidate, CandidateOrigin, RejectReason, Validation},
    config::FinderConfig,
    outcome::{Outcome, Suggestion, SuggestionSource},
    query::StyleQuery,
    slot::OutfitSlot,
};
pub use validators::HttpValidator;

pub use testing::{MockModel, MockValidator};
