//! The link-finding pipeline.
//!
//! - Prompt construction (normal, then strict on retries)
//! - Candidate extraction from completion text and citations
//! - The retry loop with concurrent validation
//! - Fallback padding when validation comes up short

pub mod extract;
pub mod fallback;
pub mod prompts;
pub mod search;

pub use extract::{extract_candidates, extract_urls, normalize_url, parse_items, ModelItem};
pub use fallback::{homepage_placeholders, Placeholder};
pub use prompts::{build_prompt, OUTFIT_PROMPT, STRICT_PROMPT, SYSTEM_PROMPT};
pub use search::Finder;
