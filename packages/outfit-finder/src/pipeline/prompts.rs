//! LLM prompts for the outfit search.
//!
//! Attempt 1 asks for a structured item list. Later attempts switch to strict
//! mode: bare URLs only, and an explicit list of links that already failed.

use crate::traits::model::Prompt;
use crate::types::query::StyleQuery;

/// Rejected URLs echoed back to the model in strict mode, at most.
const MAX_REJECTED_IN_PROMPT: usize = 15;

/// System prompt shared by every attempt.
pub const SYSTEM_PROMPT: &str = r#"You are a fashion stylist who shops online for clients.
You only ever recommend items that are for sale right now on the listed stores,
and you only link to individual product pages, never to home pages, category
pages, search results, images or blog posts."#;

/// First attempt: structured item list.
pub const OUTFIT_PROMPT: &str = r#"Put together an outfit for this request: {query}

Pick exactly {count} items, one per category, in this order:
top, bottom, footwear, outerwear, accessory.

Only use these stores: {domains}

Each url must be the direct product page of the item on one of those stores.

Output a JSON array and nothing else:
[
    {"category": "top", "name": "Short item name", "url": "https://..."}
]"#;

/// Retry attempts: bare URLs only.
pub const STRICT_PROMPT: &str = r#"Find {count} product pages for this outfit request: {query}

Rules:
- Only these stores: {domains}
- Each line is ONE full product page URL, nothing else
- No numbering, no markdown, no commentary
- No home pages, category pages, search pages or image links
{rejected_section}"#;

/// Build the prompt for `attempt` (1-based).
///
/// `count` is how many more items are needed; `rejected` lists URLs that
/// already failed and must not be suggested again.
pub fn build_prompt(
    query: &StyleQuery,
    domains: &[String],
    attempt: usize,
    count: usize,
    rejected: &[String],
) -> Prompt {
    let strict = attempt > 1;
    let domains_text = domains.join(", ");

    // User text goes in last so placeholders inside it stay literal
    let user = if strict {
        STRICT_PROMPT
            .replace("{count}", &count.to_string())
            .replace("{domains}", &domains_text)
            .replace("{rejected_section}", &format_rejected_section(rejected))
            .replace("{query}", query.text())
    } else {
        OUTFIT_PROMPT
            .replace("{count}", &count.to_string())
            .replace("{domains}", &domains_text)
            .replace("{query}", query.text())
    };

    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user: user.trim_end().to_string(),
        strict,
        attempt,
    }
}

fn format_rejected_section(rejected: &[String]) -> String {
    if rejected.is_empty() {
        return String::new();
    }

    // Most recent failures are the most useful to exclude
    let listed: Vec<&str> = rejected
        .iter()
        .rev()
        .take(MAX_REJECTED_IN_PROMPT)
        .map(|s| s.as_str())
        .collect();

    format!(
        "\nThese links did not work, do not return them again:\n{}",
        listed.join("\n")
    )
}
