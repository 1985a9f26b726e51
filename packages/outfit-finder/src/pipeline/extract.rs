//! Candidate extraction from model output.
//!
//! Pulls URLs out of free text and citation lists, cleans the debris models
//! leave around links (markdown brackets, closing quotes, sentence
//! punctuation, zero-width characters), normalizes them and de-duplicates.
//! When the completion carries a JSON item list, item names and slots are
//! attached to the matching candidates.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use url::Url;

use crate::types::candidate::{Candidate, CandidateOrigin};
use crate::types::slot::OutfitSlot;

lazy_static! {
    static ref URL_REGEX: Regex = Regex::new(r#"https?://[^\s<>"'`)\]}|]+"#).unwrap();

    static ref JSON_FENCE_REGEX: Regex = Regex::new(r"(?s)```(?:json)?\s*(\[.*?\])\s*```").unwrap();
}

/// Characters that never end a URL in prose.
const TRAILING_PUNCTUATION: &[char] = &[
    '.', ',', ';', ':', '!', '?', ')', ']', '}', '>', '\'', '"', '»', '«', '…', '*', '`', '”', '’',
    '_',
];

/// Invisible characters models and chat clients sprinkle into text.
const INVISIBLE: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}', '\u{00AD}'];

/// Query parameters that only carry tracking state.
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "yclid", "mc_eid", "ref_src"];

/// Extract normalized, de-duplicated URLs from text, in order of appearance.
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    scan_text(text)
        .into_iter()
        .map(|u| u.to_string())
        .filter(|u| seen.insert(u.clone()))
        .collect()
}

/// Build the candidate list for one completion.
///
/// Citations come first, then URLs from the text, each once.
pub fn extract_candidates(text: &str, citations: &[String]) -> Vec<Candidate> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    let cited = citations
        .iter()
        .filter_map(|c| normalize_url(c))
        .map(|u| (u, CandidateOrigin::Citation));
    let inline = scan_text(text)
        .into_iter()
        .map(|u| (u, CandidateOrigin::Completion));

    for (url, origin) in cited.chain(inline) {
        if seen.insert(url.as_str().to_string()) {
            candidates.push(Candidate::new(url, origin));
        }
    }

    for item in parse_items(text) {
        let Some(url) = item.url.as_deref().and_then(normalize_url) else {
            continue;
        };
        if let Some(candidate) = candidates.iter_mut().find(|c| c.url == url) {
            if let Some(name) = item.name.filter(|n| !n.trim().is_empty()) {
                candidate.name = Some(name.trim().to_string());
            }
            if let Some(slot) = item.category.as_deref().and_then(OutfitSlot::from_label) {
                candidate.slot = Some(slot);
            }
        }
    }

    candidates
}

fn scan_text(text: &str) -> Vec<Url> {
    // Invisible characters act as separators so they can't glue a URL to
    // the word after it.
    let cleaned: String = text
        .chars()
        .map(|c| if INVISIBLE.contains(&c) { ' ' } else { c })
        .collect();

    URL_REGEX
        .find_iter(&cleaned)
        .filter_map(|m| normalize_url(m.as_str()))
        .collect()
}

/// Strip debris and normalize a single raw URL.
///
/// Returns `None` for anything that isn't an absolute http(s) URL with a host.
pub fn normalize_url(raw: &str) -> Option<Url> {
    let without_invisible: String = raw.chars().filter(|c| !INVISIBLE.contains(c)).collect();
    let trimmed = without_invisible
        .trim()
        .trim_start_matches(['<', '(', '[', '"', '\''])
        .trim_end_matches(TRAILING_PUNCTUATION);

    let mut url = Url::parse(trimmed).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.host_str().filter(|h| h.contains('.'))?;

    url.set_fragment(None);

    if url.query_pairs().any(|(k, _)| is_tracking_param(&k)) {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| !is_tracking_param(k))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
    }

    Some(url)
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}

/// One structured item from a JSON completion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelItem {
    #[serde(default, alias = "slot", alias = "type")]
    pub category: Option<String>,
    #[serde(default, alias = "title")]
    pub name: Option<String>,
    #[serde(default, alias = "link")]
    pub url: Option<String>,
}

/// Parse a JSON array of items from a completion, if there is one.
///
/// Looks for a fenced ```json block first, then for the outermost `[...]`.
/// Anything that doesn't parse yields an empty list.
pub fn parse_items(text: &str) -> Vec<ModelItem> {
    if let Some(block) = JSON_FENCE_REGEX.captures(text).and_then(|c| c.get(1)) {
        if let Ok(items) = serde_json::from_str::<Vec<ModelItem>>(block.as_str()) {
            return items;
        }
    }

    let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) else {
        return Vec::new();
    };
    if end <= start {
        return Vec::new();
    }

    serde_json::from_str::<Vec<ModelItem>>(&text[start..=end]).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_trailing_punctuation() {
        assert_eq!(extract_urls("see https://a.com/p/1)."), vec!["https://a.com/p/1"]);
        assert_eq!(
            extract_urls("links: https://a.com/p/1, https://a.com/p/2; https://a.com/p/3!"),
            vec!["https://a.com/p/1", "https://a.com/p/2", "https://a.com/p/3"]
        );
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = "1. https://a.com/p/1\n2. [shirt](https://b.com/x?id=2)\n3. https://a.com/p/1.";
        let first = extract_urls(text);
        let second = extract_urls(text);
        assert_eq!(first, second);
        assert_eq!(first, vec!["https://a.com/p/1", "https://b.com/x?id=2"]);
    }

    #[test]
    fn test_strips_zero_width_characters() {
        let text = "here\u{200B}https://a.com/p/1\u{200B}\u{FEFF} and more";
        assert_eq!(extract_urls(text), vec!["https://a.com/p/1"]);
    }

    #[test]
    fn test_markdown_and_quotes() {
        let text = r#"**Top:** [Linen shirt](https://www.zara.com/us/en/linen-p01234567.html) "https://b.com/q/9""#;
        assert_eq!(
            extract_urls(text),
            vec![
                "https://www.zara.com/us/en/linen-p01234567.html",
                "https://b.com/q/9"
            ]
        );
    }

    #[test]
    fn test_normalize_drops_fragment_and_tracking() {
        let url = normalize_url("https://WWW.Zara.com/x?utm_source=grok&color=blue&fbclid=1#reviews").unwrap();
        assert_eq!(url.as_str(), "https://www.zara.com/x?color=blue");

        let url = normalize_url("https://a.com/p/1?utm_medium=chat").unwrap();
        assert_eq!(url.as_str(), "https://a.com/p/1");
    }

    #[test]
    fn test_normalize_rejects_non_web() {
        assert!(normalize_url("ftp://a.com/file").is_none());
        assert!(normalize_url("https://localhost/x").is_none());
        assert!(normalize_url("not a url").is_none());
    }

    #[test]
    fn test_no_matches_is_empty() {
        assert!(extract_urls("no links here").is_empty());
        assert!(extract_candidates("", &[]).is_empty());
    }

    #[test]
    fn test_citations_first_and_deduplicated() {
        let citations = vec![
            "https://c.com/p/1".to_string(),
            "https://a.com/p/1.".to_string(),
        ];
        let candidates = extract_candidates("try https://a.com/p/1 or https://b.com/p/2", &citations);

        let urls: Vec<&str> = candidates.iter().map(|c| c.as_str()).collect();
        assert_eq!(urls, vec!["https://c.com/p/1", "https://a.com/p/1", "https://b.com/p/2"]);
        assert_eq!(candidates[0].origin, CandidateOrigin::Citation);
        assert_eq!(candidates[1].origin, CandidateOrigin::Citation);
        assert_eq!(candidates[2].origin, CandidateOrigin::Completion);
    }

    #[test]
    fn test_json_items_label_candidates() {
        let text = r#"Here you go:
```json
[
  {"category": "top", "name": "Linen shirt", "url": "https://www.zara.com/us/en/linen-p01234567.html"},
  {"category": "Sneakers", "name": "Court sneaker", "url": "https://www.nike.com/t/x/CW2288-111"},
  {"category": "bottom", "name": "", "url": "not-a-url"}
]
```"#;
        let candidates = extract_candidates(text, &[]);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name.as_deref(), Some("Linen shirt"));
        assert_eq!(candidates[0].slot, Some(OutfitSlot::Top));
        assert_eq!(candidates[1].slot, Some(OutfitSlot::Footwear));
    }

    #[test]
    fn test_bare_json_array_and_aliases() {
        let text = r#"[{"slot": "outerwear", "title": "Trench", "link": "https://a.com/p/7"}]"#;
        let items = parse_items(text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].category.as_deref(), Some("outerwear"));
        assert_eq!(items[0].name.as_deref(), Some("Trench"));
        assert_eq!(items[0].url.as_deref(), Some("https://a.com/p/7"));
    }

    #[test]
    fn test_malformed_json_is_ignored() {
        assert!(parse_items("[not json at all]").is_empty());
        assert!(parse_items("] backwards [").is_empty());

        let candidates = extract_candidates("[{\"url\": \"https://a.com/p/1\"", &[]);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].name.is_none());
    }
}
