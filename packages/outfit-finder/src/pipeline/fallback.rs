//! Fallback substitution.
//!
//! When validation comes up short, the reply is padded with known links:
//! catalog entries for the style the user named, then retailer homepages.
//! Padding is reported in the [`Outcome`], never hidden.

use std::collections::HashSet;

use tracing::info;
use url::Url;

use crate::patterns::ProductPatterns;
use crate::pipeline::extract::normalize_url;
use crate::types::outcome::{Outcome, Suggestion, SuggestionSource};
use crate::types::slot::OutfitSlot;

/// A hardcoded link used when live validation can't fill the reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub name: String,
    pub url: Url,
    pub slot: Option<OutfitSlot>,
}

/// Retailer homepages from the allow-list, in table order.
pub fn homepage_placeholders(patterns: &ProductPatterns) -> Vec<Placeholder> {
    patterns
        .entries()
        .iter()
        .filter_map(|entry| {
            Some(Placeholder {
                name: entry.label.clone(),
                url: normalize_url(&entry.homepage)?,
                slot: None,
            })
        })
        .collect()
}

/// Turn validated suggestions into an [`Outcome`], padding when allowed.
///
/// - `validated.len() >= target`: `Validated`, truncated to `target`
/// - short with fallback disabled: `Degraded` with no padding, or `Nothing`
/// - short with fallback enabled: placeholders appended until `target`,
///   skipping URLs already present
pub fn complete(
    mut validated: Vec<Suggestion>,
    placeholders: Vec<Placeholder>,
    target: usize,
    enabled: bool,
) -> Outcome {
    if validated.len() >= target {
        validated.truncate(target);
        return Outcome::Validated {
            suggestions: validated,
        };
    }

    let mut fallback = Vec::new();
    if enabled {
        let mut seen: HashSet<String> = validated
            .iter()
            .map(|s| normalized_key(&s.url))
            .collect();
        let mut taken: Vec<OutfitSlot> = validated.iter().map(|s| s.slot).collect();

        for placeholder in placeholders {
            if validated.len() + fallback.len() >= target {
                break;
            }
            if !seen.insert(normalized_key(placeholder.url.as_str())) {
                continue;
            }

            let slot = OutfitSlot::assign(placeholder.slot, &taken);
            taken.push(slot);
            fallback.push(Suggestion {
                slot,
                name: placeholder.name,
                url: placeholder.url.to_string(),
                title: None,
                source: SuggestionSource::Fallback,
            });
        }

        info!(
            validated = validated.len(),
            fallback = fallback.len(),
            target,
            "Padded short result with placeholders"
        );
    }

    if validated.is_empty() && fallback.is_empty() {
        Outcome::Nothing
    } else {
        Outcome::Degraded {
            validated,
            fallback,
        }
    }
}

fn normalized_key(url: &str) -> String {
    let normalized = normalize_url(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|| url.to_string());
    normalized.trim_end_matches('/').to_string()
}
