//! What a search hands to the presentation layer.

use serde::Serialize;

use super::slot::OutfitSlot;

/// How a suggestion was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    /// Live product page that passed validation
    Validated,
    /// Placeholder substituted because validation came up short
    Fallback,
}

/// One line of the reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub slot: OutfitSlot,
    pub name: String,
    pub url: String,
    pub title: Option<String>,
    pub source: SuggestionSource,
}

impl Suggestion {
    /// Best display name: model-provided name, else page title, else the URL.
    pub fn display_name(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.url)
    }
}

/// Result of a search, with degradation made explicit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "quality", rename_all = "snake_case")]
pub enum Outcome {
    /// The full target count was validated
    Validated { suggestions: Vec<Suggestion> },

    /// Fewer than target validated; `fallback` holds the placeholders used
    /// to pad (possibly empty when fallback is disabled)
    Degraded {
        validated: Vec<Suggestion>,
        fallback: Vec<Suggestion>,
    },

    /// Nothing could be produced at all
    Nothing,
}

impl Outcome {
    /// All suggestions in display order (validated first).
    pub fn suggestions(&self) -> Vec<&Suggestion> {
        match self {
            Outcome::Validated { suggestions } => suggestions.iter().collect(),
            Outcome::Degraded {
                validated,
                fallback,
            } => validated.iter().chain(fallback.iter()).collect(),
            Outcome::Nothing => Vec::new(),
        }
    }

    pub fn validated_count(&self) -> usize {
        match self {
            Outcome::Validated { suggestions } => suggestions.len(),
            Outcome::Degraded { validated, .. } => validated.len(),
            Outcome::Nothing => 0,
        }
    }

    pub fn fallback_count(&self) -> usize {
        match self {
            Outcome::Degraded { fallback, .. } => fallback.len(),
            _ => 0,
        }
    }

    pub fn is_degraded(&self) -> bool {
        !matches!(self, Outcome::Validated { .. })
    }

    pub fn len(&self) -> usize {
        self.validated_count() + self.fallback_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
