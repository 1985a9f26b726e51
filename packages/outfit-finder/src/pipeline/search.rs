//! The retry/escalation loop.
//!
//! Each attempt prompts the model, extracts candidates, drops anything
//! already tried or not product-like, and validates the rest concurrently.
//! The loop stops as soon as the target is met or attempts run out, then a
//! last loose recheck and fallback padding fill what they can.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::{FinderError, Result};
use crate::patterns::{MatchPolicy, ProductPatterns};
use crate::pipeline::extract::extract_candidates;
use crate::pipeline::fallback::{self, homepage_placeholders};
use crate::pipeline::prompts::build_prompt;
use crate::traits::model::ChatModel;
use crate::traits::validator::PageValidator;
use crate::types::candidate::{Candidate, RejectReason, Validation};
use crate::types::config::FinderConfig;
use crate::types::outcome::{Outcome, Suggestion, SuggestionSource};
use crate::types::query::StyleQuery;
use crate::types::slot::OutfitSlot;

/// Finds working product pages for a style query.
///
/// Built once at startup and shared behind an `Arc`; every call to
/// [`Finder::find`] is independent.
pub struct Finder {
    model: Arc<dyn ChatModel>,
    validator: Arc<dyn PageValidator>,
    catalog: Arc<Catalog>,
    patterns: ProductPatterns,
    config: FinderConfig,
}

/// A candidate with its validation result and its position in the batch.
#[derive(Debug, Clone)]
struct Checked {
    index: usize,
    candidate: Candidate,
    validation: Validation,
}

/// Per-request bookkeeping.
#[derive(Default)]
struct SearchState {
    /// Normalized candidate URLs already seen this request
    tried: HashSet<String>,
    /// URLs that failed, echoed into strict prompts
    rejected: Vec<String>,
    /// Allow-listed candidates that failed only the strict pattern
    loose_pool: Vec<Candidate>,
    accepted: Vec<Suggestion>,
    /// Final URLs already accepted, to catch two links redirecting to one page
    accepted_urls: HashSet<String>,
}

impl SearchState {
    fn taken_slots(&self) -> Vec<OutfitSlot> {
        self.accepted.iter().map(|s| s.slot).collect()
    }
}

impl Finder {
    pub fn new(
        model: Arc<dyn ChatModel>,
        validator: Arc<dyn PageValidator>,
        catalog: Arc<Catalog>,
        config: FinderConfig,
    ) -> Self {
        Self {
            model,
            validator,
            catalog,
            patterns: ProductPatterns::builtin(),
            config,
        }
    }

    /// Replace the retailer table.
    pub fn with_patterns(mut self, patterns: ProductPatterns) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    pub fn patterns(&self) -> &ProductPatterns {
        &self.patterns
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run the full search. Never fails; problems degrade the outcome.
    pub async fn find(&self, query: &StyleQuery) -> Outcome {
        let target = self.config.target;
        let attempts = self.config.attempts();
        let domains = self.patterns.domains();
        let mut state = SearchState::default();

        info!(query = %query, target, attempts, "Searching outfit links");

        for attempt in 1..=attempts {
            let needed = target.saturating_sub(state.accepted.len());
            if needed == 0 {
                break;
            }

            let prompt = build_prompt(query, &domains, attempt, needed, &state.rejected);
            let completion = match self.model.complete(&prompt).await {
                Ok(completion) => completion,
                Err(e) => {
                    warn!(attempt, model = self.model.name(), error = %e, "Model call failed");
                    continue;
                }
            };

            let candidates = extract_candidates(&completion.text, &completion.citations);
            let fresh = self.screen(candidates, &mut state);

            debug!(
                attempt,
                strict = prompt.strict,
                citations = completion.citations.len(),
                fresh = fresh.len(),
                "Validating candidates"
            );

            let checked = self
                .validate_batch(fresh, needed, MatchPolicy::Strict, &state.accepted_urls)
                .await;
            self.accept(checked, &mut state, target);

            info!(
                attempt,
                accepted = state.accepted.len(),
                target,
                "Attempt finished"
            );
        }

        if state.accepted.len() < target && self.config.loose_recheck && !state.loose_pool.is_empty() {
            let needed = target - state.accepted.len();
            let pool = std::mem::take(&mut state.loose_pool);
            debug!(pool = pool.len(), needed, "Loose recheck");

            let checked = self
                .validate_batch(pool, needed, MatchPolicy::Loose, &state.accepted_urls)
                .await;
            self.accept(checked, &mut state, target);
        }

        let placeholders = if self.config.fallback_enabled && state.accepted.len() < target {
            let mut placeholders = self.catalog.placeholders_for(query.key());
            placeholders.extend(homepage_placeholders(&self.patterns));
            placeholders
        } else {
            Vec::new()
        };

        let outcome = fallback::complete(
            state.accepted,
            placeholders,
            target,
            self.config.fallback_enabled,
        );

        info!(
            query = %query,
            validated = outcome.validated_count(),
            fallback = outcome.fallback_count(),
            degraded = outcome.is_degraded(),
            "Search finished"
        );

        outcome
    }

    /// [`Finder::find`] that stops when `cancel` fires.
    ///
    /// Cancelling drops the search, which aborts any in-flight validation.
    pub async fn find_with_cancel(
        &self,
        query: &StyleQuery,
        cancel: CancellationToken,
    ) -> Result<Outcome> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(query = %query, "Search cancelled");
                Err(FinderError::Cancelled)
            }
            outcome = self.find(query) => Ok(outcome),
        }
    }

    /// Drop candidates already tried and split the rest by product policy.
    fn screen(&self, candidates: Vec<Candidate>, state: &mut SearchState) -> Vec<Candidate> {
        let mut fresh = Vec::new();

        for candidate in candidates {
            if !state.tried.insert(candidate.as_str().to_string()) {
                continue;
            }

            if self.patterns.is_product(&candidate.url, MatchPolicy::Strict) {
                fresh.push(candidate);
            } else if self.patterns.is_product(&candidate.url, MatchPolicy::Loose) {
                debug!(url = %candidate.url, "Not a product page under strict policy");
                state.rejected.push(candidate.as_str().to_string());
                state.loose_pool.push(candidate);
            } else {
                debug!(url = %candidate.url, "Not an allow-listed product page");
                state.rejected.push(candidate.as_str().to_string());
            }
        }

        if fresh.len() > self.config.max_candidates_per_attempt {
            debug!(
                dropped = fresh.len() - self.config.max_candidates_per_attempt,
                "Too many candidates for one attempt"
            );
            fresh.truncate(self.config.max_candidates_per_attempt);
        }

        fresh
    }

    /// Validate a batch concurrently, stopping once `needed` distinct pages
    /// have passed.
    ///
    /// A pass only counts when its final URL is new to `accepted_urls` and to
    /// the batch, so links redirecting to one page don't cut the batch short.
    /// Remaining tasks are aborted when enough results are in. Returned
    /// results are in candidate order.
    async fn validate_batch(
        &self,
        candidates: Vec<Candidate>,
        needed: usize,
        policy: MatchPolicy,
        accepted_urls: &HashSet<String>,
    ) -> Vec<Checked> {
        if candidates.is_empty() || needed == 0 {
            return Vec::new();
        }

        let semaphore = Arc::new(Semaphore::new(self.config.validation_concurrency.max(1)));
        let mut set = JoinSet::new();

        for (index, candidate) in candidates.into_iter().enumerate() {
            let validator = Arc::clone(&self.validator);
            let semaphore = Arc::clone(&semaphore);
            set.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let validation = validator.validate(&candidate.url).await;
                Checked {
                    index,
                    candidate,
                    validation,
                }
            });
        }

        let mut checked = Vec::new();
        let mut passed_urls = accepted_urls.clone();
        let mut passed = 0;

        while let Some(joined) = set.join_next().await {
            let mut result = match joined {
                Ok(result) => result,
                Err(e) => {
                    warn!(error = %e, "Validation task failed");
                    continue;
                }
            };

            // Dead items often redirect to a category or home page
            if result.validation.is_accepted()
                && !self.patterns.is_product(&result.validation.final_url, policy)
            {
                result.validation.rejection = Some(RejectReason::RedirectedAway(
                    result.validation.final_url.to_string(),
                ));
            }

            if result.validation.is_accepted()
                && passed_urls.insert(result.validation.final_url.to_string())
            {
                passed += 1;
            }
            checked.push(result);

            if passed >= needed {
                set.abort_all();
                break;
            }
        }

        checked.sort_by_key(|c| c.index);
        checked
    }

    /// Fold a validated batch into the request state.
    fn accept(&self, checked: Vec<Checked>, state: &mut SearchState, target: usize) {
        for Checked {
            candidate,
            validation,
            ..
        } in checked
        {
            if let Some(reason) = &validation.rejection {
                debug!(url = %candidate.url, reason = %reason, "Candidate rejected");
                state.rejected.push(candidate.as_str().to_string());
                continue;
            }

            if state.accepted.len() >= target {
                break;
            }

            let final_url = validation.final_url.to_string();
            if !state.accepted_urls.insert(final_url.clone()) {
                debug!(url = %final_url, "Duplicate page after redirects");
                continue;
            }

            let slot = OutfitSlot::assign(candidate.slot, &state.taken_slots());
            state.accepted.push(Suggestion {
                slot,
                name: candidate.name.unwrap_or_default(),
                url: final_url,
                title: validation.title,
                source: SuggestionSource::Validated,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockModel, MockValidator};
    use crate::traits::model::Completion;

    fn finder(model: MockModel, validator: MockValidator, config: FinderConfig) -> Finder {
        Finder::new(
            Arc::new(model),
            Arc::new(validator),
            Arc::new(Catalog::builtin()),
            config,
        )
    }

    #[tokio::test]
    async fn test_batch_keeps_candidate_order() {
        let urls = [
            "https://www.asos.com/x/prd/100001",
            "https://www.asos.com/x/prd/100002",
            "https://www.asos.com/x/prd/100003",
        ];
        let validator = MockValidator::new()
            .accept_all(urls)
            .with_delay_for(urls[0], std::time::Duration::from_millis(30));
        let f = finder(MockModel::new(), validator, FinderConfig::default());

        let candidates = extract_candidates(&urls.join("\n"), &[]);
        let checked = f
            .validate_batch(candidates, 3, MatchPolicy::Strict, &HashSet::new())
            .await;

        let order: Vec<&str> = checked.iter().map(|c| c.candidate.as_str()).collect();
        assert_eq!(order, urls.to_vec());
    }

    #[tokio::test]
    async fn test_redirect_to_category_is_rejected() {
        let product = "https://www.zara.com/us/en/linen-p01234567.html";
        let validator = MockValidator::new()
            .accept(product)
            .redirect(product, "https://www.zara.com/us/en/man-shirts-l737.html");
        let f = finder(MockModel::new(), validator, FinderConfig::default());

        let checked = f
            .validate_batch(
                extract_candidates(product, &[]),
                1,
                MatchPolicy::Strict,
                &HashSet::new(),
            )
            .await;
        assert!(matches!(
            checked[0].validation.rejection,
            Some(RejectReason::RedirectedAway(_))
        ));
    }

    #[tokio::test]
    async fn test_screen_splits_strict_and_loose() {
        let f = finder(MockModel::new(), MockValidator::new(), FinderConfig::default());
        let mut state = SearchState::default();
        let text = "https://www.zara.com/us/en/linen-p01234567.html \
                    https://www.asos.com/women/dresses \
                    https://unknown.example.com/p/1 \
                    https://www.zara.com/us/en/linen-p01234567.html";

        let fresh = f.screen(extract_candidates(text, &[]), &mut state);

        assert_eq!(fresh.len(), 1);
        assert_eq!(state.loose_pool.len(), 1);
        assert_eq!(state.rejected.len(), 2);
        assert_eq!(state.tried.len(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_search_returns_error() {
        let model = MockModel::new().always(Completion::new("https://www.asos.com/x/prd/100001"));
        let validator = MockValidator::new()
            .accept("https://www.asos.com/x/prd/100001")
            .with_delay(std::time::Duration::from_secs(30));
        let f = finder(model, validator, FinderConfig::default());

        let cancel = CancellationToken::new();
        cancel.cancel();

        let query = StyleQuery::parse("casual").unwrap();
        let result = f.find_with_cancel(&query, cancel).await;
        assert!(matches!(result, Err(FinderError::Cancelled)));
    }
}
