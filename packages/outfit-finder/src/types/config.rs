//! Configuration for the search pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Hard ceiling on attempts regardless of configuration.
pub const MAX_ATTEMPTS_CEILING: usize = 5;

/// Configuration for [`Finder`](crate::Finder).
///
/// Built once at process start and passed in explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Number of suggestions a reply aims for.
    ///
    /// Results never exceed this. Default: 5.
    pub target: usize,

    /// Model calls per request, first normal then strict.
    ///
    /// Clamped to `1..=5`. Default: 3.
    pub max_attempts: usize,

    /// Simultaneous validation requests per batch. Default: 16.
    pub validation_concurrency: usize,

    /// Candidates validated per attempt, to bound network fan-out.
    ///
    /// Default: 15.
    pub max_candidates_per_attempt: usize,

    /// Per-request HTTP timeout for validation. Default: 10s.
    #[serde(with = "duration_secs")]
    pub http_timeout: Duration,

    /// Read `<title>` from validated pages. Default: false.
    pub fetch_titles: bool,

    /// Pad short results with placeholders. Default: true.
    pub fallback_enabled: bool,

    /// Recheck tried candidates with the loose product policy when short.
    ///
    /// Default: true.
    pub loose_recheck: bool,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            target: 5,
            max_attempts: 3,
            validation_concurrency: 16,
            max_candidates_per_attempt: 15,
            http_timeout: Duration::from_secs(10),
            fetch_titles: false,
            fallback_enabled: true,
            loose_recheck: true,
        }
    }
}

impl FinderConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attempt bound (clamped to `1..=5`).
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.clamp(1, MAX_ATTEMPTS_CEILING);
        self
    }

    /// Set the target count (at least 1).
    pub fn with_target(mut self, target: usize) -> Self {
        self.target = target.max(1);
        self
    }

    /// Set validation concurrency (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.validation_concurrency = concurrency.max(1);
        self
    }

    /// Set per-request HTTP timeout.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Enable or disable title fetching.
    pub fn with_titles(mut self, fetch: bool) -> Self {
        self.fetch_titles = fetch;
        self
    }

    /// Enable or disable fallback padding.
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_enabled = enabled;
        self
    }

    /// Enable or disable the final loose recheck.
    pub fn with_loose_recheck(mut self, enabled: bool) -> Self {
        self.loose_recheck = enabled;
        self
    }

    /// Attempt bound after clamping, for configs built by deserialization.
    pub fn attempts(&self) -> usize {
        self.max_attempts.clamp(1, MAX_ATTEMPTS_CEILING)
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
