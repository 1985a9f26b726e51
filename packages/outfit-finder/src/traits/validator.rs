//! Page validator trait.

use async_trait::async_trait;
use url::Url;

use crate::types::candidate::Validation;

/// Checks that a candidate URL is a live HTML page.
///
/// Never fails: every problem is reported as a rejected [`Validation`].
#[async_trait]
pub trait PageValidator: Send + Sync {
    async fn validate(&self, url: &Url) -> Validation;
}
