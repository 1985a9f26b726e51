//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the finder without
//! making real model calls or network requests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use url::Url;

use crate::error::{FinderError, Result};
use crate::patterns::is_image_path;
use crate::pipeline::extract::normalize_url;
use crate::traits::{
    model::{ChatModel, Completion, Prompt},
    validator::PageValidator,
};
use crate::types::candidate::{RejectReason, Validation};

#[derive(Debug, Clone)]
enum MockReply {
    Completion(Completion),
    Error(String),
}

/// A scripted chat model.
///
/// Replies are consumed in order. Once the script runs out, the `always`
/// completion is returned, or an empty one.
#[derive(Default, Clone)]
pub struct MockModel {
    script: Arc<RwLock<VecDeque<MockReply>>>,
    always: Option<Completion>,

    /// Every prompt received, for assertions
    prompts: Arc<RwLock<Vec<Prompt>>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a completion.
    pub fn with_completion(self, completion: Completion) -> Self {
        self.script
            .write()
            .unwrap()
            .push_back(MockReply::Completion(completion));
        self
    }

    /// Queue a plain-text completion.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_completion(Completion::new(text))
    }

    /// Queue a failed call.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.script
            .write()
            .unwrap()
            .push_back(MockReply::Error(message.into()));
        self
    }

    /// Reply used once the script is exhausted.
    pub fn always(mut self, completion: Completion) -> Self {
        self.always = Some(completion);
        self
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.read().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for MockModel {
    async fn complete(&self, prompt: &Prompt) -> Result<Completion> {
        self.prompts.write().unwrap().push(prompt.clone());

        let next = self.script.write().unwrap().pop_front();
        match next {
            Some(MockReply::Completion(completion)) => Ok(completion),
            Some(MockReply::Error(message)) => Err(FinderError::Model(message.into())),
            None => Ok(self.always.clone().unwrap_or_default()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A validator that answers from in-memory tables.
///
/// URLs not marked accepted come back as 404. Image paths are rejected
/// the same way the HTTP validator does it.
#[derive(Default, Clone)]
pub struct MockValidator {
    accepted: HashSet<String>,
    titles: HashMap<String, String>,
    redirects: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    delay: Option<Duration>,

    /// URLs validated, in call order
    calls: Arc<RwLock<Vec<String>>>,
}

fn key(url: &str) -> String {
    normalize_url(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|| url.to_string())
}

impl MockValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a URL as a live HTML page.
    pub fn accept(mut self, url: &str) -> Self {
        self.accepted.insert(key(url));
        self
    }

    pub fn accept_all<'a>(mut self, urls: impl IntoIterator<Item = &'a str>) -> Self {
        self.accepted.extend(urls.into_iter().map(key));
        self
    }

    /// Page title reported for an accepted URL.
    pub fn with_title(mut self, url: &str, title: impl Into<String>) -> Self {
        self.titles.insert(key(url), title.into());
        self
    }

    /// Report `to` as the final URL after redirects.
    pub fn redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(key(from), to.to_string());
        self
    }

    /// Delay every validation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Delay validation of one URL.
    pub fn with_delay_for(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(key(url), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl PageValidator for MockValidator {
    async fn validate(&self, url: &Url) -> Validation {
        let k = key(url.as_str());
        self.calls.write().unwrap().push(k.clone());

        if is_image_path(url.path()) {
            return Validation::rejected(url.clone(), RejectReason::ImageUrl);
        }

        if let Some(delay) = self.delays.get(&k).copied().or(self.delay) {
            tokio::time::sleep(delay).await;
        }

        if !self.accepted.contains(&k) {
            let mut validation = Validation::rejected(url.clone(), RejectReason::Status(404));
            validation.status = Some(404);
            return validation;
        }

        let final_url = self
            .redirects
            .get(&k)
            .and_then(|to| Url::parse(to).ok())
            .unwrap_or_else(|| url.clone());

        let mut validation = Validation::accepted(final_url);
        if let Some(title) = self.titles.get(&k) {
            validation = validation.with_title(title.clone());
        }
        validation
    }
}
