//! xAI implementation of the ChatModel trait.
//!
//! ```rust,ignore
//! use outfit_finder::ai::{ModelMode, XaiModel};
//!
//! let model = XaiModel::new(XaiClient::from_env()?, "grok-4")
//!     .with_mode(ModelMode::Live)
//!     .with_allowed_websites(patterns.domains());
//! ```

use async_trait::async_trait;
use tracing::debug;
use xai_client::{ChatRequest, Message, SearchParameters, XaiClient};

use crate::error::{FinderError, Result};
use crate::security::ModelCredentials;
use crate::traits::model::{ChatModel, Completion, Prompt};

/// Whether completions use live web search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelMode {
    /// Plain completion; URLs come from the model's memory
    Generative,
    /// Search-augmented completion with citations
    Live,
}

/// [`ChatModel`] backed by the xAI chat completions API.
#[derive(Debug, Clone)]
pub struct XaiModel {
    client: XaiClient,
    model: String,
    mode: ModelMode,
    temperature: f32,
    max_tokens: u32,
    max_search_results: u32,
    allowed_websites: Vec<String>,
}

impl XaiModel {
    pub fn new(client: XaiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            mode: ModelMode::Live,
            temperature: 0.3,
            max_tokens: 1200,
            max_search_results: 6,
            allowed_websites: Vec::new(),
        }
    }

    /// Build from credentials (key, model, optional base URL).
    pub fn from_credentials(credentials: &ModelCredentials) -> Self {
        let mut client = XaiClient::new(credentials.api_key.expose());
        if let Some(base_url) = &credentials.base_url {
            client = client.with_base_url(base_url.clone());
        }
        Self::new(client, credentials.model.clone())
    }

    pub fn with_mode(mut self, mode: ModelMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_search_results(mut self, max_results: u32) -> Self {
        self.max_search_results = max_results;
        self
    }

    /// Restrict web search to these domains (the API keeps the first five).
    pub fn with_allowed_websites(mut self, domains: Vec<String>) -> Self {
        self.allowed_websites = domains;
        self
    }

    pub fn mode(&self) -> ModelMode {
        self.mode
    }

    fn request(&self, prompt: &Prompt) -> ChatRequest {
        let request = ChatRequest::new(self.model.clone())
            .message(Message::system(prompt.system.clone()))
            .message(Message::user(prompt.user.clone()))
            .temperature(self.temperature)
            .max_tokens(self.max_tokens);

        match self.mode {
            ModelMode::Generative => request,
            ModelMode::Live => request.search(SearchParameters::live(
                self.max_search_results,
                &self.allowed_websites,
            )),
        }
    }
}

#[async_trait]
impl ChatModel for XaiModel {
    async fn complete(&self, prompt: &Prompt) -> Result<Completion> {
        let response = self
            .client
            .chat_completion(self.request(prompt))
            .await
            .map_err(FinderError::model)?;

        debug!(
            attempt = prompt.attempt,
            strict = prompt.strict,
            content_len = response.content.len(),
            citations = response.citations.len(),
            "xAI completion received"
        );

        Ok(Completion {
            text: response.content,
            citations: response.citations,
        })
    }

    fn name(&self) -> &str {
        &self.model
    }
}
