//! Pure xAI REST API client
//!
//! A minimal client for the xAI chat completion API with no domain-specific
//! logic. Supports plain generative completions and live search completions
//! that return citation URLs.
//!
//! # Example
//!
//! ```rust,ignore
//! use xai_client::{XaiClient, ChatRequest, Message, SearchParameters};
//!
//! let client = XaiClient::from_env()?;
//!
//! let response = client.chat_completion(
//!     ChatRequest::new("grok-4")
//!         .message(Message::user("Find a linen shirt on zara.com"))
//!         .temperature(0.3)
//!         .search(SearchParameters::live(6, &["zara.com".to_string()])),
//! ).await?;
//!
//! println!("{}\n{:?}", response.content, response.citations);
//! ```

pub mod error;
pub mod types;

pub use error::{Result, XaiError};
pub use types::*;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.x.ai/v1";

/// Live search completions routinely take tens of seconds.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Pure xAI API client.
#[derive(Clone)]
pub struct XaiClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for XaiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XaiClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl XaiClient {
    /// Create a new xAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: build_http_client(DEFAULT_TIMEOUT),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `XAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("XAI_API_KEY")
            .map_err(|_| XaiError::Config("XAI_API_KEY not set".into()))?;
        if api_key.trim().is_empty() {
            return Err(XaiError::Config("XAI_API_KEY is empty".into()));
        }
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for proxies, compatible gateways, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_client = build_http_client(timeout);
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    ///
    /// Send messages to the chat completion API and get the first choice back,
    /// together with any citations live search produced.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "xAI request failed");
                XaiError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "xAI API error");
            return Err(XaiError::Api(format!("xAI API error {}: {}", status, error_text)));
        }

        let raw: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| XaiError::Parse(e.to_string()))?;

        let chat_response = raw
            .into_response()
            .ok_or_else(|| XaiError::Api("No choices in xAI response".into()))?;

        debug!(
            model = %request.model,
            search = request.search_parameters.is_some(),
            citations = chat_response.citations.len(),
            duration_ms = start.elapsed().as_millis(),
            "xAI chat completion"
        );

        Ok(chat_response)
    }
}

fn build_http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}
