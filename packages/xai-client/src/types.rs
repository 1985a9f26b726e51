//! xAI API request and response types.

use serde::{Deserialize, Serialize};

// =============================================================================
// Chat Completion
// =============================================================================

/// Chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model to use (e.g., "grok-4", "grok-3-mini")
    pub model: String,

    /// Conversation messages
    pub messages: Vec<Message>,

    /// Sampling temperature (0.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens in completion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Live search settings. Absent means a purely generative completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_parameters: Option<SearchParameters>,
}

impl Default for ChatRequest {
    fn default() -> Self {
        Self {
            model: "grok-4".to_string(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
            search_parameters: None,
        }
    }
}

impl ChatRequest {
    /// Create a new chat request with the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Add a message to the conversation.
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Set temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set max tokens.
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Enable live search with the given parameters.
    pub fn search(mut self, parameters: SearchParameters) -> Self {
        self.search_parameters = Some(parameters);
        self
    }
}

/// Chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role: "system", "user", "assistant"
    pub role: String,

    /// Message content
    pub content: String,
}

impl Message {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

// =============================================================================
// Live Search
// =============================================================================

/// Live search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Never search
    Off,
    /// Model decides
    Auto,
    /// Always search
    On,
}

/// A data source the search may draw from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchSource {
    Web {
        /// Restrict web results to these sites (the API accepts at most five).
        #[serde(skip_serializing_if = "Option::is_none")]
        allowed_websites: Option<Vec<String>>,
    },
    News,
    X,
}

/// `search_parameters` block of a chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParameters {
    pub mode: SearchMode,

    /// Ask the API to return the URLs it used.
    pub return_citations: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_search_results: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SearchSource>,
}

/// Upper bound the API enforces on `allowed_websites`.
pub const MAX_ALLOWED_WEBSITES: usize = 5;

impl SearchParameters {
    /// Always-on search over web, news and X with citations returned.
    ///
    /// `allowed_websites` is truncated to [`MAX_ALLOWED_WEBSITES`]; an empty
    /// list leaves the web source unrestricted.
    pub fn live(max_results: u32, allowed_websites: &[String]) -> Self {
        let allowed: Vec<String> = allowed_websites
            .iter()
            .take(MAX_ALLOWED_WEBSITES)
            .cloned()
            .collect();

        Self {
            mode: SearchMode::On,
            return_citations: true,
            max_search_results: Some(max_results),
            sources: vec![
                SearchSource::Web {
                    allowed_websites: if allowed.is_empty() { None } else { Some(allowed) },
                },
                SearchSource::News,
                SearchSource::X,
            ],
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Chat completion response.
#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    /// Response content (empty when the model returned nothing usable)
    pub content: String,

    /// Citation URLs returned by live search, in API order
    pub citations: Vec<String>,

    /// Token usage statistics
    pub usage: Option<Usage>,
}

/// Raw chat response from API (for internal parsing).
#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponseRaw {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    pub usage: Option<Usage>,
    #[serde(default)]
    pub citations: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: Option<ChatMessageResponse>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatMessageResponse {
    pub content: Option<String>,
    #[serde(default)]
    pub citations: Option<Vec<String>>,
}

impl ChatResponseRaw {
    /// Flatten the first choice into a [`ChatResponse`].
    ///
    /// Citations may appear at the top level or inside the message; both are
    /// merged, top level first, without duplicates.
    pub(crate) fn into_response(self) -> Option<ChatResponse> {
        let choice = self.choices.into_iter().next()?;

        let (message_content, message_citations) = match choice.message {
            Some(m) => (m.content, m.citations.unwrap_or_default()),
            None => (None, Vec::new()),
        };

        let content = message_content
            .filter(|c| !c.is_empty())
            .or(choice.text)
            .unwrap_or_default();

        let mut citations: Vec<String> = Vec::new();
        for url in self
            .citations
            .unwrap_or_default()
            .into_iter()
            .chain(message_citations)
        {
            if !citations.contains(&url) {
                citations.push(url);
            }
        }

        Some(ChatResponse {
            content,
            citations,
            usage: self.usage,
        })
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,

    /// Tokens in the completion
    pub completion_tokens: u32,

    /// Total tokens used
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generative_request_omits_search() {
        let request = ChatRequest::new("grok-4")
            .message(Message::user("hi"))
            .temperature(0.3);

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "grok-4");
        assert_eq!(value["messages"][0]["role"], "user");
        assert!(value.get("search_parameters").is_none());
        assert!(value.get("max_tokens").is_none());
    }

    #[test]
    fn test_live_search_serialization() {
        let sites = vec!["zara.com".to_string(), "hm.com".to_string()];
        let request = ChatRequest::new("grok-4").search(SearchParameters::live(6, &sites));

        let value = serde_json::to_value(&request).unwrap();
        let params = &value["search_parameters"];
        assert_eq!(params["mode"], "on");
        assert_eq!(params["return_citations"], true);
        assert_eq!(params["max_search_results"], 6);
        assert_eq!(
            params["sources"][0],
            json!({"type": "web", "allowed_websites": ["zara.com", "hm.com"]})
        );
        assert_eq!(params["sources"][1], json!({"type": "news"}));
        assert_eq!(params["sources"][2], json!({"type": "x"}));
    }

    #[test]
    fn test_live_search_caps_allowed_websites() {
        let sites: Vec<String> = (0..8).map(|i| format!("shop{}.com", i)).collect();
        let params = SearchParameters::live(10, &sites);

        match &params.sources[0] {
            SearchSource::Web { allowed_websites } => {
                assert_eq!(allowed_websites.as_ref().unwrap().len(), MAX_ALLOWED_WEBSITES);
            }
            other => panic!("unexpected source {:?}", other),
        }
    }

    #[test]
    fn test_response_merges_citations() {
        let raw: ChatResponseRaw = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "content": "see https://a.com/x",
                    "citations": ["https://b.com/1", "https://c.com/2"]
                }
            }],
            "citations": ["https://b.com/1"]
        }))
        .unwrap();

        let response = raw.into_response().unwrap();
        assert_eq!(response.content, "see https://a.com/x");
        assert_eq!(response.citations, vec!["https://b.com/1", "https://c.com/2"]);
    }

    #[test]
    fn test_response_falls_back_to_text_field() {
        let raw: ChatResponseRaw = serde_json::from_value(json!({
            "choices": [{"text": "legacy completion"}]
        }))
        .unwrap();

        let response = raw.into_response().unwrap();
        assert_eq!(response.content, "legacy completion");
        assert!(response.citations.is_empty());
    }

    #[test]
    fn test_response_without_choices() {
        let raw: ChatResponseRaw = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(raw.into_response().is_none());
    }
}
