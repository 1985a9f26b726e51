//! Chat model trait used by the search loop.
//!
//! Implementations wrap a completion API and return raw text plus whatever
//! citation URLs the provider reports. Parsing that text is the pipeline's
//! job, not the model's.

use async_trait::async_trait;

use crate::error::Result;

/// One prompt sent to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,

    /// Bare-URL retry mode
    pub strict: bool,

    /// 1-based attempt number
    pub attempt: usize,
}

/// Raw model answer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub text: String,

    /// Source URLs reported by live search, in provider order
    pub citations: Vec<String>,
}

impl Completion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            citations: Vec::new(),
        }
    }

    pub fn with_citations(mut self, citations: Vec<String>) -> Self {
        self.citations = citations;
        self
    }
}

/// A text completion backend.
///
/// Errors are counted as failed attempts by the caller; they never abort a
/// search.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one completion.
    async fn complete(&self, prompt: &Prompt) -> Result<Completion>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "model"
    }
}
