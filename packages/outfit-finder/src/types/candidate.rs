//! Candidate URLs and their validation results.

use url::Url;

use super::slot::OutfitSlot;

/// Where a candidate URL was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOrigin {
    /// Returned by live search as a citation
    Citation,
    /// Found in the completion text
    Completion,
}

/// A URL extracted from model output or citations, not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Normalized URL (lowercase host, no fragment, no tracking params)
    pub url: Url,

    pub origin: CandidateOrigin,

    /// Item name, when the model returned structured items
    pub name: Option<String>,

    /// Slot the model put the item in, when it said so
    pub slot: Option<OutfitSlot>,
}

impl Candidate {
    pub fn new(url: Url, origin: CandidateOrigin) -> Self {
        Self {
            url,
            origin,
            name: None,
            slot: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_slot(mut self, slot: OutfitSlot) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

/// Why a candidate was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Path points at an image file
    ImageUrl,
    /// Both HEAD and GET failed at the transport level
    Unreachable(String),
    /// Final status was not 200
    Status(u16),
    /// Served something other than HTML
    NotHtml(String),
    /// Redirected to a page that is no longer product-like
    RedirectedAway(String),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::ImageUrl => write!(f, "image url"),
            RejectReason::Unreachable(e) => write!(f, "unreachable: {}", e),
            RejectReason::Status(code) => write!(f, "status {}", code),
            RejectReason::NotHtml(ct) => write!(f, "content-type {}", ct),
            RejectReason::RedirectedAway(to) => write!(f, "redirected to {}", to),
        }
    }
}

/// Outcome of checking one candidate over the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    /// URL after redirects
    pub final_url: Url,

    pub status: Option<u16>,

    pub content_type: Option<String>,

    /// `<title>` of the page when title fetching is on
    pub title: Option<String>,

    /// `None` means accepted
    pub rejection: Option<RejectReason>,
}

impl Validation {
    pub fn accepted(final_url: Url) -> Self {
        Self {
            final_url,
            status: Some(200),
            content_type: Some("text/html".to_string()),
            title: None,
            rejection: None,
        }
    }

    pub fn rejected(url: Url, reason: RejectReason) -> Self {
        Self {
            final_url: url,
            status: None,
            content_type: None,
            title: None,
            rejection: Some(reason),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn is_accepted(&self) -> bool {
        self.rejection.is_none()
    }
}
