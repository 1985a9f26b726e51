//! Reachability validation over HTTP.
//!
//! HEAD first, GET when HEAD is refused or inconclusive. A page passes only
//! with status 200 and an HTML content type. Image paths are rejected before
//! any request is made.

use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use tracing::debug;
use url::Url;

use crate::error::{FinderError, Result};
use crate::patterns::is_image_path;
use crate::traits::validator::PageValidator;
use crate::types::candidate::{RejectReason, Validation};
use crate::types::config::FinderConfig;

/// Retail sites serve bots differently, so look like a browser.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Most bytes read from a GET body when looking for `<title>`.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

const MAX_REDIRECTS: usize = 5;

lazy_static! {
    static ref TITLE_REGEX: Regex = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap();
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();
}

/// [`PageValidator`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpValidator {
    client: reqwest::Client,
    fetch_titles: bool,
}

impl HttpValidator {
    /// Build a validator with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .parse()
                .map_err(|_| FinderError::Config("invalid accept header".into()))?,
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            "en-US,en;q=0.5"
                .parse()
                .map_err(|_| FinderError::Config("invalid accept-language header".into()))?,
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| FinderError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            fetch_titles: false,
        })
    }

    /// Build from pipeline config (timeout and title fetching).
    pub fn from_config(config: &FinderConfig) -> Result<Self> {
        Ok(Self::new(config.http_timeout)?.with_titles(config.fetch_titles))
    }

    /// Read `<title>` from accepted pages. Forces a GET per page.
    pub fn with_titles(mut self, fetch: bool) -> Self {
        self.fetch_titles = fetch;
        self
    }

    /// HEAD probe. `Some` is a final verdict, `None` means try GET.
    async fn probe_head(&self, url: &Url) -> Option<Validation> {
        let response = match self.client.head(url.as_str()).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(url = %url, error = %e.without_url(), "HEAD failed, trying GET");
                return None;
            }
        };

        let status = response.status().as_u16();
        if status != 200 {
            debug!(url = %url, status, "HEAD not 200, trying GET");
            return None;
        }

        let content_type = content_type(response.headers());
        let final_url = response.url().clone();

        match content_type.as_deref() {
            Some(ct) if is_image_type(ct) => Some(Validation {
                final_url,
                status: Some(status),
                content_type: Some(ct.to_string()),
                title: None,
                rejection: Some(RejectReason::NotHtml(ct.to_string())),
            }),
            Some(ct) if is_html_type(ct) && !self.fetch_titles => Some(Validation {
                final_url,
                status: Some(status),
                content_type: Some(ct.to_string()),
                title: None,
                rejection: None,
            }),
            // Missing or odd content type on HEAD is common; GET decides
            _ => None,
        }
    }

    async fn fetch(&self, url: &Url) -> Validation {
        let mut response = match self.client.get(url.as_str()).send().await {
            Ok(response) => response,
            Err(e) => {
                let e = e.without_url();
                debug!(url = %url, error = %e, "GET failed");
                return Validation::rejected(url.clone(), RejectReason::Unreachable(e.to_string()));
            }
        };

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let content_type = content_type(response.headers());

        let mut validation = Validation {
            final_url,
            status: Some(status),
            content_type: content_type.clone(),
            title: None,
            rejection: None,
        };

        if status != 200 {
            validation.rejection = Some(RejectReason::Status(status));
            return validation;
        }

        let ct = content_type.unwrap_or_default();
        if !is_html_type(&ct) {
            validation.rejection = Some(RejectReason::NotHtml(ct));
            return validation;
        }

        if self.fetch_titles {
            let body = read_capped(&mut response, MAX_BODY_BYTES).await;
            validation.title = extract_title(&body);
        }

        validation
    }
}

#[async_trait]
impl PageValidator for HttpValidator {
    async fn validate(&self, url: &Url) -> Validation {
        if is_image_path(url.path()) {
            debug!(url = %url, "Rejected image path without fetching");
            return Validation::rejected(url.clone(), RejectReason::ImageUrl);
        }

        if let Some(verdict) = self.probe_head(url).await {
            return verdict;
        }

        self.fetch(url).await
    }
}

fn content_type(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_lowercase())
}

fn is_html_type(content_type: &str) -> bool {
    let ct = content_type.to_lowercase();
    (ct.contains("text/html") || ct.contains("application/xhtml+xml")) && !is_image_type(&ct)
}

fn is_image_type(content_type: &str) -> bool {
    content_type.trim_start().to_lowercase().starts_with("image/")
}

/// Read at most `cap` bytes of body. Read errors end the read early.
async fn read_capped(response: &mut reqwest::Response, cap: usize) -> String {
    let mut buf: Vec<u8> = Vec::new();
    while buf.len() < cap {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let room = cap - buf.len();
                buf.extend_from_slice(&chunk[..chunk.len().min(room)]);
            }
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e.without_url(), "Body read stopped");
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// First `<title>` in an HTML document, entity-decoded and whitespace-collapsed.
pub fn extract_title(html: &str) -> Option<String> {
    let raw = TITLE_REGEX.captures(html)?.get(1)?.as_str();
    let collapsed = WHITESPACE_REGEX.replace_all(raw.trim(), " ");
    let decoded = decode_entities(&collapsed);
    (!decoded.is_empty()).then_some(decoded)
}

fn decode_entities(text: &str) -> String {
    // &amp; goes last so "&amp;lt;" stays "&lt;"
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
