//! Retrieval tools
//!
//! Each tool wraps one external lookup service and turns a question into a
//! bounded text snippet. The router only sees the [`Retriever`] trait; the
//! concrete variants live in their own modules.

pub mod arxiv;
pub mod duckduckgo;
pub mod wikipedia;

pub use arxiv::ArxivRetriever;
pub use duckduckgo::DuckDuckGoRetriever;
pub use wikipedia::WikipediaRetriever;

use crate::error::{Result, SearchAgentError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three lookup services a question can be answered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Academic paper index
    #[serde(rename = "arXiv")]
    Arxiv,
    /// Encyclopedia
    #[serde(rename = "Wikipedia")]
    Wikipedia,
    /// General web search
    #[serde(rename = "DuckDuckGo")]
    DuckDuckGo,
}

impl Source {
    /// Human-readable label used in citations
    ///
    /// # Examples
    ///
    /// ```
    /// use search_agent::retrieval::Source;
    ///
    /// assert_eq!(Source::Arxiv.label(), "arXiv");
    /// assert_eq!(Source::DuckDuckGo.to_string(), "DuckDuckGo");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            Source::Arxiv => "arXiv",
            Source::Wikipedia => "Wikipedia",
            Source::DuckDuckGo => "DuckDuckGo",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A lookup service that produces a context snippet for a question
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Which service this tool queries
    fn source(&self) -> Source;

    /// Fetch a snippet for the question
    ///
    /// # Errors
    ///
    /// Returns a `Retrieval` error if the service is unreachable or answers
    /// with a non-success status or an unreadable body.
    async fn fetch(&self, question: &str) -> Result<String>;
}

/// Truncate to at most `max_chars` characters without splitting a character
///
/// # Examples
///
/// ```
/// use search_agent::retrieval::truncate_chars;
///
/// assert_eq!(truncate_chars("héllo", 2), "hé");
/// assert_eq!(truncate_chars("hi", 10), "hi");
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Build the HTTP client shared by one retrieval tool
pub(crate) fn build_client(source: Source) -> Result<Client> {
    Client::builder()
        .user_agent(concat!("search-agent/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            SearchAgentError::retrieval(
                source.label(),
                format!("Failed to create HTTP client: {}", e),
            )
            .into()
        })
}

/// Send a lookup request and return the body of a successful response
pub(crate) async fn fetch_body(source: Source, request: RequestBuilder) -> Result<String> {
    let response = request.send().await.map_err(|e| {
        tracing::error!("{} request failed: {}", source, e);
        SearchAgentError::retrieval(source.label(), format!("Request failed: {}", e))
    })?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!("{} returned error {}: {}", source, status, error_text);
        return Err(SearchAgentError::retrieval(
            source.label(),
            format!("Service returned {}", status),
        )
        .into());
    }

    response.text().await.map_err(|e| {
        tracing::error!("Failed to read {} response body: {}", source, e);
        SearchAgentError::retrieval(source.label(), format!("Failed to read response: {}", e))
            .into()
    })
}

/// Collapse runs of whitespace into single spaces and trim the ends
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
