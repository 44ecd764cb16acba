//! arXiv retrieval tool
//!
//! Queries the arXiv Atom API and renders the top papers as short
//! `Published / Title / Authors / Summary` blocks.

use super::{build_client, fetch_body, normalize_whitespace, truncate_chars, Retriever, Source};
use crate::config::ArxivConfig;
use crate::error::{Result, SearchAgentError};

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;

/// Returned when the feed holds no entries
pub const NO_RESULT: &str = "No good Arxiv Result was found";

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    published: String,
    #[serde(rename = "author", default)]
    authors: Vec<Author>,
}

#[derive(Debug, Deserialize)]
struct Author {
    #[serde(default)]
    name: String,
}

impl Entry {
    fn render(&self) -> String {
        let authors = self
            .authors
            .iter()
            .map(|a| normalize_whitespace(&a.name))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Published: {}\nTitle: {}\nAuthors: {}\nSummary: {}",
            published_date(&self.published),
            normalize_whitespace(&self.title),
            authors,
            normalize_whitespace(&self.summary)
        )
    }
}

/// Reduce an Atom timestamp to its calendar date
fn published_date(raw: &str) -> String {
    let raw = raw.trim();
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.format("%Y-%m-%d").to_string(),
        Err(_) => truncate_chars(raw, 10).to_string(),
    }
}

/// Paper-index retrieval tool
#[derive(Debug)]
pub struct ArxivRetriever {
    client: Client,
    config: ArxivConfig,
}

impl ArxivRetriever {
    /// Create a new arXiv retriever
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: ArxivConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(Source::Arxiv)?,
            config,
        })
    }

    /// Render a raw Atom feed into the snippet handed to the model
    fn render_feed(&self, xml: &str) -> Result<String> {
        let feed: Feed = quick_xml::de::from_str(xml).map_err(|e| {
            tracing::error!("Failed to parse arXiv feed: {}", e);
            SearchAgentError::retrieval(Source::Arxiv.label(), format!("Malformed feed: {}", e))
        })?;

        if feed.entries.is_empty() {
            return Ok(NO_RESULT.to_string());
        }

        let joined = feed
            .entries
            .iter()
            .take(self.config.top_k_results)
            .map(Entry::render)
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(truncate_chars(&joined, self.config.doc_content_chars_max).to_string())
    }
}

#[async_trait]
impl Retriever for ArxivRetriever {
    fn source(&self) -> Source {
        Source::Arxiv
    }

    async fn fetch(&self, question: &str) -> Result<String> {
        let query = truncate_chars(question, self.config.max_query_length);
        tracing::debug!("Querying arXiv: {:?}", query);

        let search = format!("all:{}", query);
        let max_results = self.config.top_k_results.to_string();
        let request = self.client.get(&self.config.api_base).query(&[
            ("search_query", search.as_str()),
            ("start", "0"),
            ("max_results", max_results.as_str()),
        ]);

        let body = fetch_body(Source::Arxiv, request).await?;
        self.render_feed(&body)
    }
}
