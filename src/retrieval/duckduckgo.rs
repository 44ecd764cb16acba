//! DuckDuckGo web-search retrieval tool
//!
//! Scrapes the result snippets from the HTML search endpoint. Web results
//! are not truncated unless a budget is configured.

use super::{build_client, fetch_body, normalize_whitespace, truncate_chars, Retriever, Source};
use crate::config::DuckDuckGoConfig;
use crate::error::{Result, SearchAgentError};

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};

/// Returned when the page carries no result snippets
pub const NO_RESULT: &str = "No good DuckDuckGo Search Result was found";

const SNIPPET_SELECTOR: &str = ".result__snippet";

/// General web-search retrieval tool
#[derive(Debug)]
pub struct DuckDuckGoRetriever {
    client: Client,
    config: DuckDuckGoConfig,
}

impl DuckDuckGoRetriever {
    /// Create a new DuckDuckGo retriever
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: DuckDuckGoConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(Source::DuckDuckGo)?,
            config,
        })
    }

    /// Extract and join result snippets from a results page
    fn render_page(&self, html: &str) -> Result<String> {
        let document = Html::parse_document(html);
        let selector = Selector::parse(SNIPPET_SELECTOR).map_err(|e| {
            SearchAgentError::retrieval(
                Source::DuckDuckGo.label(),
                format!("Invalid selector: {}", e),
            )
        })?;

        let snippets: Vec<String> = document
            .select(&selector)
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .filter(|s| !s.is_empty())
            .take(self.config.max_results)
            .collect();

        if snippets.is_empty() {
            return Ok(NO_RESULT.to_string());
        }

        let joined = snippets.join(" ");
        Ok(match self.config.doc_content_chars_max {
            Some(max) => truncate_chars(&joined, max).to_string(),
            None => joined,
        })
    }
}

#[async_trait]
impl Retriever for DuckDuckGoRetriever {
    fn source(&self) -> Source {
        Source::DuckDuckGo
    }

    async fn fetch(&self, question: &str) -> Result<String> {
        tracing::debug!("Querying DuckDuckGo: {:?}", question);

        let request = self
            .client
            .get(&self.config.api_base)
            .query(&[("q", question)]);

        let body = fetch_body(Source::DuckDuckGo, request).await?;
        self.render_page(&body)
    }
}
