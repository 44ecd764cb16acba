//! Wikipedia retrieval tool
//!
//! Uses the MediaWiki action API: a full-text search as generator with the
//! plain-text intro extract of each hit.

use super::{build_client, fetch_body, truncate_chars, Retriever, Source};
use crate::config::WikipediaConfig;
use crate::error::{Result, SearchAgentError};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Returned when the search finds no pages
pub const NO_RESULT: &str = "No good Wikipedia Search Result was found";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryPages>,
    /// Request-level failure, reported with HTTP 200
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    /// Search rank, starting at 1
    #[serde(default)]
    index: u32,
    #[serde(default)]
    extract: Option<String>,
}

/// Encyclopedia retrieval tool
#[derive(Debug)]
pub struct WikipediaRetriever {
    client: Client,
    config: WikipediaConfig,
}

impl WikipediaRetriever {
    /// Create a new Wikipedia retriever
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: WikipediaConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(Source::Wikipedia)?,
            config,
        })
    }

    fn render_response(&self, body: &str) -> Result<String> {
        let response: QueryResponse = serde_json::from_str(body).map_err(|e| {
            tracing::error!("Failed to parse Wikipedia response: {}", e);
            SearchAgentError::retrieval(
                Source::Wikipedia.label(),
                format!("Malformed response: {}", e),
            )
        })?;

        if let Some(error) = response.error {
            tracing::error!("Wikipedia API error {}: {}", error.code, error.info);
            return Err(SearchAgentError::retrieval(
                Source::Wikipedia.label(),
                format!("{} ({})", error.info, error.code),
            )
            .into());
        }

        let mut pages: Vec<Page> = response.query.map(|q| q.pages).unwrap_or_default();
        if pages.is_empty() {
            return Ok(NO_RESULT.to_string());
        }
        pages.sort_by_key(|p| p.index);

        let joined = pages
            .iter()
            .take(self.config.top_k_results)
            .map(|p| {
                format!(
                    "Page: {}\nSummary: {}",
                    p.title,
                    p.extract.as_deref().unwrap_or_default().trim()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(truncate_chars(&joined, self.config.doc_content_chars_max).to_string())
    }
}

#[async_trait]
impl Retriever for WikipediaRetriever {
    fn source(&self) -> Source {
        Source::Wikipedia
    }

    async fn fetch(&self, question: &str) -> Result<String> {
        let query = truncate_chars(question, self.config.max_query_length);
        tracing::debug!("Querying Wikipedia: {:?}", query);

        let limit = self.config.top_k_results.to_string();
        let request = self.client.get(&self.config.api_base).query(&[
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("generator", "search"),
            ("gsrsearch", query),
            ("gsrlimit", limit.as_str()),
            ("prop", "extracts"),
            ("exintro", "1"),
            ("explaintext", "1"),
            ("exlimit", limit.as_str()),
            ("redirects", "1"),
        ]);

        let body = fetch_body(Source::Wikipedia, request).await?;
        self.render_response(&body)
    }
}
