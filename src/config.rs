//! Configuration management for the search agent
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, SearchAgentError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
///
/// Holds the hosted model settings, the three retrieval services,
/// and the interactive chat defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Hosted chat-completion model configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Retrieval service configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Interactive chat settings
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Groq (OpenAI-compatible) configuration
    #[serde(default)]
    pub groq: GroqConfig,
}

/// Groq chat-completion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqConfig {
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`)
    #[serde(default = "default_groq_api_base")]
    pub api_base: String,

    /// Model to use
    #[serde(default = "default_groq_model")]
    pub model: String,

    /// Sampling temperature; 0 keeps answers deterministic
    #[serde(default)]
    pub temperature: f32,

    /// Optional request timeout in seconds. Unset means no timeout.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_groq_api_base() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_groq_model() -> String {
    "llama-3.1-8b-instant".to_string()
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_base: default_groq_api_base(),
            model: default_groq_model(),
            temperature: 0.0,
            timeout_seconds: None,
        }
    }
}

/// Retrieval services configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// arXiv paper index
    #[serde(default)]
    pub arxiv: ArxivConfig,
    /// Wikipedia encyclopedia index
    #[serde(default)]
    pub wikipedia: WikipediaConfig,
    /// DuckDuckGo web search
    #[serde(default)]
    pub duckduckgo: DuckDuckGoConfig,
}

/// arXiv retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArxivConfig {
    /// Atom query endpoint
    #[serde(default = "default_arxiv_api_base")]
    pub api_base: String,

    /// Number of papers to fetch
    #[serde(default = "default_top_k_results")]
    pub top_k_results: usize,

    /// Character budget for the returned snippet
    #[serde(default = "default_doc_content_chars_max")]
    pub doc_content_chars_max: usize,

    /// Questions longer than this are cut before querying
    #[serde(default = "default_arxiv_max_query_length")]
    pub max_query_length: usize,
}

fn default_arxiv_api_base() -> String {
    "https://export.arxiv.org/api/query".to_string()
}

fn default_top_k_results() -> usize {
    1
}

fn default_doc_content_chars_max() -> usize {
    300
}

fn default_arxiv_max_query_length() -> usize {
    300
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            api_base: default_arxiv_api_base(),
            top_k_results: default_top_k_results(),
            doc_content_chars_max: default_doc_content_chars_max(),
            max_query_length: default_arxiv_max_query_length(),
        }
    }
}

/// Wikipedia retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikipediaConfig {
    /// MediaWiki action API endpoint
    #[serde(default = "default_wikipedia_api_base")]
    pub api_base: String,

    /// Number of pages to summarise
    #[serde(default = "default_top_k_results")]
    pub top_k_results: usize,

    /// Character budget for the returned snippet
    #[serde(default = "default_doc_content_chars_max")]
    pub doc_content_chars_max: usize,

    /// Longest search string sent; MediaWiki rejects longer ones
    #[serde(default = "default_wikipedia_max_query_length")]
    pub max_query_length: usize,
}

fn default_wikipedia_api_base() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_wikipedia_max_query_length() -> usize {
    300
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            api_base: default_wikipedia_api_base(),
            top_k_results: default_top_k_results(),
            doc_content_chars_max: default_doc_content_chars_max(),
            max_query_length: default_wikipedia_max_query_length(),
        }
    }
}

/// DuckDuckGo retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuckDuckGoConfig {
    /// HTML search endpoint
    #[serde(default = "default_duckduckgo_api_base")]
    pub api_base: String,

    /// Number of result snippets to join
    #[serde(default = "default_duckduckgo_max_results")]
    pub max_results: usize,

    /// Optional character budget. Unset leaves web results untruncated.
    #[serde(default)]
    pub doc_content_chars_max: Option<usize>,
}

fn default_duckduckgo_api_base() -> String {
    "https://html.duckduckgo.com/html/".to_string()
}

fn default_duckduckgo_max_results() -> usize {
    5
}

impl Default for DuckDuckGoConfig {
    fn default() -> Self {
        Self {
            api_base: default_duckduckgo_api_base(),
            max_results: default_duckduckgo_max_results(),
            doc_content_chars_max: None,
        }
    }
}

/// Chat mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Assistant message that seeds every new session
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// System turn of the answer prompt
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_greeting() -> String {
    "Hi! I can search the web, Wikipedia, and arXiv. Ask me anything.".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful AI assistant.\n\
     Use the provided context to answer accurately.\n\
     If context is insufficient, say so clearly.\n\
     Keep answers concise."
        .to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::info!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SearchAgentError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| SearchAgentError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_base) = std::env::var("SEARCH_AGENT_GROQ_API_BASE") {
            self.provider.groq.api_base = api_base;
        }

        if let Ok(model) = std::env::var("SEARCH_AGENT_MODEL") {
            self.provider.groq.model = model;
        }

        if let Ok(temperature) = std::env::var("SEARCH_AGENT_TEMPERATURE") {
            if let Ok(value) = temperature.parse() {
                self.provider.groq.temperature = value;
            } else {
                tracing::warn!("Invalid SEARCH_AGENT_TEMPERATURE: {}", temperature);
            }
        }

        if let Ok(chars) = std::env::var("SEARCH_AGENT_SNIPPET_CHARS") {
            if let Ok(value) = chars.parse() {
                self.retrieval.arxiv.doc_content_chars_max = value;
                self.retrieval.wikipedia.doc_content_chars_max = value;
            } else {
                tracing::warn!("Invalid SEARCH_AGENT_SNIPPET_CHARS: {}", chars);
            }
        }

        if let Ok(results) = std::env::var("SEARCH_AGENT_WEB_RESULTS") {
            if let Ok(value) = results.parse() {
                self.retrieval.duckduckgo.max_results = value;
            } else {
                tracing::warn!("Invalid SEARCH_AGENT_WEB_RESULTS: {}", results);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        if let Some(model) = cli.command.model_override() {
            tracing::debug!("Using model override: {}", model);
            self.provider.groq.model = model.to_string();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let groq = &self.provider.groq;
        if groq.model.trim().is_empty() {
            return Err(
                SearchAgentError::Config("provider.groq.model cannot be empty".to_string()).into(),
            );
        }

        if !(0.0..=2.0).contains(&groq.temperature) {
            return Err(SearchAgentError::Config(
                "provider.groq.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if groq.timeout_seconds == Some(0) {
            return Err(SearchAgentError::Config(
                "provider.groq.timeout_seconds must be greater than 0 when set".to_string(),
            )
            .into());
        }

        let arxiv = &self.retrieval.arxiv;
        let wikipedia = &self.retrieval.wikipedia;
        let duckduckgo = &self.retrieval.duckduckgo;

        for (name, value) in [
            ("provider.groq.api_base", groq.api_base.as_str()),
            ("retrieval.arxiv.api_base", arxiv.api_base.as_str()),
            ("retrieval.wikipedia.api_base", wikipedia.api_base.as_str()),
            ("retrieval.duckduckgo.api_base", duckduckgo.api_base.as_str()),
        ] {
            url::Url::parse(value).map_err(|e| {
                SearchAgentError::Config(format!("{} is not a valid URL ({}): {}", name, value, e))
            })?;
        }

        if arxiv.top_k_results == 0 || wikipedia.top_k_results == 0 {
            return Err(SearchAgentError::Config(
                "top_k_results must be greater than 0".to_string(),
            )
            .into());
        }

        if arxiv.doc_content_chars_max == 0
            || wikipedia.doc_content_chars_max == 0
            || duckduckgo.doc_content_chars_max == Some(0)
        {
            return Err(SearchAgentError::Config(
                "doc_content_chars_max must be greater than 0".to_string(),
            )
            .into());
        }

        if arxiv.max_query_length == 0 {
            return Err(SearchAgentError::Config(
                "retrieval.arxiv.max_query_length must be greater than 0".to_string(),
            )
            .into());
        }

        if wikipedia.max_query_length == 0 {
            return Err(SearchAgentError::Config(
                "retrieval.wikipedia.max_query_length must be greater than 0".to_string(),
            )
            .into());
        }

        if duckduckgo.max_results == 0 {
            return Err(SearchAgentError::Config(
                "retrieval.duckduckgo.max_results must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
