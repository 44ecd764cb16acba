//! Error types for the search agent
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for search agent operations
///
/// Covers configuration loading, the credential gate, retrieval calls,
/// and the streamed model response. Every variant is fatal to the turn
/// that raised it; nothing here is retried.
#[derive(Error, Debug)]
pub enum SearchAgentError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// No usable API key was supplied to the credential gate
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// Authentication errors (e.g., 401 Unauthorized)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Provider-related errors (API calls, unexpected status codes)
    #[error("Provider error: {0}")]
    Provider(String),

    /// A retrieval service call failed
    #[error("Retrieval error ({service}): {message}")]
    Retrieval {
        /// Label of the service that failed (arXiv, Wikipedia, DuckDuckGo)
        service: String,
        /// What went wrong
        message: String,
    },

    /// The model stream broke off or reported an error mid-answer
    #[error("Stream error: {0}")]
    Stream(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Atom feed parsing errors
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SearchAgentError {
    /// Build a retrieval error for the named service
    pub fn retrieval(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Retrieval {
            service: service.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for search agent operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
