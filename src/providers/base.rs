//! Base provider trait and common types
//!
//! This module defines the Provider trait that the hosted chat-completion
//! model implements, along with the wire-neutral message type and the
//! streamed chunk type the answer composer consumes.

use crate::error::Result;
use async_trait::async_trait;
use futures::Stream;
use serde::Serialize;
use std::pin::Pin;

/// Message structure for a chat-completion request
///
/// Represents one turn of the prompt sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use search_agent::providers::Message;
    ///
    /// let msg = Message::user("Hello, assistant!");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new system message
    ///
    /// # Examples
    ///
    /// ```
    /// use search_agent::providers::Message;
    ///
    /// let msg = Message::system("You are a helpful assistant");
    /// assert_eq!(msg.role, "system");
    /// ```
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// One increment of a streamed completion
///
/// `content` is the delta text (possibly absent on role-only or final
/// chunks); `finish_reason` is set on the chunk that ends the choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatChunk {
    /// Delta text carried by this chunk
    pub content: Option<String>,
    /// Why the model stopped, on the last chunk
    pub finish_reason: Option<String>,
}

impl ChatChunk {
    /// Chunk carrying only text
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            finish_reason: None,
        }
    }
}

/// Lazy sequence of completion chunks for one request
///
/// Ends when the model signals completion. It cannot be cancelled or
/// resumed; a new answer needs a new request.
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<ChatChunk>> + Send>>;

/// Provider trait for hosted chat-completion models
///
/// # Examples
///
/// ```no_run
/// use search_agent::providers::{ChatChunk, CompletionStream, Message, Provider};
/// use search_agent::error::Result;
/// use async_trait::async_trait;
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     async fn stream_completion(&self, messages: &[Message]) -> Result<CompletionStream> {
///         let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
///         let chunks: Vec<Result<ChatChunk>> = vec![Ok(ChatChunk::text(last))];
///         Ok(Box::pin(futures::stream::iter(chunks)))
///     }
///
///     fn model(&self) -> String {
///         "echo".to_string()
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Start a streamed completion for the given prompt
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be sent or the provider rejects
    /// it before streaming starts. Failures after that surface as `Err`
    /// items inside the stream.
    async fn stream_completion(&self, messages: &[Message]) -> Result<CompletionStream>;

    /// Name of the model this provider talks to
    fn model(&self) -> String;
}
