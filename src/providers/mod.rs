//! Provider module for the search agent
//!
//! This module contains the chat-completion provider abstraction and the
//! Groq implementation used to generate answers.

pub mod base;
pub mod groq;
pub mod sse;

pub use base::{ChatChunk, CompletionStream, Message, Provider};
pub use groq::GroqProvider;

use crate::config::ProviderConfig;
use crate::credentials::ApiKey;
use crate::error::Result;

/// Create the provider instance for this session
///
/// # Arguments
///
/// * `config` - Provider configuration
/// * `api_key` - Key that passed the credential gate
///
/// # Returns
///
/// Returns a boxed provider instance
///
/// # Errors
///
/// Returns error if provider initialization fails
pub fn create_provider(config: &ProviderConfig, api_key: ApiKey) -> Result<Box<dyn Provider>> {
    Ok(Box::new(GroqProvider::new(config.groq.clone(), api_key)?))
}
