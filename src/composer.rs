//! Answer composer
//!
//! Fills the fixed two-turn prompt with the retrieved context and the
//! user's question, then exposes the model's reply as a stream of plain
//! text fragments.

use crate::error::Result;
use crate::providers::{CompletionStream, Message, Provider};
use futures::{Stream, StreamExt};
use std::pin::Pin;

/// Lazy sequence of answer fragments
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Render the human turn of the prompt
///
/// Both fields are embedded verbatim.
///
/// # Examples
///
/// ```
/// use search_agent::composer::human_turn;
///
/// assert_eq!(
///     human_turn("Paris is the capital.", "Capital of France?"),
///     "Context:\nParis is the capital.\n\nQuestion:\nCapital of France?"
/// );
/// ```
pub fn human_turn(context: &str, question: &str) -> String {
    format!("Context:\n{}\n\nQuestion:\n{}", context, question)
}

/// Builds answer prompts and streams the model's reply
pub struct AnswerComposer {
    provider: Box<dyn Provider>,
    system_prompt: String,
}

impl AnswerComposer {
    /// Create a composer around a provider and the system instruction
    pub fn new(provider: Box<dyn Provider>, system_prompt: impl Into<String>) -> Self {
        Self {
            provider,
            system_prompt: system_prompt.into(),
        }
    }

    /// The messages sent to the model for one answer
    pub fn prompt(&self, context: &str, question: &str) -> Vec<Message> {
        vec![
            Message::system(self.system_prompt.clone()),
            Message::user(human_turn(context, question)),
        ]
    }

    /// Issue one completion request and stream its text
    ///
    /// # Errors
    ///
    /// Returns error if the request is rejected before streaming starts.
    /// Later failures arrive as `Err` items and end the stream.
    pub async fn compose(&self, context: &str, question: &str) -> Result<FragmentStream> {
        let messages = self.prompt(context, question);
        tracing::debug!(
            "Composing answer with {}: {} context chars",
            self.provider.model(),
            context.chars().count()
        );

        let chunks = self.provider.stream_completion(&messages).await?;
        Ok(text_fragments(chunks))
    }
}

/// Keep the non-empty text of each chunk, unchanged
fn text_fragments(chunks: CompletionStream) -> FragmentStream {
    Box::pin(chunks.filter_map(|chunk| async move {
        match chunk {
            Ok(chunk) => chunk.content.filter(|text| !text.is_empty()).map(Ok),
            Err(e) => Some(Err(e)),
        }
    }))
}
