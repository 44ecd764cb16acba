//! Groq chat-completion provider
//!
//! Talks to Groq's OpenAI-compatible `/chat/completions` endpoint with
//! `stream: true` and turns the server-sent event body into a
//! [`CompletionStream`] of [`ChatChunk`]s.

use crate::config::GroqConfig;
use crate::credentials::ApiKey;
use crate::error::{Result, SearchAgentError};
use crate::providers::sse::SseDecoder;
use crate::providers::{ChatChunk, CompletionStream, Message, Provider};

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Terminal payload of an OpenAI-style event stream
const DONE_MARKER: &str = "[DONE]";

/// Groq provider
///
/// Holds the HTTP client, the model settings and the session's API key.
/// One request is issued per answer; nothing is retried.
pub struct GroqProvider {
    client: Client,
    config: GroqConfig,
    api_key: ApiKey,
}

impl std::fmt::Debug for GroqProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroqProvider")
            .field("api_base", &self.config.api_base)
            .field("model", &self.config.model)
            .field("api_key", &self.api_key)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: Delta,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// What one decoded event means for the stream
#[derive(Debug, PartialEq)]
enum StreamEvent {
    Chunk(ChatChunk),
    Done,
}

impl GroqProvider {
    /// Create a new Groq provider
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint and model settings
    /// * `api_key` - Key that passed the credential gate
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: GroqConfig, api_key: ApiKey) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            "search-agent/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| SearchAgentError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Groq provider: model={}, api_base={}",
            config.model,
            config.api_base
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Provider for GroqProvider {
    async fn stream_completion(&self, messages: &[Message]) -> Result<CompletionStream> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            stream: true,
        };

        tracing::debug!(
            "Sending Groq completion request: model={}, messages={}",
            self.config.model,
            messages.len()
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.api_key.expose())
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Groq request failed: {}", e);
                SearchAgentError::Provider(format!("Groq request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Groq returned error {}: {}", status, error_text);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    SearchAgentError::Authentication(format!(
                        "Groq rejected the API key ({})",
                        status
                    ))
                }
                _ => SearchAgentError::Provider(format!(
                    "Groq returned error {}: {}",
                    status, error_text
                )),
            }
            .into());
        }

        Ok(Box::pin(decode_chunks(response.bytes_stream())))
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }
}

/// Turn a raw SSE byte stream into completion chunks
///
/// The stream ends cleanly at `[DONE]`. A body that stops before the model
/// finished, an unparseable event, or an in-band `error` object all end
/// the stream with a single `Stream` error.
fn decode_chunks<S>(byte_stream: S) -> impl Stream<Item = Result<ChatChunk>> + Send + 'static
where
    S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
{
    async_stream::stream! {
        let mut byte_stream = Box::pin(byte_stream);
        let mut decoder = SseDecoder::new();
        let mut finished = false;

        'body: while let Some(item) = byte_stream.next().await {
            let bytes = match item {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!("Groq stream interrupted: {}", e);
                    let error = SearchAgentError::Stream(format!("Connection interrupted: {}", e));
                    yield Err(anyhow::Error::from(error));
                    return;
                }
            };

            for payload in decoder.push(&bytes) {
                match parse_event(&payload) {
                    Ok(StreamEvent::Done) => {
                        finished = true;
                        break 'body;
                    }
                    Ok(StreamEvent::Chunk(chunk)) => {
                        if chunk.finish_reason.is_some() {
                            finished = true;
                        }
                        yield Ok(chunk);
                    }
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        }

        if !finished {
            if let Some(payload) = decoder.finish() {
                match parse_event(&payload) {
                    Ok(StreamEvent::Done) => finished = true,
                    Ok(StreamEvent::Chunk(chunk)) => {
                        finished = chunk.finish_reason.is_some();
                        yield Ok(chunk);
                    }
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        }

        if !finished {
            tracing::error!("Groq stream ended before the model finished");
            let error = SearchAgentError::Stream("Response ended before the model finished".to_string());
            yield Err(anyhow::Error::from(error));
        }
    }
}

fn parse_event(payload: &str) -> Result<StreamEvent> {
    let payload = payload.trim();
    if payload == DONE_MARKER {
        return Ok(StreamEvent::Done);
    }

    let chunk: ChatCompletionChunk = serde_json::from_str(payload).map_err(|e| {
        tracing::error!("Failed to parse Groq stream event: {}", e);
        SearchAgentError::Stream(format!("Malformed stream event: {}", e))
    })?;

    if let Some(error) = chunk.error {
        tracing::error!("Groq reported an error mid-stream: {}", error.message);
        return Err(SearchAgentError::Stream(error.message).into());
    }

    let chunk = match chunk.choices.into_iter().next() {
        Some(choice) => ChatChunk {
            content: choice.delta.content,
            finish_reason: choice.finish_reason,
        },
        None => ChatChunk::default(),
    };
    Ok(StreamEvent::Chunk(chunk))
}
