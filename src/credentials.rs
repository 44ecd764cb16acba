//! Credential gate for the hosted model
//!
//! Nothing downstream (retrieval, generation) may run without a present,
//! non-empty API key. The gate accepts a key supplied on the command line
//! or environment, otherwise asks the operator once. There is no retry: an
//! absent or empty key ends the session with a warning.

use crate::error::{Result, SearchAgentError};

/// Warning shown to the operator when no key was supplied
pub const MISSING_KEY_WARNING: &str = "Please enter your Groq API key";

/// Label used when prompting for the key
pub const KEY_PROMPT: &str = "Enter your GROQ API Key: ";

/// A non-empty API key
///
/// The key never appears in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key, rejecting blank input
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` if the key is empty or whitespace
    ///
    /// # Examples
    ///
    /// ```
    /// use search_agent::credentials::ApiKey;
    ///
    /// assert!(ApiKey::new("gsk_abc").is_ok());
    /// assert!(ApiKey::new("   ").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SearchAgentError::MissingCredentials("groq".to_string()).into());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The raw key, for building the Authorization header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// Source of an interactively entered secret
pub trait SecretPrompt {
    /// Ask the operator for a secret. `Ok(None)` means the operator gave up
    /// (EOF or interrupt).
    fn prompt_secret(&mut self, label: &str) -> Result<Option<String>>;
}

/// Reads the key from the terminal without echoing it
///
/// When stdin is not a terminal the key is read as one plain line instead.
pub struct TerminalPrompt;

impl SecretPrompt for TerminalPrompt {
    fn prompt_secret(&mut self, label: &str) -> Result<Option<String>> {
        use std::io::{BufRead, IsTerminal};

        if !std::io::stdin().is_terminal() {
            let mut line = String::new();
            let read = std::io::stdin().lock().read_line(&mut line)?;
            return Ok((read > 0).then_some(line));
        }

        let result = dialoguer::Password::new()
            .with_prompt(label.trim_end_matches(|c: char| c == ':' || c == ' '))
            .allow_empty_password(true)
            .interact();

        match result {
            Ok(key) => Ok(Some(key)),
            Err(dialoguer::Error::IO(e)) if gave_up(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// EOF or Ctrl-C while the operator was typing
fn gave_up(error: &std::io::Error) -> bool {
    matches!(
        error.kind(),
        std::io::ErrorKind::UnexpectedEof | std::io::ErrorKind::Interrupted
    )
}

/// Resolve the API key for this session
///
/// A supplied key (flag or `GROQ_API_KEY`) is used as-is, blank included;
/// the prompt is only consulted when nothing was supplied.
///
/// # Errors
///
/// Returns `MissingCredentials` when the key is absent or empty
pub fn resolve_api_key(supplied: Option<String>, prompt: &mut dyn SecretPrompt) -> Result<ApiKey> {
    let raw = match supplied {
        Some(key) => key,
        None => prompt.prompt_secret(KEY_PROMPT)?.unwrap_or_default(),
    };

    ApiKey::new(raw).map_err(|e| {
        tracing::warn!("No API key supplied; halting session");
        e
    })
}
