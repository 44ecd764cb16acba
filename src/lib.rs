//! Search agent library
//!
//! This library answers questions with a hosted chat model, grounding each
//! answer in a snippet fetched from one of three lookup services chosen by
//! keyword.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `credentials`: Credential gate for the model API key
//! - `router`: Keyword classification and context retrieval
//! - `retrieval`: arXiv, Wikipedia and DuckDuckGo lookup tools
//! - `composer`: Prompt template and answer fragment stream
//! - `providers`: Chat-completion provider abstraction and Groq client
//! - `session`: Append-only conversation transcript
//! - `chat`: Per-turn state machine and terminal rendering
//! - `telemetry`: Turn metrics
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use search_agent::{classify, Config, Source};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     assert_eq!(classify("Who is Alan Turing?"), Source::Wikipedia);
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod commands;
pub mod composer;
pub mod config;
pub mod credentials;
pub mod error;
pub mod providers;
pub mod retrieval;
pub mod router;
pub mod session;
pub mod telemetry;

// Re-export commonly used types
pub use chat::{ChatEngine, Renderer};
pub use config::Config;
pub use error::{Result, SearchAgentError};
pub use retrieval::{Retriever, Source};
pub use router::{classify, RouterResult, SourceRouter};
pub use session::Session;
