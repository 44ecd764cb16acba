/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`: Interactive chat session
- `ask`: Answer a single question and exit
- `route`: Show which source a question would be searched in

The handlers only wire library components together: the credential gate,
the source router, the answer composer and the terminal renderer.
*/

use crate::chat::ChatEngine;
use crate::composer::AnswerComposer;
use crate::config::Config;
use crate::credentials::{resolve_api_key, ApiKey, SecretPrompt, MISSING_KEY_WARNING};
use crate::error::{Result, SearchAgentError};
use crate::providers::create_provider;
use crate::router::SourceRouter;

// Special commands parser for interactive chat
pub mod special_commands;

/// Build the turn engine for a session that passed the credential gate
///
/// # Errors
///
/// Returns error if an HTTP client cannot be created
pub fn build_engine(config: &Config, api_key: ApiKey) -> Result<ChatEngine> {
    let router = SourceRouter::from_config(&config.retrieval)?;
    let provider = create_provider(&config.provider, api_key)?;
    let composer = AnswerComposer::new(provider, config.chat.system_prompt.clone());
    Ok(ChatEngine::new(router, composer))
}

/// Run the credential gate, warning the operator when it halts the session
///
/// # Errors
///
/// Returns `MissingCredentials` when no usable key was supplied
pub fn open_gate(supplied: Option<String>, prompt: &mut dyn SecretPrompt) -> Result<ApiKey> {
    use colored::Colorize;

    resolve_api_key(supplied, prompt).map_err(|e| {
        if matches!(
            e.downcast_ref::<SearchAgentError>(),
            Some(SearchAgentError::MissingCredentials(_))
        ) {
            eprintln!("{}", MISSING_KEY_WARNING.yellow());
        }
        e
    })
}

// Chat command handler
pub mod chat {
    //! Interactive chat handler.
    //!
    //! Opens the credential gate, builds the engine and runs a
    //! readline-based loop that answers one question per turn.

    use super::*;
    use crate::chat::{replay, Renderer, TerminalRenderer};
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::credentials::TerminalPrompt;
    use crate::router::classify;
    use crate::session::Session;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start an interactive chat session
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `api_key` - Key from the command line or environment, if any
    pub async fn run_chat(config: Config, api_key: Option<String>) -> Result<()> {
        use colored::Colorize;

        tracing::info!("Starting interactive chat session");

        let api_key = open_gate(api_key, &mut TerminalPrompt)?;
        let engine = build_engine(&config, api_key)?;

        let mut session = Session::new(config.chat.greeting.clone());
        let mut renderer = TerminalRenderer::new();
        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&config);
        replay(&session, &mut renderer);

        loop {
            match rl.readline("> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::Help) => print_help(),
                        Ok(SpecialCommand::History) => {
                            println!();
                            replay(&session, &mut renderer);
                        }
                        Ok(SpecialCommand::Route(question)) => {
                            println!("{}\n", format!("Would search {}", classify(&question)).cyan());
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {
                            let turn = engine.run_turn(&mut session, &line, &mut renderer);
                            if let Err(e) = turn.await {
                                tracing::warn!("Turn aborted: {}", e);
                                renderer.error(&e);
                            }
                        }
                        Err(e) => {
                            eprintln!("{}\n", e.to_string().red());
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        tracing::debug!(
            "Session {} ended with {} messages",
            session.id(),
            session.len()
        );
        println!("Goodbye!");
        Ok(())
    }

    /// Display welcome banner at the start of an interactive session
    fn print_welcome_banner(config: &Config) {
        use colored::Colorize;

        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║            Search Agent - arXiv · Wikipedia · Web            ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Model:  {}", config.provider.groq.model.cyan());
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }
}

// One-shot question handler
pub mod ask {
    //! Non-interactive single turn.

    use super::*;
    use crate::chat::TerminalRenderer;
    use crate::credentials::TerminalPrompt;
    use crate::session::Session;

    /// Answer one question, streaming it to stdout with its citation
    ///
    /// # Errors
    ///
    /// Returns the gate, retrieval or generation error that stopped the turn
    pub async fn run_ask(config: Config, question: String, api_key: Option<String>) -> Result<()> {
        tracing::info!("Answering a single question");

        let api_key = open_gate(api_key, &mut TerminalPrompt)?;
        let engine = build_engine(&config, api_key)?;

        let mut session = Session::new(config.chat.greeting.clone());
        let mut renderer = TerminalRenderer::new();
        engine.run_turn(&mut session, &question, &mut renderer).await?;
        Ok(())
    }
}

// Offline routing check
pub mod route {
    //! Classification only; no lookup service is contacted.

    use super::*;
    use crate::retrieval::Source;
    use crate::router::classify;
    use serde::Serialize;

    #[derive(Debug, Serialize)]
    struct RouteReport<'a> {
        question: &'a str,
        source: Source,
    }

    /// Render the routing decision as a label or JSON
    ///
    /// # Examples
    ///
    /// ```
    /// use search_agent::commands::route::render_route;
    ///
    /// assert_eq!(render_route("define entropy", false).unwrap(), "Wikipedia");
    /// ```
    pub fn render_route(question: &str, json: bool) -> Result<String> {
        let source = classify(question);
        if json {
            Ok(serde_json::to_string_pretty(&RouteReport { question, source })?)
        } else {
            Ok(source.label().to_string())
        }
    }

    /// Print which source `question` would be searched in
    pub fn run_route(question: &str, json: bool) -> Result<()> {
        println!("{}", render_route(question, json)?);
        Ok(())
    }
}
