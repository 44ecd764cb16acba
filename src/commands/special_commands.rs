//! Special commands parser for interactive chat
//!
//! Commands are prefixed with `/` and are case-insensitive. They act on the
//! session instead of being sent to the router:
//! - Show help
//! - Replay the transcript
//! - Preview where a question would be routed
//! - Exit the session

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Display help information
    Help,

    /// Replay the full transcript, citations included
    History,

    /// Show which source a question would be routed to, without fetching
    Route(String),

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be processed as a regular question.
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is
/// not a valid command, and `CommandError::MissingArgument` for `/route`
/// without a question.
///
/// # Examples
///
/// ```
/// use search_agent::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/HELP"), Ok(SpecialCommand::Help));
/// assert_eq!(parse_special_command("what is rust"), Ok(SpecialCommand::None));
/// assert!(parse_special_command("/bogus").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // Plain text is a question, except the bare exit words
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let command = lower.split_whitespace().next().unwrap_or_default();
    match command {
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/history" => Ok(SpecialCommand::History),
        "/route" => {
            let question = trimmed.get("/route".len()..).unwrap_or_default().trim();
            if question.is_empty() {
                Err(CommandError::MissingArgument {
                    command: "/route".to_string(),
                    usage: "/route <question>".to_string(),
                })
            } else {
                Ok(SpecialCommand::Route(question.to_string()))
            }
        }
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

/// Display help text for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat
=====================================

  /help           - Show this help message
  /?              - Same as /help
  /history        - Replay the conversation so far
  /route <text>   - Show which source a question would be searched in
  /exit           - Exit the session
  exit, quit      - Same as /exit

ROUTING:
  Questions mentioning "arxiv", "paper" or "research" search arXiv.
  Questions mentioning "wikipedia", "who is" or "define" search Wikipedia.
  Everything else is searched on DuckDuckGo.

NOTES:
  - Commands are case-insensitive
  - Regular text (not starting with /) is answered as a question
"#
    );
}
