//! Command-line interface definition for the search agent
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot questions, and
//! offline routing checks.

use clap::{Parser, Subcommand};

/// Search agent - streaming answers grounded in arXiv, Wikipedia, or the web
///
/// Each question is routed by keyword to one lookup service; the retrieved
/// snippet is handed to a hosted model which streams a concise answer.
#[derive(Parser, Debug, Clone)]
#[command(name = "search-agent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Groq API key; prompted for interactively when omitted
        #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Answer a single question and exit
    Ask {
        /// The question to answer
        question: String,

        /// Groq API key; prompted for interactively when omitted
        #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Show which retrieval source a question would be routed to
    Route {
        /// The question to classify
        question: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Model override carried by the command, if any
    pub fn model_override(&self) -> Option<&str> {
        match self {
            Commands::Chat { model, .. } | Commands::Ask { model, .. } => model.as_deref(),
            Commands::Route { .. } => None,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Chat {
                api_key: None,
                model: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Chat { .. }));
    }

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["search-agent", "chat", "--api-key", "gsk_test"]).unwrap();
        if let Commands::Chat { api_key, model } = cli.command {
            assert_eq!(api_key, Some("gsk_test".to_string()));
            assert!(model.is_none());
        } else {
            panic!("Expected Chat command");
        }
    }

    #[test]
    fn test_cli_parse_ask_with_model() {
        let cli = Cli::try_parse_from([
            "search-agent",
            "ask",
            "--model",
            "llama-3.3-70b-versatile",
            "Who is Alan Turing?",
        ])
        .unwrap();
        if let Commands::Ask {
            question, model, ..
        } = &cli.command
        {
            assert_eq!(question, "Who is Alan Turing?");
            assert_eq!(model.as_deref(), Some("llama-3.3-70b-versatile"));
        } else {
            panic!("Expected Ask command");
        }
        assert_eq!(cli.command.model_override(), Some("llama-3.3-70b-versatile"));
    }

    #[test]
    fn test_cli_parse_route_json() {
        let cli = Cli::try_parse_from(["search-agent", "route", "--json", "define entropy"]).unwrap();
        if let Commands::Route { question, json } = cli.command {
            assert_eq!(question, "define entropy");
            assert!(json);
        } else {
            panic!("Expected Route command");
        }
    }

    #[test]
    fn test_cli_route_accepts_empty_question() {
        let cli = Cli::try_parse_from(["search-agent", "route", ""]).unwrap();
        assert!(matches!(cli.command, Commands::Route { ref question, .. } if question.is_empty()));
        assert!(cli.command.model_override().is_none());
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["search-agent"]).is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "search-agent",
            "--config",
            "custom.yaml",
            "--verbose",
            "route",
            "paper",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
        assert!(cli.verbose);
    }
}
