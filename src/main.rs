//! Search agent - streaming answers grounded in arXiv, Wikipedia, or the web
//!
#![doc = "Main entry point for the search agent application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use search_agent::cli::{Cli, Commands};
use search_agent::commands;
use search_agent::config::Config;
use search_agent::telemetry::init_metrics_exporter;

#[tokio::main]
async fn main() -> Result<()> {
    // Seed optional defaults (GROQ_API_KEY, SEARCH_AGENT_*) before clap reads the environment
    let dotenv_path = dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    init_tracing(cli.verbose);
    init_metrics_exporter();

    if let Some(path) = &dotenv_path {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    // Routing preview needs neither configuration nor credentials
    if let Commands::Route { question, json } = &cli.command {
        return commands::route::run_route(question, *json);
    }

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Chat { api_key, model } => {
            if let Some(m) = &model {
                tracing::debug!("Using model override: {}", m);
            }
            commands::chat::run_chat(config, api_key).await?;
            Ok(())
        }
        Commands::Ask {
            question,
            api_key,
            model,
        } => {
            if let Some(m) = &model {
                tracing::debug!("Using model override: {}", m);
            }
            commands::ask::run_ask(config, question, api_key).await?;
            Ok(())
        }
        Commands::Route { .. } => Ok(()),
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with a streamed answer.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "search_agent=debug"
    } else {
        "search_agent=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
