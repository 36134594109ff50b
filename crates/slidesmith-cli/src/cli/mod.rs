//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use slidesmith_core::config::Config;

mod commands;

#[derive(Parser)]
#[command(name = "slidesmith")]
#[command(version = "0.1")]
#[command(about = "Streaming slide generation studio")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the generation endpoint from config
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Chat with the generation agent and build a deck
    Chat,

    /// Export a deck JSON file as a presentation document
    Export {
        /// Path to the deck JSON file
        #[arg(value_name = "DECK")]
        deck: PathBuf,

        /// Theme id (corporate, cyber, editorial)
        #[arg(long)]
        theme: Option<String>,

        /// Output directory (default: configured export dir)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = Config::load().context("load config")?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }

    // default to chat mode
    let Some(command) = cli.command else {
        return commands::chat::run(&config).await;
    };

    match command {
        Commands::Chat => commands::chat::run(&config).await,
        Commands::Export { deck, theme, out } => {
            commands::export::run(&deck, theme.as_deref(), out.as_deref(), &config).await
        }
    }
}
