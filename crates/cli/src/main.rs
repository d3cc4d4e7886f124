//! kbscope CLI — the main entry point.
//!
//! Commands:
//! - `onboard` — Write the default config
//! - `scope`   — Run the scoping pipeline for a query and print the context
//! - `import`  — Load a JSONL/JSON file of rows into the SQLite source
//! - `config`  — Validate or print the effective configuration
//! - `doctor`  — Diagnose configuration and knowledge source health

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "kbscope",
    about = "kbscope — knowledge scoping for grounded chat",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Onboard,

    /// Scope the knowledge base for a query and print the rendered context
    Scope {
        /// The user query
        #[arg(short, long)]
        query: String,

        /// JSON file holding the conversation history array
        #[arg(long)]
        history: Option<PathBuf>,

        /// Instructions to place ahead of the context (prints the full prompt)
        #[arg(long)]
        instructions: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Import knowledge rows (JSONL or JSON array) into the SQLite source
    Import {
        /// File to import
        file: PathBuf,

        /// Database path (defaults to the configured SQLite path)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Diagnose system health
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate the configuration file and environment overrides
    Validate,
    /// Print the effective configuration as TOML
    Show,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Scope {
            query,
            history,
            instructions,
            json,
        } => commands::scope::run(query, history, instructions, json).await?,
        Commands::Import { file, db } => commands::import::run(file, db).await?,
        Commands::Config { action } => match action {
            ConfigAction::Validate => commands::config_cmd::validate().await?,
            ConfigAction::Show => commands::config_cmd::show().await?,
        },
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
