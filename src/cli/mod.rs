pub mod commands;
pub mod utils;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::database::DatabaseManager;
use crate::store::{AdvisorStore, PgStore};

#[derive(Parser)]
#[command(name = "feedbackctl")]
#[command(about = "Operator CLI for the QR Feedback API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create and list advisors")]
    Advisor {
        #[command(subcommand)]
        cmd: commands::advisor::AdvisorCommands,
    },

    #[command(about = "Issue bearer tokens")]
    Token {
        #[command(subcommand)]
        cmd: commands::token::TokenCommands,
    },

    #[command(about = "Maintain advisor QR references")]
    Qr {
        #[command(subcommand)]
        cmd: commands::qr::QrCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// The CLI only talks to Postgres; an in-memory store would vanish on exit
pub async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn AdvisorStore>> {
    if config.database.url.is_none() {
        anyhow::bail!("DATABASE_URL is not set; feedbackctl needs a database");
    }
    let pool = DatabaseManager::connect(&config.database).await?;
    Ok(Arc::new(PgStore::new(pool)))
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = crate::config::config();
    let store = open_store(config).await?;

    match cli.command {
        Commands::Advisor { cmd } => commands::advisor::handle(cmd, store, config, &output_format).await,
        Commands::Token { cmd } => commands::token::handle(cmd, store, config, &output_format).await,
        Commands::Qr { cmd } => commands::qr::handle(cmd, store, config, &output_format).await,
    }
}
