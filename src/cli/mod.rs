pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgStore};

#[derive(Parser)]
#[command(name = "trainer")]
#[command(about = "Trainer CLI - administer training paths, katas and users")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create, enable, disable and list training paths")]
    Path {
        #[command(subcommand)]
        cmd: commands::path::PathCommands,
    },

    #[command(about = "Load katas, paths and users from a YAML fixture")]
    Fixture {
        #[command(subcommand)]
        cmd: commands::fixture::FixtureCommands,
    },

    #[command(about = "User account management")]
    User {
        #[command(subcommand)]
        cmd: commands::user::UserCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
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

/// CLI commands always talk to PostgreSQL; the memory backend has nothing to administer.
pub async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<PgStore>> {
    let pool = DatabaseManager::connect(&config.database).await?;
    let store = PgStore::new(pool);
    store.ensure_schema().await?;
    Ok(Arc::new(store))
}

pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Path { cmd } => commands::path::handle(cmd, config, output_format).await,
        Commands::Fixture { cmd } => commands::fixture::handle(cmd, config, output_format).await,
        Commands::User { cmd } => commands::user::handle(cmd, config, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_create() {
        let cli = Cli::try_parse_from(["trainer", "--json", "path", "create", "arrays", "Arrays", "intro"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        match cli.command {
            Commands::Path {
                cmd: commands::path::PathCommands::Create { topic, name, description },
            } => {
                assert_eq!((topic.as_str(), name.as_str(), description.as_str()), ("arrays", "Arrays", "intro"));
            }
            _ => panic!("expected path create"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["trainer", "course", "list"]).is_err());
    }
}
