use clap::Subcommand;
use std::path::PathBuf;

use crate::cli::utils::output_success;
use crate::cli::{open_store, OutputFormat};
use crate::config::AppConfig;
use crate::database::fixture::Fixture;

#[derive(Subcommand)]
pub enum FixtureCommands {
    #[command(about = "Insert katas, paths and users from a YAML file")]
    Load {
        #[arg(help = "Fixture file path")]
        file: PathBuf,
    },

    #[command(about = "Parse a fixture file without touching the database")]
    Check {
        #[arg(help = "Fixture file path")]
        file: PathBuf,
    },
}

pub async fn handle(cmd: FixtureCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        FixtureCommands::Load { file } => {
            let fixture = Fixture::load(&file).await?;
            let store = open_store(config).await?;
            let report = fixture.apply(&*store).await?;
            output_success(
                output_format,
                &format!(
                    "Loaded {}: {} katas, {} paths, {} users",
                    file.display(),
                    report.katas,
                    report.paths,
                    report.users
                ),
                Some(serde_json::to_value(&report)?),
            )
        }
        FixtureCommands::Check { file } => {
            let fixture = Fixture::load(&file).await?;
            output_success(
                output_format,
                &format!(
                    "{} is valid: {} katas, {} paths, {} users",
                    file.display(),
                    fixture.katas.len(),
                    fixture.paths.len(),
                    fixture.users.len()
                ),
                None,
            )
        }
    }
}
