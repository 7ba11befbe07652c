use clap::Subcommand;

use crate::cli::utils::output_success;
use crate::cli::{open_store, OutputFormat};
use crate::config::AppConfig;
use crate::database::AdminStore;
use crate::services::credentials;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Create a user that can log in")]
    Add {
        #[arg(help = "Login name")]
        username: String,
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, env = "TRAINER_PASSWORD", help = "Password (or set TRAINER_PASSWORD)")]
        password: String,
    },
}

pub async fn handle(cmd: UserCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        UserCommands::Add { username, email, password } => {
            let store = open_store(config).await?;
            let user = store
                .insert_user(credentials::new_user(&username, &email, &password))
                .await?;
            output_success(
                output_format,
                &format!("Created user '{}'", user.username),
                Some(serde_json::to_value(&user)?),
            )
        }
    }
}
