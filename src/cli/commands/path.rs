use clap::Subcommand;
use std::sync::Arc;

use crate::cli::utils::{output_success, output_table};
use crate::cli::{open_store, OutputFormat};
use crate::config::AppConfig;
use crate::database::models::TrainingPath;
use crate::database::{AdminStore, PathFilter};
use crate::services::TrainingPathService;

#[derive(Subcommand)]
pub enum PathCommands {
    #[command(about = "Create a training path (starts disabled)")]
    Create {
        #[arg(help = "Unique topic, used in URLs")]
        topic: String,
        #[arg(help = "Display name")]
        name: String,
        #[arg(help = "Short description", default_value = "")]
        description: String,
    },

    #[command(about = "Make a training path visible to public reads")]
    Enable {
        #[arg(help = "Topic of the path")]
        topic: String,
    },

    #[command(about = "Hide a training path from public reads")]
    Disable {
        #[arg(help = "Topic of the path")]
        topic: String,
    },

    #[command(about = "List all training paths with kata counts")]
    List,
}

pub async fn handle(cmd: PathCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let service = TrainingPathService::new(store.clone(), config.database.query_timeout());

    match cmd {
        PathCommands::Create { topic, name, description } => {
            let path = service.create_new_training_path(&topic, &name, &description).await?;
            output_success(
                output_format,
                &format!("Created training path '{}' (disabled)", path.topic),
                Some(serde_json::to_value(&path)?),
            )
        }
        PathCommands::Enable { topic } => toggle(&store, &topic, true, output_format).await,
        PathCommands::Disable { topic } => toggle(&store, &topic, false, output_format).await,
        PathCommands::List => {
            let grid = service.get_training_paths_for_grid().await?;
            let rows = grid
                .iter()
                .map(|row| {
                    vec![
                        row.topic.clone(),
                        row.name.clone(),
                        (if row.enabled { "yes" } else { "no" }).to_string(),
                        row.katas.to_string(),
                        row.updated_at.format("%Y-%m-%d %H:%M").to_string(),
                    ]
                })
                .collect();
            output_table(
                output_format,
                &["TOPIC", "NAME", "ENABLED", "KATAS", "UPDATED"],
                rows,
                serde_json::to_value(&grid)?,
            )
        }
    }
}

async fn toggle<S: AdminStore + ?Sized>(
    store: &Arc<S>,
    topic: &str,
    enabled: bool,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let path = resolve(store.as_ref(), topic, enabled).await?;
    let path = store.set_training_path_enabled(path.id, enabled).await?;
    let state = if path.enabled { "enabled" } else { "disabled" };
    output_success(
        output_format,
        &format!("Training path '{}' {}", path.topic, state),
        Some(serde_json::to_value(&path)?),
    )
}

/// Picks the path a topic names. Disabled duplicates may share a topic, so
/// the one already in the requested state wins, then the oldest.
async fn resolve<S: AdminStore + ?Sized>(store: &S, topic: &str, enabled: bool) -> anyhow::Result<TrainingPath> {
    let mut paths = store.find_training_paths(&PathFilter::all().topic(topic)).await?;
    match paths.iter().position(|p| p.enabled == enabled) {
        Some(idx) => Ok(paths.swap_remove(idx)),
        None if !paths.is_empty() => Ok(paths.swap_remove(0)),
        None => anyhow::bail!("Training path '{}' not found", topic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::NewTrainingPath;
    use crate::database::{DocumentStore, MemoryStore};

    #[tokio::test]
    async fn test_resolve_prefers_path_already_in_requested_state() {
        let store = MemoryStore::new();
        let old = store.insert_training_path(NewTrainingPath::new("arrays", "Old", "")).await.unwrap();
        let live = store.insert_training_path(NewTrainingPath::new("arrays", "Live", "")).await.unwrap();
        store.set_training_path_enabled(live.id, true).await.unwrap();

        assert_eq!(resolve(&store, "arrays", true).await.unwrap().id, live.id);
        assert_eq!(resolve(&store, "arrays", false).await.unwrap().id, old.id);
        assert!(resolve(&store, "graphs", true).await.is_err());
    }
}
