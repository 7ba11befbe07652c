use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewKata, NewTrainingPath};
use crate::database::store::{AdminStore, PathFilter};
use crate::services::credentials;

/// Seed document for katas, training paths and users.
///
/// ```yaml
/// katas:
///   - name: two-sum
///     difficulty: easy
///     rawkata: "..."
/// paths:
///   - topic: arrays
///     name: Arrays
///     description: intro
///     enabled: true
///     katas: [two-sum]
/// users:
///   - username: admin
///     email: admin@example.com
///     password: change-me
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub katas: Vec<NewKata>,
    #[serde(default)]
    pub paths: Vec<FixturePath>,
    #[serde(default)]
    pub users: Vec<FixtureUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturePath {
    pub topic: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enabled: bool,
    /// Kata names, resolved against the fixture's `katas`
    #[serde(default)]
    pub katas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureUser {
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixtureReport {
    pub katas: usize,
    pub paths: usize,
    pub users: usize,
}

impl Fixture {
    pub fn from_yaml(source: &str) -> Result<Self, DatabaseError> {
        serde_yaml::from_str(source).map_err(|e| DatabaseError::Fixture(e.to_string()))
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DatabaseError::Fixture(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&source)
    }

    /// Topics and usernames the store already holds, or that repeat in the
    /// fixture itself. Applying is refused while any exist.
    pub async fn clashes<S: AdminStore + ?Sized>(&self, store: &S) -> Result<Vec<String>, DatabaseError> {
        let mut clashes = Vec::new();
        let mut seen = HashSet::new();

        for path in &self.paths {
            if !seen.insert(path.topic.as_str()) {
                clashes.push(format!("topic '{}' is listed twice", path.topic));
            } else if store
                .find_one_training_path(&PathFilter::all().topic(&path.topic))
                .await?
                .is_some()
            {
                clashes.push(format!("topic '{}' already exists", path.topic));
            }
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            if !seen.insert(user.username.as_str()) {
                clashes.push(format!("user '{}' is listed twice", user.username));
            } else if store.find_user_by_username(&user.username).await?.is_some() {
                clashes.push(format!("user '{}' already exists", user.username));
            }
        }
        Ok(clashes)
    }

    /// Writes the fixture through direct store updates. Nothing is written
    /// when a topic or user is already present.
    pub async fn apply<S: AdminStore + ?Sized>(&self, store: &S) -> Result<FixtureReport, DatabaseError> {
        let clashes = self.clashes(store).await?;
        if !clashes.is_empty() {
            return Err(DatabaseError::Fixture(clashes.join("; ")));
        }

        // Resolve names before the first write
        let known: HashSet<&str> = self.katas.iter().map(|k| k.name.as_str()).collect();
        for path in &self.paths {
            if let Some(name) = path.katas.iter().find(|name| !known.contains(name.as_str())) {
                return Err(DatabaseError::Fixture(format!(
                    "path '{}' references unknown kata '{}'",
                    path.topic, name
                )));
            }
        }

        let mut kata_ids: HashMap<&str, Uuid> = HashMap::new();
        for kata in &self.katas {
            let stored = store.insert_kata(kata.clone()).await?;
            kata_ids.insert(kata.name.as_str(), stored.id);
        }

        for path in &self.paths {
            let stored = store
                .insert_training_path(NewTrainingPath::new(&path.topic, &path.name, &path.description))
                .await?;

            let refs: Vec<Uuid> = path
                .katas
                .iter()
                .filter_map(|name| kata_ids.get(name.as_str()).copied())
                .collect();

            if !refs.is_empty() {
                store.attach_katas(stored.id, &refs).await?;
            }
            if path.enabled {
                store.set_training_path_enabled(stored.id, true).await?;
            }
        }

        for user in &self.users {
            store
                .insert_user(credentials::new_user(&user.username, &user.email, &user.password))
                .await?;
        }

        let report = FixtureReport {
            katas: self.katas.len(),
            paths: self.paths.len(),
            users: self.users.len(),
        };
        info!(
            "Fixture applied: {} katas, {} paths, {} users",
            report.katas, report.paths, report.users
        );
        Ok(report)
    }
}
