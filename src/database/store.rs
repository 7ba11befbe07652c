use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Kata, KataSummary, NewKata, NewTrainingPath, NewUser, TrainingPath, User};

/// Conjunctive filter over training paths. `None` fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathFilter {
    pub id: Option<Uuid>,
    pub topic: Option<String>,
    pub enabled: Option<bool>,
}

impl PathFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn enabled() -> Self {
        Self {
            enabled: Some(true),
            ..Self::default()
        }
    }

    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn matches(&self, path: &TrainingPath) -> bool {
        self.id.map_or(true, |id| path.id == id)
            && self.topic.as_deref().map_or(true, |topic| path.topic == topic)
            && self.enabled.map_or(true, |enabled| path.enabled == enabled)
    }
}

/// Read/insert surface the services are written against.
///
/// Kata lookups take a list of ids and return matches in store order;
/// ordering by reference is the caller's job (see `populate`).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_training_path(&self, new_path: NewTrainingPath) -> Result<TrainingPath, DatabaseError>;

    async fn find_training_paths(&self, filter: &PathFilter) -> Result<Vec<TrainingPath>, DatabaseError>;

    async fn find_one_training_path(&self, filter: &PathFilter) -> Result<Option<TrainingPath>, DatabaseError>;

    async fn find_katas(&self, ids: &[Uuid]) -> Result<Vec<Kata>, DatabaseError>;

    /// Same as `find_katas` without loading `rawkata`
    async fn find_kata_summaries(&self, ids: &[Uuid]) -> Result<Vec<KataSummary>, DatabaseError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// Direct updates made outside the service layer (CLI, fixtures).
#[async_trait]
pub trait AdminStore: DocumentStore {
    async fn insert_kata(&self, new_kata: NewKata) -> Result<Kata, DatabaseError>;

    /// Appends kata references to the path with `path_id`. A kata can belong
    /// to one path only, whatever the topics involved.
    async fn attach_katas(&self, path_id: Uuid, kata_ids: &[Uuid]) -> Result<TrainingPath, DatabaseError>;

    /// At most one enabled path per topic; enabling a second is a `Conflict`.
    async fn set_training_path_enabled(&self, path_id: Uuid, enabled: bool) -> Result<TrainingPath, DatabaseError>;

    async fn insert_user(&self, new_user: NewUser) -> Result<User, DatabaseError>;
}
