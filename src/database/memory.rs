use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Kata, KataSummary, NewKata, NewTrainingPath, NewUser, TrainingPath, User};
use crate::database::store::{AdminStore, DocumentStore, PathFilter};

#[derive(Debug, Default)]
struct Collections {
    training_paths: Vec<TrainingPath>,
    katas: Vec<Kata>,
    users: Vec<User>,
}

/// Process-local store. Collections keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_training_path(&self, new_path: NewTrainingPath) -> Result<TrainingPath, DatabaseError> {
        let now = Utc::now();
        let path = TrainingPath {
            id: Uuid::new_v4(),
            topic: new_path.topic,
            name: new_path.name,
            description: new_path.description,
            enabled: false,
            katas: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.inner.write().await.training_paths.push(path.clone());
        Ok(path)
    }

    async fn find_training_paths(&self, filter: &PathFilter) -> Result<Vec<TrainingPath>, DatabaseError> {
        let collections = self.inner.read().await;
        Ok(collections
            .training_paths
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn find_one_training_path(&self, filter: &PathFilter) -> Result<Option<TrainingPath>, DatabaseError> {
        let collections = self.inner.read().await;
        Ok(collections.training_paths.iter().find(|p| filter.matches(p)).cloned())
    }

    async fn find_katas(&self, ids: &[Uuid]) -> Result<Vec<Kata>, DatabaseError> {
        let collections = self.inner.read().await;
        Ok(collections
            .katas
            .iter()
            .filter(|k| ids.contains(&k.id))
            .cloned()
            .collect())
    }

    async fn find_kata_summaries(&self, ids: &[Uuid]) -> Result<Vec<KataSummary>, DatabaseError> {
        Ok(self
            .find_katas(ids)
            .await?
            .into_iter()
            .map(KataSummary::from)
            .collect())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let collections = self.inner.read().await;
        Ok(collections.users.iter().find(|u| u.username == username).cloned())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[async_trait]
impl AdminStore for MemoryStore {
    async fn insert_kata(&self, new_kata: NewKata) -> Result<Kata, DatabaseError> {
        let now = Utc::now();
        let kata = Kata {
            id: Uuid::new_v4(),
            name: new_kata.name,
            description: new_kata.description,
            difficulty: new_kata.difficulty,
            rawkata: new_kata.rawkata,
            created_at: now,
            updated_at: now,
        };

        self.inner.write().await.katas.push(kata.clone());
        Ok(kata)
    }

    async fn attach_katas(&self, path_id: Uuid, kata_ids: &[Uuid]) -> Result<TrainingPath, DatabaseError> {
        let mut collections = self.inner.write().await;

        if let Some(missing) = kata_ids.iter().find(|id| !collections.katas.iter().any(|k| k.id == **id)) {
            return Err(DatabaseError::NotFound(format!("kata {}", missing)));
        }

        let target = collections
            .training_paths
            .iter()
            .position(|p| p.id == path_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("training path {}", path_id)))?;

        let claimed = collections.training_paths.iter().enumerate().any(|(idx, p)| {
            idx != target && p.katas.iter().any(|id| kata_ids.contains(id))
        });
        if claimed {
            return Err(DatabaseError::Conflict(format!(
                "kata already belongs to a training path other than {}",
                path_id
            )));
        }

        let path = &mut collections.training_paths[target];
        path.katas.extend_from_slice(kata_ids);
        path.updated_at = Utc::now();
        Ok(path.clone())
    }

    async fn set_training_path_enabled(&self, path_id: Uuid, enabled: bool) -> Result<TrainingPath, DatabaseError> {
        let mut collections = self.inner.write().await;

        let target = collections
            .training_paths
            .iter()
            .position(|p| p.id == path_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("training path {}", path_id)))?;

        if enabled {
            let topic = &collections.training_paths[target].topic;
            let clash = collections
                .training_paths
                .iter()
                .enumerate()
                .any(|(idx, p)| idx != target && p.enabled && &p.topic == topic);
            if clash {
                return Err(DatabaseError::Conflict(format!(
                    "an enabled training path with topic '{}' already exists",
                    topic
                )));
            }
        }

        let path = &mut collections.training_paths[target];
        path.enabled = enabled;
        path.updated_at = Utc::now();
        Ok(path.clone())
    }

    async fn insert_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let mut collections = self.inner.write().await;
        if collections.users.iter().any(|u| u.username == new_user.username) {
            return Err(DatabaseError::Conflict(format!("user '{}'", new_user.username)));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            salt: new_user.salt,
            created_at: now,
            updated_at: now,
        };
        collections.users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kata(name: &str) -> NewKata {
        NewKata {
            name: name.into(),
            description: format!("{} kata", name),
            difficulty: "easy".into(),
            rawkata: "fn main() {}".into(),
        }
    }

    #[tokio::test]
    async fn test_new_paths_start_disabled_and_empty() {
        let store = MemoryStore::new();
        let path = store
            .insert_training_path(NewTrainingPath::new("arrays", "Arrays", "intro"))
            .await
            .unwrap();

        assert!(!path.enabled);
        assert!(path.katas.is_empty());
        assert_eq!(store.find_training_paths(&PathFilter::enabled()).await.unwrap().len(), 0);
        assert_eq!(store.find_training_paths(&PathFilter::all()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_enable_rejects_second_enabled_topic() {
        let store = MemoryStore::new();
        let a = store.insert_training_path(NewTrainingPath::new("arrays", "A", "")).await.unwrap();
        let b = store.insert_training_path(NewTrainingPath::new("arrays", "B", "")).await.unwrap();

        let first = store.set_training_path_enabled(a.id, true).await.unwrap();
        assert_eq!(first.name, "A");

        let err = store.set_training_path_enabled(b.id, true).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));

        // Re-enabling the enabled path is not a clash with itself
        assert!(store.set_training_path_enabled(a.id, true).await.unwrap().enabled);
        store.set_training_path_enabled(a.id, false).await.unwrap();
        assert!(store.set_training_path_enabled(b.id, true).await.unwrap().enabled);
    }

    #[tokio::test]
    async fn test_kata_belongs_to_one_path() {
        let store = MemoryStore::new();
        let arrays = store.insert_training_path(NewTrainingPath::new("arrays", "Arrays", "")).await.unwrap();
        let graphs = store.insert_training_path(NewTrainingPath::new("graphs", "Graphs", "")).await.unwrap();
        let k = store.insert_kata(kata("two-sum")).await.unwrap();

        store.attach_katas(arrays.id, &[k.id]).await.unwrap();
        let err = store.attach_katas(graphs.id, &[k.id]).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_kata_ownership_holds_between_paths_sharing_a_topic() {
        let store = MemoryStore::new();
        let old = store.insert_training_path(NewTrainingPath::new("arrays", "Old", "")).await.unwrap();
        let new = store.insert_training_path(NewTrainingPath::new("arrays", "New", "")).await.unwrap();
        let k = store.insert_kata(kata("two-sum")).await.unwrap();

        store.attach_katas(old.id, &[k.id]).await.unwrap();
        let err = store.attach_katas(new.id, &[k.id]).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));

        let paths = store.find_training_paths(&PathFilter::all().topic("arrays")).await.unwrap();
        let owners = paths.iter().filter(|p| p.katas.contains(&k.id)).count();
        assert_eq!(owners, 1);
    }

    #[tokio::test]
    async fn test_attach_unknown_kata_or_path_is_not_found() {
        let store = MemoryStore::new();
        let arrays = store.insert_training_path(NewTrainingPath::new("arrays", "Arrays", "")).await.unwrap();
        let err = store.attach_katas(arrays.id, &[Uuid::new_v4()]).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));

        let k = store.insert_kata(kata("two-sum")).await.unwrap();
        let err = store.attach_katas(Uuid::new_v4(), &[k.id]).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_kata_summaries_drop_raw_payload() {
        let store = MemoryStore::new();
        let k = store.insert_kata(kata("two-sum")).await.unwrap();

        let summaries = store.find_kata_summaries(&[k.id]).await.unwrap();
        assert_eq!(summaries.len(), 1);
        let value = serde_json::to_value(&summaries[0]).unwrap();
        assert!(value.get("rawkata").is_none());
    }
}
