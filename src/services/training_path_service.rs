use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::database::models::{
    NewTrainingPath, TrainingPath, TrainingPathGridRow, TrainingPathKatas, TrainingPathMetadata,
    TrainingPathSummary, TrainingPathWithKatas,
};
use crate::database::populate::{distinct_references, populate};
use crate::database::store::{DocumentStore, PathFilter};

use super::{store_call, StoreCallError};

#[derive(Debug, Error)]
pub enum TrainingPathError {
    #[error("Training path not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreCallError),
}

/// Reads training paths and their katas; only enabled paths reach public callers.
///
/// Population is two round-trips (the path, then its katas in one batch).
/// The second read is not consistent with the first.
#[derive(Clone)]
pub struct TrainingPathService {
    store: Arc<dyn DocumentStore>,
    query_timeout: Duration,
}

impl TrainingPathService {
    pub fn new(store: Arc<dyn DocumentStore>, query_timeout: Duration) -> Self {
        Self { store, query_timeout }
    }

    /// New paths start disabled with no katas.
    pub async fn create_new_training_path(
        &self,
        topic: &str,
        name: &str,
        description: &str,
    ) -> Result<TrainingPath, TrainingPathError> {
        let path = store_call(
            "create_new_training_path",
            self.query_timeout,
            self.store
                .insert_training_path(NewTrainingPath::new(topic, name, description)),
        )
        .await?;

        info!("Created training path '{}' ({})", path.topic, path.id);
        Ok(path)
    }

    /// GET /api/training-paths
    pub async fn get_training_paths_without_katas(&self) -> Result<Vec<TrainingPathSummary>, TrainingPathError> {
        let paths = store_call(
            "get_training_paths_without_katas",
            self.query_timeout,
            self.store.find_training_paths(&PathFilter::enabled()),
        )
        .await?;

        Ok(paths.into_iter().map(TrainingPathSummary::from).collect())
    }

    /// GET /api/training-paths/grid - every path, disabled ones included
    pub async fn get_training_paths_for_grid(&self) -> Result<Vec<TrainingPathGridRow>, TrainingPathError> {
        let paths = store_call(
            "get_training_paths_for_grid",
            self.query_timeout,
            self.store.find_training_paths(&PathFilter::all()),
        )
        .await?;

        Ok(paths.into_iter().map(TrainingPathGridRow::from).collect())
    }

    /// GET /api/training-paths/topic/:topic
    pub async fn get_training_path_by_topic(
        &self,
        topic: &str,
    ) -> Result<Option<TrainingPathMetadata>, TrainingPathError> {
        let path = store_call(
            "get_training_path_by_topic",
            self.query_timeout,
            self.store.find_one_training_path(&PathFilter::enabled().topic(topic)),
        )
        .await?;

        Ok(path.map(TrainingPathMetadata::from))
    }

    /// GET /api/training-paths/:topic/katas
    ///
    /// A missing topic is `NotFound`; population is not attempted.
    pub async fn get_katas_of_training_path_by_topic(
        &self,
        topic: &str,
    ) -> Result<TrainingPathWithKatas, TrainingPathError> {
        let path = store_call(
            "get_katas_of_training_path_by_topic",
            self.query_timeout,
            self.store.find_one_training_path(&PathFilter::enabled().topic(topic)),
        )
        .await?
        .ok_or_else(|| TrainingPathError::NotFound(topic.to_string()))?;

        let fetched = store_call(
            "get_katas_of_training_path_by_topic.populate",
            self.query_timeout,
            self.store.find_kata_summaries(&distinct_references(&path.katas)),
        )
        .await?;

        let katas = populate(&path.katas, fetched);
        Ok(TrainingPathWithKatas::from_parts(path, katas))
    }

    /// Lookup by id. Yields at most one entry; unknown or disabled ids yield none.
    pub async fn get_katas_by_training_path_id(
        &self,
        path_id: Uuid,
    ) -> Result<Vec<TrainingPathKatas>, TrainingPathError> {
        let Some(path) = store_call(
            "get_katas_by_training_path_id",
            self.query_timeout,
            self.store.find_one_training_path(&PathFilter::enabled().id(path_id)),
        )
        .await?
        else {
            return Ok(vec![]);
        };

        let fetched = store_call(
            "get_katas_by_training_path_id.populate",
            self.query_timeout,
            self.store.find_katas(&distinct_references(&path.katas)),
        )
        .await?;

        Ok(vec![TrainingPathKatas {
            id: path.id,
            katas: populate(&path.katas, fetched),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::models::NewKata;
    use crate::database::store::AdminStore;
    use crate::database::DatabaseError;
    use async_trait::async_trait;

    fn service(store: &MemoryStore) -> TrainingPathService {
        TrainingPathService::new(Arc::new(store.clone()), Duration::from_secs(5))
    }

    async fn kata(store: &MemoryStore, name: &str) -> Uuid {
        store
            .insert_kata(NewKata {
                name: name.into(),
                description: format!("{} description", name),
                difficulty: "easy".into(),
                rawkata: format!("// {} body", name),
            })
            .await
            .unwrap()
            .id
    }

    /// arrays (enabled, 2 katas), graphs (disabled, 1 kata)
    async fn seeded() -> (MemoryStore, TrainingPathService) {
        let store = MemoryStore::new();
        let svc = service(&store);

        let arrays = svc.create_new_training_path("arrays", "Arrays", "intro").await.unwrap();
        let graphs = svc.create_new_training_path("graphs", "Graphs", "bfs and friends").await.unwrap();

        let (two_sum, rotate, bfs) = (
            kata(&store, "two-sum").await,
            kata(&store, "rotate").await,
            kata(&store, "bfs").await,
        );
        store.attach_katas(arrays.id, &[rotate, two_sum]).await.unwrap();
        store.attach_katas(graphs.id, &[bfs]).await.unwrap();
        store.set_training_path_enabled(arrays.id, true).await.unwrap();

        (store, svc)
    }

    #[tokio::test]
    async fn test_created_path_is_hidden_until_enabled() {
        let store = MemoryStore::new();
        let svc = service(&store);

        let created = svc.create_new_training_path("arrays", "Arrays", "intro").await.unwrap();
        assert!(!created.enabled);
        assert!(created.katas.is_empty());
        assert!(svc.get_training_paths_without_katas().await.unwrap().is_empty());
        assert!(svc.get_training_path_by_topic("arrays").await.unwrap().is_none());

        store.set_training_path_enabled(created.id, true).await.unwrap();

        let metadata = svc.get_training_path_by_topic("arrays").await.unwrap().unwrap();
        assert_eq!(metadata.topic, "arrays");
        assert_eq!(metadata.name, "Arrays");
        assert_eq!(metadata.description, "intro");
        assert!(metadata.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_public_list_only_shows_enabled_paths() {
        let (_store, svc) = seeded().await;

        let paths = svc.get_training_paths_without_katas().await.unwrap();
        assert_eq!(
            paths,
            vec![TrainingPathSummary {
                topic: "arrays".into(),
                name: "Arrays".into(),
                description: "intro".into(),
            }]
        );
        assert!(svc.get_training_path_by_topic("graphs").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_grid_counts_katas_for_every_path() {
        let (_store, svc) = seeded().await;

        let grid = svc.get_training_paths_for_grid().await.unwrap();
        let counts: Vec<(&str, bool, usize)> = grid
            .iter()
            .map(|row| (row.topic.as_str(), row.enabled, row.katas))
            .collect();
        assert_eq!(counts, vec![("arrays", true, 2), ("graphs", false, 1)]);
    }

    #[tokio::test]
    async fn test_katas_by_topic_are_populated_in_order_without_raw_payload() {
        let (_store, svc) = seeded().await;

        let path = svc.get_katas_of_training_path_by_topic("arrays").await.unwrap();
        let names: Vec<&str> = path.katas.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["rotate", "two-sum"]);

        let value = serde_json::to_value(&path).unwrap();
        for kata in value["katas"].as_array().unwrap() {
            assert!(kata.get("rawkata").is_none());
        }
    }

    #[tokio::test]
    async fn test_katas_by_missing_or_disabled_topic_is_not_found() {
        let (_store, svc) = seeded().await;

        let err = svc.get_katas_of_training_path_by_topic("graphs").await.unwrap_err();
        assert!(matches!(err, TrainingPathError::NotFound(ref t) if t == "graphs"));
        assert!(matches!(
            svc.get_katas_of_training_path_by_topic("nope").await,
            Err(TrainingPathError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_katas_by_id_resolve_in_full() {
        let (store, svc) = seeded().await;
        let arrays = store
            .find_one_training_path(&PathFilter::all().topic("arrays"))
            .await
            .unwrap()
            .unwrap();

        let result = svc.get_katas_by_training_path_id(arrays.id).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, arrays.id);
        assert_eq!(result[0].katas[0].rawkata, "// rotate body");
    }

    #[tokio::test]
    async fn test_katas_by_id_for_disabled_or_unknown_path_is_empty() {
        let (store, svc) = seeded().await;
        let graphs = store
            .find_one_training_path(&PathFilter::all().topic("graphs"))
            .await
            .unwrap()
            .unwrap();

        assert!(svc.get_katas_by_training_path_id(graphs.id).await.unwrap().is_empty());
        assert!(svc.get_katas_by_training_path_id(Uuid::new_v4()).await.unwrap().is_empty());
    }

    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn insert_training_path(&self, _: NewTrainingPath) -> Result<TrainingPath, DatabaseError> {
            Err(DatabaseError::Conflict("write refused".into()))
        }
        async fn find_training_paths(&self, _: &PathFilter) -> Result<Vec<TrainingPath>, DatabaseError> {
            std::future::pending().await
        }
        async fn find_one_training_path(&self, _: &PathFilter) -> Result<Option<TrainingPath>, DatabaseError> {
            Err(DatabaseError::NotFound("backend gone".into()))
        }
        async fn find_katas(&self, _: &[Uuid]) -> Result<Vec<crate::database::models::Kata>, DatabaseError> {
            Ok(vec![])
        }
        async fn find_kata_summaries(
            &self,
            _: &[Uuid],
        ) -> Result<Vec<crate::database::models::KataSummary>, DatabaseError> {
            Ok(vec![])
        }
        async fn find_user_by_username(
            &self,
            _: &str,
        ) -> Result<Option<crate::database::models::User>, DatabaseError> {
            Ok(None)
        }
        async fn ping(&self) -> Result<(), DatabaseError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_store_failures_propagate() {
        let svc = TrainingPathService::new(Arc::new(FailingStore), Duration::from_millis(50));

        assert!(matches!(
            svc.create_new_training_path("a", "b", "c").await,
            Err(TrainingPathError::Store(StoreCallError::Database(DatabaseError::Conflict(_))))
        ));
        assert!(matches!(
            svc.get_training_path_by_topic("a").await,
            Err(TrainingPathError::Store(StoreCallError::Database(_)))
        ));
        assert!(matches!(
            svc.get_training_paths_for_grid().await,
            Err(TrainingPathError::Store(StoreCallError::Timeout { .. }))
        ));
    }
}
