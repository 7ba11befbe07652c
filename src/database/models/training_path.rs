use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kata::{Kata, KataSummary};

/// Stored training path. `katas` holds references, resolved through population.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPath {
    pub id: Uuid,
    pub topic: String,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub katas: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrainingPath {
    pub topic: String,
    pub name: String,
    pub description: String,
}

impl NewTrainingPath {
    pub fn new(topic: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Public listing: `topic name description`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingPathSummary {
    pub topic: String,
    pub name: String,
    pub description: String,
}

impl From<TrainingPath> for TrainingPathSummary {
    fn from(path: TrainingPath) -> Self {
        Self {
            topic: path.topic,
            name: path.name,
            description: path.description,
        }
    }
}

/// Settings grid row. `katas` is the number of referenced katas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPathGridRow {
    pub topic: String,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub katas: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TrainingPath> for TrainingPathGridRow {
    fn from(path: TrainingPath) -> Self {
        Self {
            katas: path.katas.len(),
            topic: path.topic,
            name: path.name,
            description: path.description,
            enabled: path.enabled,
            created_at: path.created_at,
            updated_at: path.updated_at,
        }
    }
}

/// Lookup by topic: `topic name description updatedAt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPathMetadata {
    pub topic: String,
    pub name: String,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}

impl From<TrainingPath> for TrainingPathMetadata {
    fn from(path: TrainingPath) -> Self {
        Self {
            topic: path.topic,
            name: path.name,
            description: path.description,
            updated_at: path.updated_at,
        }
    }
}

/// Full path with its katas resolved, minus the raw kata payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPathWithKatas {
    pub id: Uuid,
    pub topic: String,
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub katas: Vec<KataSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TrainingPathWithKatas {
    pub fn from_parts(path: TrainingPath, katas: Vec<KataSummary>) -> Self {
        Self {
            id: path.id,
            topic: path.topic,
            name: path.name,
            description: path.description,
            enabled: path.enabled,
            katas,
            created_at: path.created_at,
            updated_at: path.updated_at,
        }
    }
}

/// Lookup by id: only `katas`, resolved in full. The id always travels along.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingPathKatas {
    pub id: Uuid,
    pub katas: Vec<Kata>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> TrainingPath {
        let now = Utc::now();
        TrainingPath {
            id: Uuid::new_v4(),
            topic: "arrays".into(),
            name: "Arrays".into(),
            description: "intro".into(),
            enabled: true,
            katas: vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn summary_serializes_only_public_fields() {
        let value = serde_json::to_value(TrainingPathSummary::from(sample())).unwrap();
        assert_eq!(value, json!({ "topic": "arrays", "name": "Arrays", "description": "intro" }));
    }

    #[test]
    fn grid_row_counts_kata_references() {
        let row = TrainingPathGridRow::from(sample());
        assert_eq!(row.katas, 3);

        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["katas"], json!(3));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("id").is_none());
    }

    #[test]
    fn metadata_has_no_id_or_katas() {
        let value = serde_json::to_value(TrainingPathMetadata::from(sample())).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["description", "name", "topic", "updatedAt"]);
    }
}
