use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Kata {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub difficulty: String,
    pub rawkata: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Kata without the `rawkata` payload, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct KataSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub difficulty: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Kata> for KataSummary {
    fn from(kata: Kata) -> Self {
        Self {
            id: kata.id,
            name: kata.name,
            description: kata.description,
            difficulty: kata.difficulty,
            created_at: kata.created_at,
            updated_at: kata.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewKata {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub rawkata: String,
}
