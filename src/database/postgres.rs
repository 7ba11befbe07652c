use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Kata, KataSummary, NewKata, NewTrainingPath, NewUser, TrainingPath, User};
use crate::database::query_builder::{
    select_training_paths, KATA_COLUMNS, KATA_SUMMARY_COLUMNS, TRAINING_PATH_COLUMNS,
};
use crate::database::store::{AdminStore, DocumentStore, PathFilter};

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS katas (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        difficulty TEXT NOT NULL DEFAULT '',
        rawkata TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS training_paths (
        id UUID PRIMARY KEY,
        topic TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        enabled BOOLEAN NOT NULL DEFAULT false,
        katas UUID[] NOT NULL DEFAULT '{}',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE UNIQUE INDEX IF NOT EXISTS training_paths_enabled_topic
        ON training_paths (topic) WHERE enabled"#,
    r#"CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL DEFAULT '',
        password_hash TEXT NOT NULL,
        salt TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
];

/// PostgreSQL backend: one table per collection, kata references kept as `UUID[]`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates missing tables and indexes
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema ready");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert_training_path(&self, new_path: NewTrainingPath) -> Result<TrainingPath, DatabaseError> {
        let sql = format!(
            "INSERT INTO training_paths (id, topic, name, description) VALUES ($1, $2, $3, $4) RETURNING {}",
            TRAINING_PATH_COLUMNS
        );
        sqlx::query_as::<_, TrainingPath>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_path.topic)
            .bind(&new_path.name)
            .bind(&new_path.description)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(e, format!("training path '{}'", new_path.topic)))
    }

    async fn find_training_paths(&self, filter: &PathFilter) -> Result<Vec<TrainingPath>, DatabaseError> {
        let mut query = select_training_paths(filter, None);
        debug!("find_training_paths: {}", query.sql());
        Ok(query.build_query_as::<TrainingPath>().fetch_all(&self.pool).await?)
    }

    async fn find_one_training_path(&self, filter: &PathFilter) -> Result<Option<TrainingPath>, DatabaseError> {
        let mut query = select_training_paths(filter, Some(1));
        debug!("find_one_training_path: {}", query.sql());
        Ok(query.build_query_as::<TrainingPath>().fetch_optional(&self.pool).await?)
    }

    async fn find_katas(&self, ids: &[Uuid]) -> Result<Vec<Kata>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!("SELECT {} FROM katas WHERE id = ANY($1)", KATA_COLUMNS);
        Ok(sqlx::query_as::<_, Kata>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_kata_summaries(&self, ids: &[Uuid]) -> Result<Vec<KataSummary>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = format!("SELECT {} FROM katas WHERE id = ANY($1)", KATA_SUMMARY_COLUMNS);
        Ok(sqlx::query_as::<_, KataSummary>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, salt, created_at, updated_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl AdminStore for PgStore {
    async fn insert_kata(&self, new_kata: NewKata) -> Result<Kata, DatabaseError> {
        let sql = format!(
            "INSERT INTO katas (id, name, description, difficulty, rawkata) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            KATA_COLUMNS
        );
        Ok(sqlx::query_as::<_, Kata>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_kata.name)
            .bind(&new_kata.description)
            .bind(&new_kata.difficulty)
            .bind(&new_kata.rawkata)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn attach_katas(&self, path_id: Uuid, kata_ids: &[Uuid]) -> Result<TrainingPath, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Lock the target row so concurrent attaches to it serialize
        let target: Option<Uuid> = sqlx::query_scalar("SELECT id FROM training_paths WHERE id = $1 FOR UPDATE")
            .bind(path_id)
            .fetch_optional(&mut *tx)
            .await?;
        if target.is_none() {
            return Err(DatabaseError::NotFound(format!("training path {}", path_id)));
        }

        let known: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM katas WHERE id = ANY($1)")
            .bind(kata_ids)
            .fetch_one(&mut *tx)
            .await?;
        let distinct = crate::database::populate::distinct_references(kata_ids).len() as i64;
        if known != distinct {
            return Err(DatabaseError::NotFound("one or more katas".to_string()));
        }

        let claimed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM training_paths WHERE id <> $1 AND katas && $2")
            .bind(path_id)
            .bind(kata_ids)
            .fetch_one(&mut *tx)
            .await?;
        if claimed > 0 {
            return Err(DatabaseError::Conflict(format!(
                "kata already belongs to a training path other than {}",
                path_id
            )));
        }

        let sql = format!(
            "UPDATE training_paths SET katas = katas || $2, updated_at = now() WHERE id = $1 RETURNING {}",
            TRAINING_PATH_COLUMNS
        );
        let path = sqlx::query_as::<_, TrainingPath>(&sql)
            .bind(path_id)
            .bind(kata_ids)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(path)
    }

    async fn set_training_path_enabled(&self, path_id: Uuid, enabled: bool) -> Result<TrainingPath, DatabaseError> {
        let sql = format!(
            "UPDATE training_paths SET enabled = $2, updated_at = now() WHERE id = $1 RETURNING {}",
            TRAINING_PATH_COLUMNS
        );
        // The partial unique index on enabled topics reports the clash
        sqlx::query_as::<_, TrainingPath>(&sql)
            .bind(path_id)
            .bind(enabled)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_sqlx(e, "an enabled training path with this topic already exists"))?
            .ok_or_else(|| DatabaseError::NotFound(format!("training path {}", path_id)))
    }

    async fn insert_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email, password_hash, salt) VALUES ($1, $2, $3, $4, $5)
             RETURNING id, username, email, password_hash, salt, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.salt)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_sqlx(e, format!("user '{}'", new_user.username)))
    }
}
