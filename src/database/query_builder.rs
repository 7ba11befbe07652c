use sqlx::{Postgres, QueryBuilder};

use crate::database::store::PathFilter;

pub const TRAINING_PATH_COLUMNS: &str =
    "id, topic, name, description, enabled, katas, created_at, updated_at";
pub const KATA_COLUMNS: &str =
    "id, name, description, difficulty, rawkata, created_at, updated_at";
pub const KATA_SUMMARY_COLUMNS: &str =
    "id, name, description, difficulty, created_at, updated_at";

/// SELECT over `training_paths` with the filter's fields as bound WHERE terms
pub fn select_training_paths(filter: &PathFilter, limit: Option<i64>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM training_paths", TRAINING_PATH_COLUMNS));
    push_where(&mut builder, filter);
    // Insertion order, as the memory store returns it
    builder.push(" ORDER BY created_at, id");
    if let Some(limit) = limit {
        builder.push(" LIMIT ").push_bind(limit);
    }
    builder
}

fn push_where(builder: &mut QueryBuilder<'static, Postgres>, filter: &PathFilter) {
    let mut keyword = " WHERE ";

    if let Some(id) = filter.id {
        builder.push(keyword).push("id = ").push_bind(id);
        keyword = " AND ";
    }
    if let Some(topic) = &filter.topic {
        builder.push(keyword).push("topic = ").push_bind(topic.clone());
        keyword = " AND ";
    }
    if let Some(enabled) = filter.enabled {
        builder.push(keyword).push("enabled = ").push_bind(enabled);
    }
}
