use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{Kata, KataSummary};

/// Records that can stand in for a stored reference
pub trait Referenced {
    fn reference(&self) -> Uuid;
}

impl Referenced for Kata {
    fn reference(&self) -> Uuid {
        self.id
    }
}

impl Referenced for KataSummary {
    fn reference(&self) -> Uuid {
        self.id
    }
}

/// Lays fetched records out in reference order.
///
/// References with no fetched record are dropped. A reference listed twice
/// yields the record twice.
pub fn populate<T: Referenced + Clone>(references: &[Uuid], fetched: Vec<T>) -> Vec<T> {
    let by_id: HashMap<Uuid, T> = fetched.into_iter().map(|r| (r.reference(), r)).collect();

    references
        .iter()
        .filter_map(|id| by_id.get(id).cloned())
        .collect()
}

/// Distinct ids in first-seen order, for the batch fetch.
pub fn distinct_references(references: &[Uuid]) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::with_capacity(references.len());
    references.iter().copied().filter(|id| seen.insert(*id)).collect()
}
