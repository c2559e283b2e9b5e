//! In-process vector index for tests and demos.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{IndexEntry, QueryMatch, VectorIndex};
use crate::types::IndexError;

/// Cosine-similarity index partitioned by scope.
///
/// Scopes are hard partitions, so the isolation invariant holds
/// structurally. Strongly consistent: an entry is visible to queries as soon
/// as `upsert` returns, which is what the integration tests rely on. Ties
/// are broken by id ascending so results are deterministic.
#[derive(Default)]
pub struct MemoryVectorIndex {
    partitions: RwLock<HashMap<String, HashMap<String, IndexEntry>>>,
}

impl MemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries stored under `scope`.
    pub fn len(&self, scope: &str) -> usize {
        self.partitions
            .read()
            .get(scope)
            .map_or(0, HashMap::len)
    }

    pub fn is_empty(&self, scope: &str) -> bool {
        self.len(scope) == 0
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for MemoryVectorIndex {
    async fn upsert(&self, scope: &str, entries: Vec<IndexEntry>) -> Result<(), IndexError> {
        let mut partitions = self.partitions.write();
        let partition = partitions.entry(scope.to_string()).or_default();
        for entry in entries {
            partition.insert(entry.id.clone(), entry);
        }
        Ok(())
    }

    async fn query(
        &self,
        scope: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<QueryMatch>, IndexError> {
        let partitions = self.partitions.read();
        let Some(partition) = partitions.get(scope) else {
            return Ok(Vec::new());
        };

        let mut matches: Vec<QueryMatch> = partition
            .values()
            .map(|entry| QueryMatch {
                id: entry.id.clone(),
                score: cosine_similarity(&entry.values, vector),
                metadata: entry.metadata.clone(),
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        matches.truncate(top_k);
        Ok(matches)
    }
}
