//! Scoped similarity retrieval over an ingested document.

use std::sync::Arc;

use tracing::debug;

use crate::config::PipelineConfig;
use crate::embeddings::EmbeddingProvider;
use crate::stores::{QueryMatch, VectorIndex};
use crate::types::{EmbeddingError, RetrievalError};

/// Embeds a question and runs a scoped top-K similarity query.
pub struct RetrievalService {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    config: PipelineConfig,
}

impl RetrievalService {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            embedder,
            index,
            config,
        }
    }

    /// Returns up to `top_k` matches for `query` within `scope`, best first.
    ///
    /// Pass `None` for `top_k` to use the configured default. Whether an
    /// entry upserted a moment ago is already visible depends on the
    /// backend's consistency model.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: Option<usize>,
        scope: &str,
    ) -> Result<Vec<QueryMatch>, RetrievalError> {
        let top_k = top_k.unwrap_or(self.config.default_top_k);
        let vector = self.embedder.embed(query).await?;
        if vector.len() != self.config.embedding_dimensions {
            return Err(RetrievalError::Embedding(EmbeddingError::DimensionMismatch {
                expected: self.config.embedding_dimensions,
                actual: vector.len(),
            }));
        }
        let matches = self.index.query(scope, &vector, top_k).await?;
        debug!(scope, top_k, matches = matches.len(), "retrieval complete");
        Ok(matches)
    }
}

/// Joins match texts with newlines into grounding context for a generator.
///
/// This is the canonical post-processing step for feeding a downstream
/// model; it is deliberately outside the [`RetrievalService`] contract.
pub fn context_text(matches: &[QueryMatch]) -> String {
    matches
        .iter()
        .map(|m| m.metadata.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
