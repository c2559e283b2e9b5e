//! Pipeline-wide configuration.

use std::time::Duration;

/// Tunables shared by [`crate::pipeline::IngestionPipeline`] and
/// [`crate::retrieval::RetrievalService`].
///
/// Constructed once and passed by reference; credentials and endpoint
/// handles live on the concrete embedding provider and vector index
/// instead. Batch size and pause exist to stay under upstream rate
/// limits and bound per-call payload size, not for correctness.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Identifier of the embedding model, recorded for diagnostics and
    /// sent verbatim to the provider.
    pub embedding_model: String,
    /// Dimension the index is configured for. The pipeline and retrieval
    /// service reject vectors of any other length before they reach the
    /// index.
    pub embedding_dimensions: usize,
    /// Upper bound on chunk length in characters (oversized single
    /// sentences may exceed it, see [`crate::text::split_chunks`]).
    pub max_chunk_chars: usize,
    /// Number of entries accumulated before an upsert is flushed.
    pub batch_size: usize,
    /// Pause between batch flushes.
    pub batch_pause: Duration,
    /// Top-K used by retrieval when the caller does not override it.
    pub default_top_k: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            embedding_model: "text-embedding-ada-002".to_string(),
            embedding_dimensions: 1536,
            max_chunk_chars: 1000,
            batch_size: 100,
            batch_pause: Duration::from_millis(500),
            default_top_k: 3,
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn with_embedding_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.embedding_model = model.into();
        self.embedding_dimensions = dimensions;
        self
    }

    #[must_use]
    pub fn with_max_chunk_chars(mut self, max_chunk_chars: usize) -> Self {
        self.max_chunk_chars = max_chunk_chars;
        self
    }

    #[must_use]
    pub fn with_batching(mut self, batch_size: usize, batch_pause: Duration) -> Self {
        self.batch_size = batch_size.max(1);
        self.batch_pause = batch_pause;
        self
    }

    #[must_use]
    pub fn with_default_top_k(mut self, top_k: usize) -> Self {
        self.default_top_k = top_k;
        self
    }
}
