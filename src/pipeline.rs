//! Ingestion orchestration: extract → normalize → chunk → embed → upsert.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::embeddings::EmbeddingProvider;
use crate::extract::extract_pages;
use crate::stores::{ChunkMetadata, IndexEntry, VectorIndex};
use crate::text::{normalize, split_chunks};
use crate::types::{EmbeddingError, IngestionError};

/// Counters describing a completed ingestion run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Pages that produced at least one chunk.
    pub pages: usize,
    /// Chunks embedded and upserted.
    pub chunks: usize,
    /// Upsert batches flushed.
    pub batches: usize,
}

/// Drives a whole document through the pipeline into the vector index.
///
/// Embedding calls are issued one at a time in page/chunk order; entries
/// accumulate and are flushed to [`VectorIndex::upsert`] whenever the batch
/// reaches `config.batch_size`, with a `config.batch_pause` sleep between
/// flushes to stay under upstream rate limits. Any single failure aborts the
/// run: entry ids are deterministic, so the caller can safely re-invoke
/// `ingest` and overwrite whatever was written before the failure.
pub struct IngestionPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    config: PipelineConfig,
}

impl IngestionPipeline {
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

    /// Ingests a PDF under `document_name`, which doubles as the index scope.
    ///
    /// `extra_metadata` is attached verbatim to every chunk's metadata.
    pub async fn ingest(
        &self,
        document_bytes: &[u8],
        document_name: &str,
        extra_metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Result<IngestReport, IngestionError> {
        let pages = extract_pages(document_bytes).map_err(|source| IngestionError::Extraction {
            document: document_name.to_string(),
            source,
        })?;
        info!(document = document_name, pages = pages.len(), "starting ingestion");
        self.ingest_pages(&pages, document_name, extra_metadata).await
    }

    /// Ingests pre-extracted pages; `ingest` delegates here after extraction.
    ///
    /// Public so callers with their own extraction (and tests) can feed page
    /// text directly.
    pub async fn ingest_pages(
        &self,
        pages: &BTreeMap<u32, String>,
        document_name: &str,
        extra_metadata: serde_json::Map<String, serde_json::Value>,
    ) -> Result<IngestReport, IngestionError> {
        let mut report = IngestReport::default();
        let mut batch: Vec<IndexEntry> = Vec::with_capacity(self.config.batch_size);

        for (&page_number, page_text) in pages {
            let normalized = normalize(page_text);
            let chunks = split_chunks(&normalized, self.config.max_chunk_chars);
            if chunks.is_empty() {
                continue;
            }
            debug!(document = document_name, page = page_number, chunks = chunks.len(), "chunked page");
            report.pages += 1;
            let total_chunks_in_page = chunks.len();

            for (chunk_index, chunk) in chunks.into_iter().enumerate() {
                let values = self
                    .embedder
                    .embed(&chunk)
                    .await
                    .and_then(|values| {
                        if values.len() == self.config.embedding_dimensions {
                            Ok(values)
                        } else {
                            Err(EmbeddingError::DimensionMismatch {
                                expected: self.config.embedding_dimensions,
                                actual: values.len(),
                            })
                        }
                    })
                    .map_err(|source| IngestionError::Embedding {
                        document: document_name.to_string(),
                        page: page_number,
                        chunk: chunk_index,
                        source,
                    })?;

                batch.push(IndexEntry {
                    id: format!("{document_name}_p{page_number}_chunk_{chunk_index}"),
                    values,
                    metadata: ChunkMetadata {
                        text: chunk,
                        pdf_name: document_name.to_string(),
                        page_number,
                        chunk_index,
                        total_chunks_in_page,
                        extra: extra_metadata.clone(),
                    },
                });
                report.chunks += 1;

                if batch.len() >= self.config.batch_size {
                    self.flush(document_name, &mut batch, &mut report).await?;
                    sleep(self.config.batch_pause).await;
                }
            }
        }

        if !batch.is_empty() {
            self.flush(document_name, &mut batch, &mut report).await?;
        }

        info!(
            document = document_name,
            pages = report.pages,
            chunks = report.chunks,
            batches = report.batches,
            "ingestion complete"
        );
        Ok(report)
    }

    async fn flush(
        &self,
        document_name: &str,
        batch: &mut Vec<IndexEntry>,
        report: &mut IngestReport,
    ) -> Result<(), IngestionError> {
        let entries = std::mem::take(batch);
        let batch_len = entries.len();
        self.index
            .upsert(document_name, entries)
            .await
            .map_err(|source| IngestionError::Upsert {
                document: document_name.to_string(),
                batch_len,
                source,
            })?;
        report.batches += 1;
        info!(document = document_name, batch_len, "flushed upsert batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::MockEmbeddingProvider;
    use crate::stores::MemoryVectorIndex;
    use std::time::Duration;

    fn pipeline(index: Arc<MemoryVectorIndex>, config: PipelineConfig) -> IngestionPipeline {
        IngestionPipeline::new(Arc::new(MockEmbeddingProvider::new()), index, config)
    }

    /// Default config with dimensions matching the 64-dim mock provider.
    fn config() -> PipelineConfig {
        PipelineConfig::default().with_embedding_model("mock-embedder", 64)
    }

    fn pages(entries: &[(u32, &str)]) -> BTreeMap<u32, String> {
        entries
            .iter()
            .map(|&(n, text)| (n, text.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn pages_that_normalize_to_nothing_are_skipped() {
        let index = Arc::new(MemoryVectorIndex::new());
        let pipeline = pipeline(Arc::clone(&index), config());

        let pages = pages(&[(1, "$$$"), (2, "Fire is hot.")]);
        let report = pipeline
            .ingest_pages(&pages, "doc", serde_json::Map::new())
            .await
            .unwrap();

        assert_eq!(report.pages, 1);
        assert_eq!(report.chunks, 1);
        assert_eq!(index.len("doc"), 1);
    }

    #[tokio::test]
    async fn batches_flush_at_configured_size_with_remainder() {
        let index = Arc::new(MemoryVectorIndex::new());
        let config = config()
            .with_batching(2, Duration::from_millis(0))
            .with_max_chunk_chars(12);
        let pipeline = pipeline(Arc::clone(&index), config);

        // Five short sentences under a 12-char bound give five chunks.
        let pages = pages(&[(1, "One one. Two two. Three x. Four y. Five z.")]);
        let report = pipeline
            .ingest_pages(&pages, "doc", serde_json::Map::new())
            .await
            .unwrap();

        assert_eq!(report.chunks, 5);
        assert_eq!(report.batches, 3, "two full batches plus the remainder");
        assert_eq!(index.len("doc"), 5);
    }

    #[tokio::test]
    async fn entry_ids_are_deterministic() {
        let index = Arc::new(MemoryVectorIndex::new());
        let pipeline = pipeline(Arc::clone(&index), config());

        let pages = pages(&[(1, "The sky is blue. Water is wet."), (2, "Fire is hot.")]);
        pipeline
            .ingest_pages(&pages, "guide", serde_json::Map::new())
            .await
            .unwrap();

        let matches = index.query("guide", &[0.0; 64], 10).await.unwrap();
        let mut ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["guide_p1_chunk_0", "guide_p2_chunk_0"]);
    }

    #[tokio::test]
    async fn mismatched_embedding_dimension_aborts_ingestion() {
        let index = Arc::new(MemoryVectorIndex::new());
        // Default config declares 1536 dimensions; the mock emits 64.
        let pipeline = pipeline(Arc::clone(&index), PipelineConfig::default());

        let pages = pages(&[(1, "The sky is blue.")]);
        let err = pipeline
            .ingest_pages(&pages, "doc", serde_json::Map::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            IngestionError::Embedding {
                source: EmbeddingError::DimensionMismatch {
                    expected: 1536,
                    actual: 64,
                },
                ..
            }
        ));
        assert_eq!(index.len("doc"), 0, "nothing may reach the index");
    }

    #[tokio::test]
    async fn extra_metadata_is_attached_to_every_chunk() {
        let index = Arc::new(MemoryVectorIndex::new());
        let pipeline = pipeline(Arc::clone(&index), config());

        let mut extra = serde_json::Map::new();
        extra.insert(
            "uploaded_by".to_string(),
            serde_json::Value::String("tester".to_string()),
        );
        let pages = pages(&[(1, "The sky is blue.")]);
        pipeline.ingest_pages(&pages, "doc", extra).await.unwrap();

        let matches = index.query("doc", &[0.0; 64], 1).await.unwrap();
        assert_eq!(
            matches[0].metadata.extra.get("uploaded_by"),
            Some(&serde_json::Value::String("tester".to_string()))
        );
        assert_eq!(matches[0].metadata.total_chunks_in_page, 1);
    }
}
