//! ```text
//! PDF bytes ──► extract::extract_pages ──► per-page raw text
//!                                             │
//!                        text::normalize ◄────┘
//!                                │
//!                        text::split_chunks ──► bounded, sentence-aligned chunks
//!                                │
//!             embeddings::EmbeddingProvider ──► fixed-dimension vectors
//!                                │
//!     pipeline::IngestionPipeline ──► batched stores::VectorIndex::upsert
//!                                          (scoped per document)
//!
//! Question ──► retrieval::RetrievalService ──► scoped top-K QueryMatch list
//!           └─► retrieval::context_text   ──► newline-joined grounding context
//! ```
//!
//! The crate exposes exactly two operations upward: ingesting a document
//! ([`pipeline::IngestionPipeline::ingest`]) and retrieving ranked context for
//! a question ([`retrieval::RetrievalService::retrieve`]). Everything around
//! them (HTTP routing, chat transport, uploads) belongs to the calling layer.

pub mod config;
pub mod embeddings;
pub mod extract;
pub mod pipeline;
pub mod retrieval;
pub mod stores;
pub mod text;
pub mod types;

pub use config::PipelineConfig;
pub use embeddings::{EmbeddingProvider, MockEmbeddingProvider, OpenAiEmbeddings};
pub use pipeline::{IngestReport, IngestionPipeline};
pub use retrieval::{RetrievalService, context_text};
pub use stores::{ChunkMetadata, IndexEntry, QueryMatch, VectorIndex};
pub use types::{EmbeddingError, ExtractionError, IndexError, IngestionError, RetrievalError};
