//! Error taxonomy shared across the pipeline.
//!
//! Each stage has its own error type; composite operations wrap the stage
//! error together with enough position context (document, page, chunk) to
//! diagnose a failure without replaying the run. Nothing here retries:
//! entry ids are deterministic, so the calling layer can simply re-invoke
//! `ingest` and overwrite whatever a failed run left behind.

use thiserror::Error;

/// Failure while pulling text out of a source document.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The bytes could not be parsed as a PDF.
    #[error("unreadable document: {0}")]
    Unreadable(String),

    /// The document parsed but reported zero pages.
    #[error("document contains no pages")]
    EmptyDocument,
}

/// Failure while turning text into an embedding vector.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// The remote model rejected the call due to rate limiting.
    #[error("embedding provider rate limited the request")]
    RateLimited,

    /// Empty input after trimming; the provider would reject it anyway.
    #[error("cannot embed empty input")]
    EmptyInput,

    /// The provider returned a vector whose length does not match the
    /// dimension the index is configured for.
    #[error("embedding dimension {actual} does not match configured dimension {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The provider answered with a non-success status.
    #[error("embedding request failed with status {status}: {message}")]
    Remote { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("malformed embedding response: {0}")]
    MalformedResponse(String),

    #[error("embedding transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failure while talking to the vector index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The index answered with a non-success status.
    #[error("index request failed with status {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("index transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failure of a whole ingestion run. Aborts the document; no partial-success
/// state is kept.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("extraction failed for '{document}': {source}")]
    Extraction {
        document: String,
        source: ExtractionError,
    },

    #[error("embedding failed for '{document}' page {page} chunk {chunk}: {source}")]
    Embedding {
        document: String,
        page: u32,
        chunk: usize,
        source: EmbeddingError,
    },

    #[error("upsert failed for '{document}' ({batch_len} entries in batch): {source}")]
    Upsert {
        document: String,
        batch_len: usize,
        source: IndexError,
    },
}

/// Failure of a retrieval call.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("index query failed: {0}")]
    Index(#[from] IndexError),
}
