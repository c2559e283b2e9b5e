//! Vector index trait and storage backends.
//!
//! ```text
//!                  ┌────────────────────┐
//!                  │  VectorIndex trait │
//!                  │  (upsert / query)  │
//!                  └─────────┬──────────┘
//!                            │
//!               ┌────────────┴────────────┐
//!               ▼                         ▼
//!      ┌─────────────────┐      ┌──────────────────┐
//!      │  PineconeIndex  │      │ MemoryVectorIndex│
//!      │ (HTTP dataplane)│      │ (tests / demos)  │
//!      └─────────────────┘      └──────────────────┘
//! ```
//!
//! Every operation takes a `scope`: the identifier of the source document.
//! How the scope is realized — a first-class namespace partition or a
//! metadata equality filter — is the backend's choice; both guarantee that a
//! scoped query never returns an entry belonging to a different document.
//!
//! Consistency: backends differ in when a just-upserted entry becomes
//! visible to queries. [`memory::MemoryVectorIndex`] is strongly consistent;
//! [`pinecone::PineconeIndex`] is eventually consistent. Callers must not
//! assume read-after-write visibility.

pub mod memory;
pub mod pinecone;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::IndexError;

pub use memory::MemoryVectorIndex;
pub use pinecone::{PineconeIndex, ScopeStrategy};

/// Metadata persisted alongside each vector.
///
/// The named fields are the pipeline's own schema; `extra` carries
/// caller-supplied fields and is flattened so they sit beside the standard
/// ones on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// The chunk text itself, non-empty after trimming.
    pub text: String,
    /// Display name of the source document.
    pub pdf_name: String,
    /// 1-based page number within the document.
    pub page_number: u32,
    /// 0-based chunk position within the page.
    pub chunk_index: usize,
    /// How many chunks the page produced in total.
    pub total_chunks_in_page: usize,
    /// Caller-supplied fields (upload time, custom ids, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A persisted (id, vector, metadata) triple.
///
/// Ids are deterministic (`{name}_p{page}_chunk_{index}`), so re-upserting
/// after a failed run overwrites rather than duplicates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: ChunkMetadata,
}

/// One similarity-search result, best match first in any returned sequence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    pub score: f32,
    pub metadata: ChunkMetadata,
}

/// Durable, document-scoped store of vectors with nearest-neighbor search.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Writes or replaces entries by id within `scope`.
    ///
    /// Idempotent: re-upserting an id with the same vector and metadata is a
    /// no-op in effect. Concurrent upserts to the same id resolve
    /// last-writer-wins.
    async fn upsert(&self, scope: &str, entries: Vec<IndexEntry>) -> Result<(), IndexError>;

    /// Returns up to `top_k` nearest entries within `scope`, best first.
    ///
    /// Tie order between equal scores is backend-defined; callers must not
    /// depend on it.
    async fn query(
        &self,
        scope: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<QueryMatch>, IndexError>;
}
