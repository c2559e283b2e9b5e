//! HTTP adapter for a Pinecone-compatible vector index.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use super::{IndexEntry, QueryMatch, VectorIndex};
use crate::types::IndexError;

/// How a document scope is realized on the backend.
///
/// Both strategies satisfy the same isolation guarantee; they are mutually
/// exclusive per deployment.
#[derive(Clone, Debug)]
pub enum ScopeStrategy {
    /// First-class namespace partition. The default: isolation is structural
    /// rather than dependent on filter correctness.
    Namespace,
    /// Metadata equality filter on `field`. The field is stamped into each
    /// entry's metadata at upsert time so the guarantee holds regardless of
    /// what the caller put there.
    MetadataFilter { field: String },
}

impl ScopeStrategy {
    /// Filter on the conventional `document_id` metadata field.
    pub fn document_id_filter() -> Self {
        Self::MetadataFilter {
            field: "document_id".to_string(),
        }
    }
}

/// Client for the Pinecone data-plane API (`/vectors/upsert`, `/query`).
///
/// Eventually consistent: an entry upserted a moment ago may not yet be
/// visible to `query`. Freshness-sensitive callers should bound-retry.
#[derive(Clone)]
pub struct PineconeIndex {
    client: Client,
    host: Url,
    api_key: String,
    strategy: ScopeStrategy,
}

impl PineconeIndex {
    pub fn new(host: Url, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            host,
            api_key: api_key.into(),
            strategy: ScopeStrategy::Namespace,
        }
    }

    #[must_use]
    pub fn with_scope_strategy(mut self, strategy: ScopeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.host.as_str().trim_end_matches('/'), path)
    }

    async fn post(&self, path: &str, body: Value) -> Result<reqwest::Response, IndexError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IndexError::Remote {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn upsert(&self, scope: &str, entries: Vec<IndexEntry>) -> Result<(), IndexError> {
        if entries.is_empty() {
            return Ok(());
        }
        let count = entries.len();

        let body = match &self.strategy {
            ScopeStrategy::Namespace => json!({
                "vectors": entries,
                "namespace": scope,
            }),
            ScopeStrategy::MetadataFilter { field } => {
                let mut entries = entries;
                for entry in &mut entries {
                    entry
                        .metadata
                        .extra
                        .insert(field.clone(), Value::String(scope.to_string()));
                }
                json!({ "vectors": entries })
            }
        };

        self.post("vectors/upsert", body).await?;
        debug!(scope, count, "upserted vectors");
        Ok(())
    }

    async fn query(
        &self,
        scope: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<QueryMatch>, IndexError> {
        let mut body = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
        });
        match &self.strategy {
            ScopeStrategy::Namespace => {
                body["namespace"] = Value::String(scope.to_string());
            }
            ScopeStrategy::MetadataFilter { field } => {
                let mut filter = serde_json::Map::new();
                filter.insert(field.clone(), json!({ "$eq": scope }));
                body["filter"] = Value::Object(filter);
            }
        }

        let response = self.post("query", body).await?;
        let parsed: QueryResponse = response.json().await?;
        debug!(scope, matches = parsed.matches.len(), "similarity query completed");
        Ok(parsed.matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::ChunkMetadata;
    use httpmock::prelude::*;

    fn entry(id: &str) -> IndexEntry {
        IndexEntry {
            id: id.to_string(),
            values: vec![0.1, 0.2],
            metadata: ChunkMetadata {
                text: "The sky is blue.".to_string(),
                pdf_name: "guide".to_string(),
                page_number: 1,
                chunk_index: 0,
                total_chunks_in_page: 1,
                extra: serde_json::Map::new(),
            },
        }
    }

    fn index_for(server: &MockServer) -> PineconeIndex {
        let host = Url::parse(&server.base_url()).unwrap();
        PineconeIndex::new(host, "test-key")
    }

    #[tokio::test]
    async fn upsert_sends_namespace_and_vectors() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/vectors/upsert")
                .header("api-key", "test-key")
                .json_body_partial(
                    r#"{
                        "namespace": "guide",
                        "vectors": [{ "id": "guide_p1_chunk_0", "values": [0.1, 0.2] }]
                    }"#,
                );
            then.status(200).json_body(serde_json::json!({ "upsertedCount": 1 }));
        });

        let index = index_for(&server);
        index
            .upsert("guide", vec![entry("guide_p1_chunk_0")])
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn filter_strategy_stamps_scope_field_and_filters_queries() {
        let server = MockServer::start();
        let upsert_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/vectors/upsert")
                .json_body_partial(
                    r#"{
                        "vectors": [{ "metadata": { "document_id": "guide" } }]
                    }"#,
                );
            then.status(200).json_body(serde_json::json!({ "upsertedCount": 1 }));
        });
        let query_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/query")
                .json_body_partial(
                    r#"{
                        "topK": 3,
                        "includeMetadata": true,
                        "filter": { "document_id": { "$eq": "guide" } }
                    }"#,
                );
            then.status(200).json_body(serde_json::json!({ "matches": [] }));
        });

        let index = index_for(&server).with_scope_strategy(ScopeStrategy::document_id_filter());
        index
            .upsert("guide", vec![entry("guide_p1_chunk_0")])
            .await
            .unwrap();
        index.query("guide", &[0.1, 0.2], 3).await.unwrap();

        upsert_mock.assert();
        query_mock.assert();
    }

    #[tokio::test]
    async fn query_parses_matches_in_order() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/query");
            then.status(200).json_body(serde_json::json!({
                "matches": [
                    {
                        "id": "guide_p1_chunk_0",
                        "score": 0.97,
                        "metadata": {
                            "text": "The sky is blue.",
                            "pdf_name": "guide",
                            "page_number": 1,
                            "chunk_index": 0,
                            "total_chunks_in_page": 1,
                            "uploaded_by": "tester"
                        }
                    },
                    {
                        "id": "guide_p2_chunk_0",
                        "score": 0.42,
                        "metadata": {
                            "text": "Fire is hot.",
                            "pdf_name": "guide",
                            "page_number": 2,
                            "chunk_index": 0,
                            "total_chunks_in_page": 1
                        }
                    }
                ]
            }));
        });

        let index = index_for(&server);
        let matches = index.query("guide", &[0.1, 0.2], 3).await.unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "guide_p1_chunk_0");
        assert!(matches[0].score > matches[1].score);
        assert_eq!(
            matches[0].metadata.extra.get("uploaded_by"),
            Some(&serde_json::Value::String("tester".to_string()))
        );
    }

    #[tokio::test]
    async fn non_success_status_becomes_remote_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/vectors/upsert");
            then.status(503).body("index unavailable");
        });

        let index = index_for(&server);
        match index.upsert("guide", vec![entry("id")]).await {
            Err(IndexError::Remote { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "index unavailable");
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_upsert_is_a_no_op() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/vectors/upsert");
            then.status(200);
        });

        let index = index_for(&server);
        index.upsert("guide", Vec::new()).await.unwrap();
        assert_eq!(mock.hits(), 0);
    }
}
