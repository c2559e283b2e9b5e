//! Embedding providers: the remote OpenAI client and a deterministic mock.

use std::hash::{DefaultHasher, Hash, Hasher};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::types::EmbeddingError;

/// Converts text into a fixed-dimension vector.
///
/// One remote call per invocation and no local caching; repeated identical
/// inputs re-hit the model. Callers own the retry policy.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds a single string.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI `/v1/embeddings` client.
#[derive(Clone)]
pub struct OpenAiEmbeddings {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiEmbeddings {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: OPENAI_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// Overrides the API base URL, mainly for tests against a local mock.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let endpoint = format!("{}/embeddings", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({ "input": text, "model": self.model }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(EmbeddingError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let body: EmbeddingsResponse = response.json().await?;
        let vector = body
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or_else(|| {
                EmbeddingError::MalformedResponse("response contained no embeddings".to_string())
            })?;
        debug!(model = %self.model, dimensions = vector.len(), "embedded text");
        Ok(vector)
    }
}

/// Deterministic, offline embedding provider for tests and demos.
///
/// Identical inputs always produce identical unit-length vectors, so an
/// exact-text query scores cosine similarity 1.0 against its own chunk.
#[derive(Clone, Debug)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self { dimensions: 64 }
    }

    #[must_use]
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions.max(1);
        self
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let mut vector: Vec<f32> = (0..self.dimensions)
            .map(|lane| {
                let mut hasher = DefaultHasher::new();
                text.hash(&mut hasher);
                lane.hash(&mut hasher);
                // Map the hash onto [-1, 1].
                (hasher.finish() % 2_000) as f32 / 1_000.0 - 1.0
            })
            .collect();

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        Ok(vector)
    }
}
