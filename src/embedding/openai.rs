//! OpenAI embedding provider implementation.
//!
//! Calls the `/v1/embeddings` endpoint over HTTPS. The response carries
//! one embedding per input, tagged with its input index; embeddings are
//! re-sorted by that index so batch results always line up with the
//! request order.

use async_trait::async_trait;
use serde::Deserialize;

use super::{EmbeddingError, EmbeddingProvider, EmbeddingResult};

/// Default embedding model.
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

const API_URL: &str = "https://api.openai.com/v1/embeddings";

/// OpenAI embedding provider.
#[derive(Debug, Clone)]
pub struct OpenAiEmbedding {
    http: reqwest::Client,
    api_key: String,
    model: String,
    embedding_dimension: usize,
}

/// Dimension of the vectors a given OpenAI embedding model produces.
fn model_dimension(model: &str) -> usize {
    match model {
        "text-embedding-3-small" => 1536,
        "text-embedding-3-large" => 3072,
        "text-embedding-ada-002" => 1536,
        _ => 1536,
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingObject>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingObject {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbedding {
    /// Create a new provider.
    ///
    /// # Arguments
    /// * `api_key` - API key for authentication
    /// * `model` - Model name (defaults to [`DEFAULT_MODEL`] if `None`)
    pub fn new(api_key: String, model: Option<String>) -> Self {
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let embedding_dimension = model_dimension(&model);

        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            embedding_dimension,
        }
    }

    async fn request(&self, inputs: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": inputs,
        });

        let response = self
            .http
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EmbeddingError::ApiError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ApiError(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let mut parsed: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::ApiError(e.to_string()))?;

        if parsed.data.len() != inputs.len() {
            return Err(EmbeddingError::ApiError(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                parsed.data.len()
            )));
        }

        parsed.data.sort_by_key(|d| d.index);
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedding {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "Text cannot be empty".to_string(),
            ));
        }
        self.request(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Other("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> EmbeddingResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        for text in texts {
            if text.trim().is_empty() {
                return Err(EmbeddingError::InvalidInput(
                    "All texts must be non-empty".to_string(),
                ));
            }
        }
        self.request(texts).await
    }

    fn dimension(&self) -> usize {
        self.embedding_dimension
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
