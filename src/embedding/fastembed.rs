//! FastEmbed embedding provider implementation.
//!
//! Runs an embedding model locally via the fastembed library, avoiding
//! per-request API calls. Useful when indexing large neighbor sets.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tokio::sync::Mutex;

use super::{EmbeddingError, EmbeddingProvider, EmbeddingResult};

/// FastEmbed-backed embedding provider.
///
/// The model instance is not `Sync`, so it lives behind an async mutex;
/// embedding requests serialize on it.
#[derive(Clone)]
pub struct FastEmbedProvider {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    embedding_dimension: usize,
}

/// Dimension of the vectors a given fastembed model produces.
fn model_dimension(model: &EmbeddingModel) -> usize {
    match model {
        EmbeddingModel::AllMiniLML6V2 => 384,
        EmbeddingModel::BGESmallENV15 => 384,
        EmbeddingModel::BGEBaseENV15 => 768,
        _ => 384,
    }
}

impl FastEmbedProvider {
    /// Create a new provider.
    ///
    /// # Arguments
    /// * `model` - Model to load (defaults to AllMiniLML6V2)
    /// * `cache_dir` - Cache directory for downloaded model files
    ///
    /// # Errors
    /// Returns `EmbeddingError::ConfigError` if model initialization fails.
    pub fn new(model: Option<EmbeddingModel>, cache_dir: Option<String>) -> EmbeddingResult<Self> {
        let model_type = model.unwrap_or(EmbeddingModel::AllMiniLML6V2);
        let model_name = format!("{model_type:?}");
        let embedding_dimension = model_dimension(&model_type);

        let mut init_options = InitOptions::new(model_type);
        if let Some(dir) = cache_dir {
            init_options = init_options.with_cache_dir(PathBuf::from(dir));
        }

        let text_embedding = TextEmbedding::try_new(init_options).map_err(|e| {
            EmbeddingError::ConfigError(format!("Failed to initialize fastembed model: {e}"))
        })?;

        Ok(Self {
            model: Arc::new(Mutex::new(text_embedding)),
            model_name,
            embedding_dimension,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "Text cannot be empty".to_string(),
            ));
        }

        let mut model = self.model.lock().await;
        let embeddings = model
            .embed(vec![text.to_string()], None)
            .map_err(|e| EmbeddingError::Other(format!("Embedding generation failed: {e}")))?;

        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Other("No embedding generated".to_string()))
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

        let mut model = self.model.lock().await;
        let text_strings: Vec<String> = texts.iter().map(|&s| s.to_string()).collect();
        model
            .embed(text_strings, None)
            .map_err(|e| EmbeddingError::Other(format!("Batch embedding generation failed: {e}")))
    }

    fn dimension(&self) -> usize {
        self.embedding_dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl std::fmt::Debug for FastEmbedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedProvider")
            .field("model_name", &self.model_name)
            .field("embedding_dimension", &self.embedding_dimension)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Instantiating TextEmbedding downloads model weights, so tests stick
    // to the pure dimension table.
    #[test]
    fn dimension_follows_model_choice() {
        assert_eq!(model_dimension(&EmbeddingModel::AllMiniLML6V2), 384);
        assert_eq!(model_dimension(&EmbeddingModel::BGESmallENV15), 384);
        assert_eq!(model_dimension(&EmbeddingModel::BGEBaseENV15), 768);
    }
}
