//! In-memory vector index over a loaded corpus.

use crate::collaborators::RetrievalClient;
use crate::embeddings::{cosine_similarity, EmbeddingProvider};
use async_trait::async_trait;
use grounded_core::{AppError, AppResult};
use std::sync::Arc;

/// Corpus chunks with their embeddings, searched by cosine similarity.
///
/// Chunks are embedded once at build time; each query is embedded on demand.
#[derive(Debug)]
pub struct MemoryIndex {
    provider: Arc<dyn EmbeddingProvider>,
    chunks: Vec<String>,
    embeddings: Vec<Vec<f32>>,
}

impl MemoryIndex {
    /// Embed `chunks` and build the index.
    pub async fn build(
        provider: Arc<dyn EmbeddingProvider>,
        chunks: Vec<String>,
    ) -> AppResult<Self> {
        tracing::info!(
            "Embedding {} chunks with {} ({})",
            chunks.len(),
            provider.provider_name(),
            provider.model_name()
        );

        let embeddings = provider.embed_batch(&chunks).await?;
        if embeddings.len() != chunks.len() {
            return Err(AppError::Retrieval(format!(
                "Embedding provider returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        Ok(Self {
            provider,
            chunks,
            embeddings,
        })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Top `k` chunks for an embedded query, with scores, best first.
    ///
    /// Equal scores keep corpus order.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(&str, f32)> {
        let mut scored: Vec<(usize, f32)> = self
            .embeddings
            .iter()
            .map(|embedding| cosine_similarity(query, embedding))
            .enumerate()
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(i, score)| (self.chunks[i].as_str(), score))
            .collect()
    }
}

#[async_trait]
impl RetrievalClient for MemoryIndex {
    async fn query(&self, text: &str, k: usize) -> AppResult<Vec<String>> {
        if self.chunks.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query = self.provider.embed(text).await?;
        let results = self.search(&query, k);

        if let Some((_, best)) = results.first() {
            tracing::debug!("Index returned {} chunks, best score {:.3}", results.len(), best);
        }

        Ok(results
            .into_iter()
            .map(|(chunk, _)| chunk.to_string())
            .collect())
    }
}
